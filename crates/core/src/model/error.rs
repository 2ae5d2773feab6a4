use std::fmt;

#[derive(Debug, Clone)]
pub struct ModelError {
    pub stage: &'static str,
    pub detail: String,
}

impl ModelError {
    pub fn new(stage: &'static str, detail: impl Into<String>) -> Self {
        Self {
            stage,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model error (stage={}): {}", self.stage, self.detail)
    }
}

impl std::error::Error for ModelError {}
