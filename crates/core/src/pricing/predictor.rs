use crate::domain::product::ProductInput;
use crate::model::ScoringModel;
use crate::pricing::features::derive_features;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    Multiplier(f64),
    /// No model was loaded at startup.
    Unavailable,
    /// Feature derivation or scoring failed for this item.
    Failed(String),
}

#[derive(Clone, Default)]
pub struct PricePredictor {
    model: Option<Arc<dyn ScoringModel>>,
}

impl std::fmt::Debug for PricePredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricePredictor")
            .field("model", &self.model_name())
            .finish()
    }
}

impl PricePredictor {
    pub fn new(model: Option<Arc<dyn ScoringModel>>) -> Self {
        Self { model }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.name())
    }

    pub fn predict(&self, item: &ProductInput) -> Prediction {
        let Some(model) = &self.model else {
            return Prediction::Unavailable;
        };

        let features = match derive_features(item) {
            Ok(f) => f,
            Err(e) => {
                tracing::error!(sku = %item.sku, error = %e, "feature derivation failed; using fallback");
                return Prediction::Failed(e.to_string());
            }
        };

        match model.predict(&features) {
            Ok(multiplier) => Prediction::Multiplier(multiplier),
            Err(e) => {
                tracing::error!(sku = %item.sku, error = %e, "model prediction failed; using fallback");
                Prediction::Failed(e.to_string())
            }
        }
    }
}
