pub mod domain;
pub mod model;
pub mod pricing;

pub mod config {
    use std::path::PathBuf;

    pub const DEFAULT_MODEL_PATH: &str = "pricing_model2.json";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub model_path: Option<String>,
        pub sentry_dsn: Option<String>,
        pub port: Option<u16>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let port = match std::env::var("PORT") {
                Ok(raw) => Some(
                    raw.trim()
                        .parse::<u16>()
                        .map_err(|e| anyhow::anyhow!("PORT must be a valid port number ({raw}): {e}"))?,
                ),
                Err(_) => None,
            };

            Ok(Self {
                model_path: std::env::var("PRICING_MODEL_PATH")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                port,
            })
        }

        pub fn model_path(&self) -> PathBuf {
            PathBuf::from(
                self.model_path
                    .as_deref()
                    .unwrap_or(DEFAULT_MODEL_PATH),
            )
        }
    }
}
