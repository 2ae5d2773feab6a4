pub mod error;
pub mod tree_ensemble;

use crate::model::error::ModelError;
use crate::pricing::features::FeatureVector;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

/// A loaded pricing model: one feature vector in, one competitor-price multiplier out.
pub trait ScoringModel: Send + Sync {
    fn name(&self) -> &str;

    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError>;
}

/// Loads the model artifact at `path`.
///
/// A missing file is not an error: it yields `Ok(None)` and the caller runs with
/// rule-based pricing only. A file that exists but cannot be loaded is an error.
pub fn load_model(path: &Path) -> anyhow::Result<Option<Arc<dyn ScoringModel>>> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no model artifact found; using rule-based pricing");
        return Ok(None);
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read model artifact {}", path.display()))?;
    let model = tree_ensemble::TreeEnsembleModel::from_json_str(&text)
        .with_context(|| format!("failed to load model artifact {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        trees = model.tree_count(),
        objective = model.objective(),
        "pricing model loaded"
    );

    let model: Arc<dyn ScoringModel> = Arc::new(model);
    Ok(Some(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pricebrain-{}-{name}", std::process::id()))
    }

    const TINY_MODEL: &str = r#"{
        "learner": {
            "learner_model_param": {"base_score": "9E-1", "num_feature": "4"},
            "objective": {"name": "reg:squarederror"},
            "gradient_booster": {
                "name": "gbtree",
                "model": {"trees": [{
                    "left_children": [-1],
                    "right_children": [-1],
                    "split_indices": [0],
                    "split_conditions": [0.0],
                    "default_left": [0]
                }]}
            }
        }
    }"#;

    #[test]
    fn missing_artifact_means_no_model() {
        let model = load_model(&temp_path("does-not-exist.json")).unwrap();
        assert!(model.is_none());
    }

    #[test]
    fn corrupt_artifact_is_an_error() {
        let path = temp_path("corrupt.json");
        std::fs::write(&path, "{not json").unwrap();
        let res = load_model(&path);
        std::fs::remove_file(&path).ok();
        assert!(res.is_err());
    }

    #[test]
    fn loads_artifact_from_disk() {
        let path = temp_path("tiny.json");
        std::fs::write(&path, TINY_MODEL).unwrap();
        let res = load_model(&path);
        std::fs::remove_file(&path).ok();

        let model = res.unwrap().expect("model should load");
        let fv = FeatureVector {
            cost_ratio: 0.5,
            stock_level: 1.0,
            units_sold: 1.0,
            units_ordered: 1.0,
        };
        assert_eq!(model.predict(&fv).unwrap(), f64::from(0.9f32));
        assert_eq!(model.name(), "xgboost_tree_ensemble");
    }
}
