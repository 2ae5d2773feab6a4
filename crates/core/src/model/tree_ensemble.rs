//! Gradient-boosted tree ensemble loaded from an XGBoost JSON model dump.
//!
//! Scoring follows XGBoost's numerics: features, split conditions and leaf values are
//! `f32`, splits compare in `f32`, and the margin is accumulated in `f32`.

use crate::model::error::ModelError;
use crate::model::ScoringModel;
use crate::pricing::features::{FeatureVector, FEATURE_COUNT};
use serde::Deserialize;
use std::collections::BTreeMap;

// Objectives whose prediction is the raw margin (identity link).
const IDENTITY_OBJECTIVES: &[&str] = &[
    "reg:squarederror",
    "reg:linear",
    "reg:absoluteerror",
    "reg:pseudohubererror",
];

#[derive(Debug, Deserialize)]
struct RawModel {
    learner: RawLearner,
}

#[derive(Debug, Deserialize)]
struct RawLearner {
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    learner_model_param: RawLearnerParam,
    objective: RawObjective,
    gradient_booster: RawBooster,
}

#[derive(Debug, Deserialize)]
struct RawLearnerParam {
    base_score: String,
    num_feature: String,
    #[serde(default)]
    num_target: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawObjective {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawBooster {
    name: String,
    model: RawGbtree,
}

#[derive(Debug, Deserialize)]
struct RawGbtree {
    #[serde(default)]
    gbtree_model_param: Option<RawGbtreeParam>,
    trees: Vec<RawTree>,
}

#[derive(Debug, Deserialize)]
struct RawGbtreeParam {
    #[serde(default)]
    num_parallel_tree: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTree {
    left_children: Vec<i64>,
    right_children: Vec<i64>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f64>,
    default_left: Vec<Flag>,
}

// Older dumps write booleans, newer ones write 0/1.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(f32),
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        default_left: bool,
    },
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_raw(idx: usize, raw: RawTree) -> Result<Self, ModelError> {
        let n = raw.left_children.len();
        let invalid = |detail: String| ModelError::new("parse", format!("tree {idx}: {detail}"));

        if n == 0 {
            return Err(invalid("tree has no nodes".to_string()));
        }
        if raw.right_children.len() != n
            || raw.split_indices.len() != n
            || raw.split_conditions.len() != n
            || raw.default_left.len() != n
        {
            return Err(invalid("node arrays have mismatched lengths".to_string()));
        }

        let child = |node: usize, c: i64| -> Result<usize, ModelError> {
            usize::try_from(c)
                .ok()
                .filter(|&c| c < n)
                .ok_or_else(|| invalid(format!("node {node} has out-of-range child {c}")))
        };

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            if raw.left_children[i] == -1 {
                nodes.push(Node::Leaf(raw.split_conditions[i] as f32));
                continue;
            }

            let feature = usize::try_from(raw.split_indices[i])
                .ok()
                .filter(|&f| f < FEATURE_COUNT)
                .ok_or_else(|| {
                    invalid(format!(
                        "node {i} splits on unknown feature {}",
                        raw.split_indices[i]
                    ))
                })?;

            nodes.push(Node::Split {
                feature,
                threshold: raw.split_conditions[i] as f32,
                left: child(i, raw.left_children[i])?,
                right: child(i, raw.right_children[i])?,
                default_left: raw.default_left[i].is_set(),
            });
        }

        Ok(Self { nodes })
    }

    fn leaf_value(&self, x: &[f32; FEATURE_COUNT]) -> Result<f32, ModelError> {
        let mut idx = 0;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..self.nodes.len() {
            match &self.nodes[idx] {
                Node::Leaf(v) => return Ok(*v),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let v = x[*feature];
                    let go_left = if v.is_nan() { *default_left } else { v < *threshold };
                    idx = if go_left { *left } else { *right };
                }
            }
        }
        Err(ModelError::new("predict", "tree traversal did not reach a leaf"))
    }
}

#[derive(Debug, Clone)]
pub struct TreeEnsembleModel {
    objective: String,
    base_score: f32,
    trees: Vec<Tree>,
}

impl TreeEnsembleModel {
    pub fn from_json_str(text: &str) -> Result<Self, ModelError> {
        let raw: RawModel = serde_json::from_str(text)
            .map_err(|e| ModelError::new("parse", format!("invalid model JSON: {e}")))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawModel) -> Result<Self, ModelError> {
        let learner = raw.learner;

        let objective = learner.objective.name;
        if !IDENTITY_OBJECTIVES.contains(&objective.as_str()) {
            return Err(ModelError::new(
                "load",
                format!("unsupported objective {objective}"),
            ));
        }

        if learner.gradient_booster.name != "gbtree" {
            return Err(ModelError::new(
                "load",
                format!("unsupported booster {}", learner.gradient_booster.name),
            ));
        }

        let num_feature = learner
            .learner_model_param
            .num_feature
            .trim()
            .parse::<usize>()
            .map_err(|e| ModelError::new("parse", format!("invalid num_feature: {e}")))?;
        if num_feature != FEATURE_COUNT {
            return Err(ModelError::new(
                "load",
                format!("model expects {num_feature} features, pricing provides {FEATURE_COUNT}"),
            ));
        }

        if let Some(num_target) = &learner.learner_model_param.num_target {
            if num_target.trim() != "1" {
                return Err(ModelError::new(
                    "load",
                    format!("model has {num_target} targets, pricing expects 1"),
                ));
            }
        }

        let base_score = parse_base_score(&learner.learner_model_param.base_score)?;

        let gbtree = learner.gradient_booster.model;
        let trees_per_round = match gbtree
            .gbtree_model_param
            .and_then(|p| p.num_parallel_tree)
        {
            Some(s) => s
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n >= 1)
                .ok_or_else(|| ModelError::new("parse", format!("invalid num_parallel_tree {s:?}")))?,
            None => 1,
        };

        // Early-stopped models predict with the trees up to and including best_iteration.
        let tree_limit = match learner.attributes.get("best_iteration") {
            Some(s) => {
                let best = s.trim().parse::<usize>().map_err(|e| {
                    ModelError::new("parse", format!("invalid best_iteration {s:?}: {e}"))
                })?;
                (best + 1).saturating_mul(trees_per_round)
            }
            None => usize::MAX,
        };

        let trees = gbtree
            .trees
            .into_iter()
            .take(tree_limit)
            .enumerate()
            .map(|(i, t)| Tree::from_raw(i, t))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            objective,
            base_score,
            trees,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }
}

impl ScoringModel for TreeEnsembleModel {
    fn name(&self) -> &str {
        "xgboost_tree_ensemble"
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let x = features.as_array().map(|v| v as f32);
        let mut margin = self.base_score;
        for tree in &self.trees {
            margin += tree.leaf_value(&x)?;
        }

        if !margin.is_finite() {
            return Err(ModelError::new(
                "predict",
                format!("non-finite prediction {margin}"),
            ));
        }
        Ok(f64::from(margin))
    }
}

// XGBoost >= 2 writes the base score as a bracketed vector ("[5E-1]").
fn parse_base_score(s: &str) -> Result<f32, ModelError> {
    let inner = s.trim().trim_start_matches('[').trim_end_matches(']');
    let first = inner.split(',').next().unwrap_or_default().trim();
    first
        .parse::<f32>()
        .map_err(|e| ModelError::new("parse", format!("invalid base_score {s:?}: {e}")))
}
