use serde::{Deserialize, Serialize};
use std::fmt;

const MARGIN_GUARD_MARKER: &str = " (Margin Guard)";

/// Which strategy produced the pre-guard price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceBasis {
    Ai { multiplier: f64 },
    RuleBasedFallback,
}

impl fmt::Display for PriceBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceBasis::Ai { multiplier } => write!(f, "AI Strategy: {multiplier:.2}x Competitor"),
            PriceBasis::RuleBasedFallback => f.write_str("Rule-based Fallback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricingDecision {
    pub sku: String,
    /// Rounded to cents.
    pub optimized_price: f64,
    pub original_price: f64,
    pub basis: PriceBasis,
    pub margin_guard_applied: bool,
}

impl PricingDecision {
    pub fn reason(&self) -> String {
        if self.margin_guard_applied {
            format!("{}{MARGIN_GUARD_MARKER}", self.basis)
        } else {
            self.basis.to_string()
        }
    }
}

/// Wire shape of a single decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizedProduct {
    pub sku: String,
    pub optimized_price: f64,
    pub original_price: f64,
    pub reason: String,
}

impl From<&PricingDecision> for OptimizedProduct {
    fn from(d: &PricingDecision) -> Self {
        Self {
            sku: d.sku.clone(),
            optimized_price: d.optimized_price,
            original_price: d.original_price,
            reason: d.reason(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub optimized_products: Vec<OptimizedProduct>,
}

impl BatchResponse {
    pub fn from_decisions(decisions: &[PricingDecision]) -> Self {
        Self {
            optimized_products: decisions.iter().map(OptimizedProduct::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub ai_priced: usize,
    pub fallback_priced: usize,
    pub margin_guarded: usize,
}

impl BatchSummary {
    pub fn from_decisions(decisions: &[PricingDecision]) -> Self {
        let mut out = Self {
            total: decisions.len(),
            ..Self::default()
        };
        for d in decisions {
            match d.basis {
                PriceBasis::Ai { .. } => out.ai_priced += 1,
                PriceBasis::RuleBasedFallback => out.fallback_priced += 1,
            }
            if d.margin_guard_applied {
                out.margin_guarded += 1;
            }
        }
        out
    }
}
