pub mod engine;
pub mod fallback;
pub mod features;
pub mod margin_guard;
pub mod predictor;

pub use engine::PricingEngine;

/// Business constants applied around the model output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingPolicy {
    /// Competitor multiplier used when no model prediction is available.
    pub fallback_multiplier: f64,
    /// Floor as a factor of cost, enforced by the margin guard.
    pub min_margin_factor: f64,
    /// Guard only applies when units_sold is strictly above this.
    pub guard_min_units_sold: u64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            fallback_multiplier: 0.98,
            min_margin_factor: 1.05,
            guard_min_units_sold: 10,
        }
    }
}

/// Rounds the exact stored value to 2 decimals, ties to even.
///
/// Scaling by 100 first would round twice: 12.004999.. * 100 lands on 1200.5.
pub fn round_to_cents(price: f64) -> f64 {
    format!("{price:.2}").parse::<f64>().unwrap_or(price)
}
