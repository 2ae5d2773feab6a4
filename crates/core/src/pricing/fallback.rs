use super::PricingPolicy;

/// Rule-based price: a fixed undercut of the competitor.
pub fn fallback_price(competitor_price: f64, policy: &PricingPolicy) -> f64 {
    competitor_price * policy.fallback_multiplier
}
