use crate::domain::decision::{PriceBasis, PricingDecision};
use crate::domain::product::ProductInput;
use crate::pricing::predictor::{PricePredictor, Prediction};
use crate::pricing::{fallback, margin_guard, round_to_cents, PricingPolicy};

/// Batch pricing pipeline. Immutable after construction; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    predictor: PricePredictor,
    policy: PricingPolicy,
}

impl PricingEngine {
    pub fn new(predictor: PricePredictor, policy: PricingPolicy) -> Self {
        Self { predictor, policy }
    }

    pub fn predictor(&self) -> &PricePredictor {
        &self.predictor
    }

    /// Prices every item independently. Output has the input's length and order.
    pub fn price_batch(&self, items: &[ProductInput]) -> Vec<PricingDecision> {
        items.iter().map(|item| self.price_item(item)).collect()
    }

    pub fn price_item(&self, item: &ProductInput) -> PricingDecision {
        let (raw_price, basis) = match self.predictor.predict(item) {
            Prediction::Multiplier(multiplier) => {
                (item.competitor_price * multiplier, PriceBasis::Ai { multiplier })
            }
            Prediction::Unavailable | Prediction::Failed(_) => (
                fallback::fallback_price(item.competitor_price, &self.policy),
                PriceBasis::RuleBasedFallback,
            ),
        };

        let guarded = margin_guard::apply(raw_price, item.cost_price, item.units_sold, &self.policy);
        if guarded.applied {
            tracing::debug!(
                sku = %item.sku,
                raw_price,
                floor = guarded.price,
                "margin guard raised price"
            );
        }

        PricingDecision {
            sku: item.sku.clone(),
            optimized_price: round_to_cents(guarded.price),
            original_price: item.current_price,
            basis,
            margin_guard_applied: guarded.applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::predictor::tests::{FixedModel, PoisonedModel};
    use std::sync::Arc;

    fn item(sku: &str, competitor_price: f64, cost_price: f64, units_sold: u64) -> ProductInput {
        ProductInput {
            sku: sku.to_string(),
            current_price: 109.99,
            competitor_price,
            cost_price,
            stock_level: 25,
            units_sold,
            units_ordered: 4,
        }
    }

    fn fallback_engine() -> PricingEngine {
        PricingEngine::default()
    }

    fn ai_engine(multiplier: f64) -> PricingEngine {
        PricingEngine::new(
            PricePredictor::new(Some(Arc::new(FixedModel::new(multiplier)))),
            PricingPolicy::default(),
        )
    }

    #[test]
    fn fallback_without_guard() {
        let d = fallback_engine().price_item(&item("A", 100.0, 50.0, 5));
        assert_eq!(d.optimized_price, 98.0);
        assert_eq!(d.original_price, 109.99);
        assert_eq!(d.reason(), "Rule-based Fallback");
        assert!(!d.margin_guard_applied);
    }

    #[test]
    fn fallback_raised_by_margin_guard() {
        let d = fallback_engine().price_item(&item("B", 100.0, 97.0, 20));
        assert_eq!(d.optimized_price, 101.85);
        assert_eq!(d.basis, PriceBasis::RuleBasedFallback);
        assert!(d.margin_guard_applied);
        assert_eq!(d.reason(), "Rule-based Fallback (Margin Guard)");
    }

    #[test]
    fn fallback_rounds_like_the_pricing_service() {
        let engine = fallback_engine();
        assert_eq!(engine.price_item(&item("G", 12.25, 1.0, 0)).optimized_price, 12.0);
        assert_eq!(engine.price_item(&item("H", 1.75, 0.5, 0)).optimized_price, 1.71);
    }

    #[test]
    fn guard_floor_rounds_like_the_pricing_service() {
        let d = fallback_engine().price_item(&item("I", 10.0, 12.7, 20));
        assert!(d.margin_guard_applied);
        assert_eq!(d.optimized_price, 13.33);
    }

    #[test]
    fn ai_multiplier_applied_to_competitor() {
        let d = ai_engine(0.90).price_item(&item("C", 100.0, 50.0, 3));
        assert_eq!(d.optimized_price, 90.0);
        assert_eq!(d.reason(), "AI Strategy: 0.90x Competitor");
    }

    #[test]
    fn ai_multiplier_is_not_clamped() {
        let d = ai_engine(2.5).price_item(&item("D", 40.0, 10.0, 3));
        assert_eq!(d.optimized_price, 100.0);
        assert_eq!(d.basis, PriceBasis::Ai { multiplier: 2.5 });
    }

    #[test]
    fn ai_price_raised_by_margin_guard() {
        let d = ai_engine(0.5).price_item(&item("E", 100.0, 80.0, 11));
        assert_eq!(d.optimized_price, 84.0);
        assert_eq!(d.reason(), "AI Strategy: 0.50x Competitor (Margin Guard)");
    }

    #[test]
    fn slow_movers_may_sell_below_cost() {
        let d = ai_engine(0.1).price_item(&item("F", 100.0, 80.0, 10));
        assert_eq!(d.optimized_price, 10.0);
        assert!(!d.margin_guard_applied);
    }

    #[test]
    fn zero_competitor_price_degrades_only_that_item() {
        let engine = ai_engine(0.9);
        let items = vec![
            item("ok-1", 100.0, 50.0, 3),
            item("zero", 0.0, 50.0, 3),
            item("ok-2", 200.0, 50.0, 3),
        ];
        let out = engine.price_batch(&items);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].optimized_price, 90.0);
        assert_eq!(out[1].optimized_price, 0.0);
        assert_eq!(out[1].basis, PriceBasis::RuleBasedFallback);
        assert_eq!(out[2].optimized_price, 180.0);
    }

    #[test]
    fn zero_competitor_price_with_demand_is_guarded() {
        let d = ai_engine(0.9).price_item(&item("zero", 0.0, 20.0, 30));
        assert_eq!(d.optimized_price, 21.0);
        assert_eq!(d.reason(), "Rule-based Fallback (Margin Guard)");
    }

    #[test]
    fn model_failure_degrades_only_that_item() {
        let engine = PricingEngine::new(
            PricePredictor::new(Some(Arc::new(PoisonedModel {
                multiplier: 0.95,
                poison_stock_level: 99.0,
            }))),
            PricingPolicy::default(),
        );
        let mut poisoned = item("bad", 100.0, 50.0, 3);
        poisoned.stock_level = 99;
        let items = vec![item("good", 100.0, 50.0, 3), poisoned];

        let out = engine.price_batch(&items);
        assert_eq!(out[0].reason(), "AI Strategy: 0.95x Competitor");
        assert_eq!(out[0].optimized_price, 95.0);
        assert_eq!(out[1].reason(), "Rule-based Fallback");
        assert_eq!(out[1].optimized_price, 98.0);
    }

    #[test]
    fn batch_preserves_order_and_length() {
        let items: Vec<_> = (0..50)
            .map(|i| item(&format!("SKU-{i:03}"), 10.0 + i as f64, 5.0, i))
            .collect();
        let out = fallback_engine().price_batch(&items);
        assert_eq!(out.len(), items.len());
        for (input, decision) in items.iter().zip(&out) {
            assert_eq!(input.sku, decision.sku);
        }
    }

    #[test]
    fn empty_batch_yields_empty_result() {
        assert!(ai_engine(1.0).price_batch(&[]).is_empty());
    }
}
