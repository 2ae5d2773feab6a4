use super::PricingPolicy;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardOutcome {
    pub price: f64,
    pub applied: bool,
}

/// Raises `raw_price` to the minimum-margin floor for items with established demand.
/// Never lowers a price.
pub fn apply(raw_price: f64, cost_price: f64, units_sold: u64, policy: &PricingPolicy) -> GuardOutcome {
    let min_margin_price = cost_price * policy.min_margin_factor;

    if units_sold > policy.guard_min_units_sold && raw_price < min_margin_price {
        return GuardOutcome {
            price: min_margin_price,
            applied: true,
        };
    }

    GuardOutcome {
        price: raw_price,
        applied: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::round_to_cents;

    #[test]
    fn fires_for_selling_items_below_floor() {
        let out = apply(98.0, 97.0, 20, &PricingPolicy::default());
        assert!(out.applied);
        assert_eq!(round_to_cents(out.price), 101.85);
    }

    #[test]
    fn exempts_slow_movers_regardless_of_price() {
        let policy = PricingPolicy::default();
        for units_sold in [0, 5, 10] {
            let out = apply(1.0, 500.0, units_sold, &policy);
            assert!(!out.applied, "units_sold={units_sold}");
            assert_eq!(out.price, 1.0);
        }
    }

    #[test]
    fn leaves_prices_at_or_above_floor() {
        let policy = PricingPolicy::default();
        let out = apply(105.0, 100.0, 11, &policy);
        assert!(!out.applied);
        assert_eq!(out.price, 105.0);

        let out = apply(150.0, 100.0, 50, &policy);
        assert!(!out.applied);
        assert_eq!(out.price, 150.0);
    }

    #[test]
    fn threshold_is_strictly_greater_than() {
        let policy = PricingPolicy::default();
        assert!(!apply(50.0, 100.0, 10, &policy).applied);
        assert!(apply(50.0, 100.0, 11, &policy).applied);
    }
}
