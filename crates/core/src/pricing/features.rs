use crate::domain::product::ProductInput;
use std::fmt;

/// Number of model inputs, in the order of [`FeatureVector::as_array`].
pub const FEATURE_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub cost_ratio: f64,
    pub stock_level: f64,
    pub units_sold: f64,
    pub units_ordered: f64,
}

impl FeatureVector {
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.cost_ratio,
            self.stock_level,
            self.units_sold,
            self.units_ordered,
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureError {
    ZeroCompetitorPrice,
    NonFiniteCostRatio { cost_price: f64, competitor_price: f64 },
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureError::ZeroCompetitorPrice => {
                f.write_str("cost_ratio undefined: competitor_price is zero")
            }
            FeatureError::NonFiniteCostRatio {
                cost_price,
                competitor_price,
            } => write!(
                f,
                "cost_ratio is not finite (cost_price={cost_price}, competitor_price={competitor_price})"
            ),
        }
    }
}

impl std::error::Error for FeatureError {}

pub fn derive_features(item: &ProductInput) -> Result<FeatureVector, FeatureError> {
    if item.competitor_price == 0.0 {
        return Err(FeatureError::ZeroCompetitorPrice);
    }

    let cost_ratio = item.cost_price / item.competitor_price;
    if !cost_ratio.is_finite() {
        return Err(FeatureError::NonFiniteCostRatio {
            cost_price: item.cost_price,
            competitor_price: item.competitor_price,
        });
    }

    Ok(FeatureVector {
        cost_ratio,
        stock_level: item.stock_level as f64,
        units_sold: item.units_sold as f64,
        units_ordered: item.units_ordered as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(competitor_price: f64, cost_price: f64) -> ProductInput {
        ProductInput {
            sku: "SKU-1".to_string(),
            current_price: 110.0,
            competitor_price,
            cost_price,
            stock_level: 12,
            units_sold: 7,
            units_ordered: 3,
        }
    }

    #[test]
    fn derives_ratio_and_passes_counts_through() {
        let fv = derive_features(&item(80.0, 20.0)).unwrap();
        assert_eq!(fv.as_array(), [0.25, 12.0, 7.0, 3.0]);
    }

    #[test]
    fn zero_competitor_price_is_an_error() {
        assert_eq!(
            derive_features(&item(0.0, 20.0)),
            Err(FeatureError::ZeroCompetitorPrice)
        );
    }

    #[test]
    fn zero_cost_gives_zero_ratio() {
        let fv = derive_features(&item(50.0, 0.0)).unwrap();
        assert_eq!(fv.cost_ratio, 0.0);
    }
}
