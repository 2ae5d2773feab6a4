use anyhow::ensure;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub products: Vec<ProductInput>,
}

/// Raw per-item pricing signals, as received at the batch boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub sku: String,
    pub current_price: f64,
    pub competitor_price: f64,
    pub cost_price: f64,
    pub stock_level: u64,
    pub units_sold: u64,
    pub units_ordered: u64,
}

impl ProductInput {
    /// Boundary check. A zero competitor price is accepted here: the pipeline
    /// degrades such items to the rule-based price instead of rejecting the batch.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.sku.trim().is_empty(), "sku must be non-empty");

        for (field, value) in [
            ("current_price", self.current_price),
            ("competitor_price", self.competitor_price),
            ("cost_price", self.cost_price),
        ] {
            ensure!(
                value.is_finite() && value >= 0.0,
                "{field} must be a finite non-negative number (sku={}, got {value})",
                self.sku
            );
        }

        Ok(())
    }
}

impl BatchRequest {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (idx, item) in self.products.iter().enumerate() {
            item.validate()
                .map_err(|e| anyhow::anyhow!("products[{idx}]: {e}"))?;
        }
        Ok(())
    }
}
