use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use pricebrain_core::domain::decision::{BatchSummary, OptimizedProduct, PricingDecision};
use pricebrain_core::domain::product::BatchRequest;

#[derive(Debug, Serialize)]
pub struct PricingReport {
    pub generated_at: DateTime<Utc>,
    pub model_loaded: bool,
    pub summary: BatchSummary,
    pub optimized_products: Vec<OptimizedProduct>,
}

impl PricingReport {
    pub fn new(
        generated_at: DateTime<Utc>,
        model_loaded: bool,
        decisions: &[PricingDecision],
    ) -> Self {
        Self {
            generated_at,
            model_loaded,
            summary: BatchSummary::from_decisions(decisions),
            optimized_products: decisions.iter().map(OptimizedProduct::from).collect(),
        }
    }
}

pub fn parse_request(text: &str) -> anyhow::Result<BatchRequest> {
    let request = serde_json::from_str::<BatchRequest>(text)
        .context("input is not a valid batch request")?;
    request.validate().context("batch request failed validation")?;
    Ok(request)
}
