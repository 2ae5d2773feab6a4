use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use pricebrain_core::domain::decision::{BatchResponse, BatchSummary};
use pricebrain_core::domain::product::BatchRequest;
use pricebrain_core::pricing::PricingEngine;

#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: Arc<PricingEngine>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/model", get(get_model))
        .route("/optimize-batch", post(optimize_batch))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct ModelStatus {
    model_loaded: bool,
    model: Option<String>,
}

async fn get_model(State(state): State<AppState>) -> Json<ModelStatus> {
    let predictor = state.engine.predictor();
    Json(ModelStatus {
        model_loaded: predictor.is_available(),
        model: predictor.model_name().map(str::to_string),
    })
}

#[derive(Debug)]
pub enum ApiError {
    Unprocessable(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unprocessable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "error": msg })),
            )
                .into_response(),
            ApiError::Internal(err) => {
                sentry_anyhow::capture_anyhow(&err);
                tracing::error!(error = %err, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

async fn optimize_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::Unprocessable(e.body_text()))?;
    request
        .validate()
        .map_err(|e| ApiError::Unprocessable(e.to_string()))?;

    let batch_id = Uuid::new_v4();
    let span = tracing::info_span!("optimize_batch", %batch_id, items = request.products.len());

    price_batch(state.engine.clone(), request).instrument(span).await
}

async fn price_batch(
    engine: Arc<PricingEngine>,
    request: BatchRequest,
) -> Result<Json<BatchResponse>, ApiError> {
    let decisions = tokio::task::spawn_blocking(move || engine.price_batch(&request.products))
        .await
        .map_err(|e| ApiError::Internal(anyhow::Error::new(e).context("pricing task failed")))?;

    let summary = BatchSummary::from_decisions(&decisions);
    tracing::info!(
        ai_priced = summary.ai_priced,
        fallback_priced = summary.fallback_priced,
        margin_guarded = summary.margin_guarded,
        "batch priced"
    );

    Ok(Json(BatchResponse::from_decisions(&decisions)))
}
