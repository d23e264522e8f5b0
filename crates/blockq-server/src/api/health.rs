//! Banner and health check endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::dto::{HealthResponse, RootResponse};
use crate::state::AppState;

/// GET / - Service banner.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse::default())
}

/// GET /api/quantum/health - Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::new(state.executor.is_available().await))
}
