//! Block program execution endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};
use blockq_blocks::ExecutionOutcome;
use tracing::info;

use crate::dto::ExecuteRequest;
use crate::error::ApiError;
use crate::state::AppState;

/// Accepted range for requested shots; the executor clamps further.
const MIN_SHOTS: i64 = 1;
const MAX_SHOTS: i64 = 10_000;

/// POST /api/quantum/execute - Run a block program.
///
/// Malformed requests get a 400. Everything else, including programs that
/// fail validation, gets a 200 with `success: false`.
pub async fn execute(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExecuteRequest>,
) -> Result<Json<ExecutionOutcome>, ApiError> {
    if req.blocks.is_empty() {
        return Err(ApiError::BadRequest("No blocks provided".into()));
    }

    let shots = u32::try_from(req.shots)
        .ok()
        .filter(|_| (MIN_SHOTS..=MAX_SHOTS).contains(&req.shots))
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "Shots must be between {MIN_SHOTS} and {MAX_SHOTS}"
            ))
        })?;

    info!(blocks = req.blocks.len(), shots, "execute request");
    let outcome = state.executor.execute(&req.blocks, shots).await;

    Ok(Json(outcome))
}
