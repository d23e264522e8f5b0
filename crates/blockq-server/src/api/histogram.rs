//! Histogram chart endpoint.

use axum::Json;
use blockq_blocks::parse_histogram_data;
use tracing::{debug, warn};

use crate::chart;
use crate::dto::{HistogramRequest, HistogramResponse};
use crate::error::ApiError;

/// POST /api/visualization/histogram - Render counts as a bar chart.
///
/// Unparseable data and rendering failures come back as `success: false`.
pub async fn histogram(
    Json(req): Json<HistogramRequest>,
) -> Result<Json<HistogramResponse>, ApiError> {
    let data = match parse_histogram_data(&req.data) {
        Ok(data) => data,
        Err(e) => {
            debug!(error = %e, "histogram data rejected");
            return Ok(Json(HistogramResponse::failure(e)));
        }
    };

    let rendered = tokio::task::spawn_blocking(move || chart::render_histogram(&data))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let response = match rendered {
        Ok(png) => HistogramResponse::image(chart::to_data_uri(&png)),
        Err(e) => {
            warn!(error = %e, "histogram rendering failed");
            HistogramResponse::failure(e)
        }
    };
    Ok(Json(response))
}
