//! Request and response bodies.
//!
//! Execution results are returned as [`blockq_blocks::ExecutionOutcome`]
//! directly.

use blockq_blocks::Block;
use serde::{Deserialize, Serialize};

fn default_shots() -> i64 {
    1024
}

/// Body of `POST /api/quantum/execute`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteRequest {
    /// Block program, in stack order.
    pub blocks: Vec<Block>,
    /// Requested shots; range-checked by the handler.
    #[serde(default = "default_shots")]
    pub shots: i64,
}

/// Body of `POST /api/visualization/histogram`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistogramRequest {
    /// Count data as a JSON/Python mapping or a ranked summary line.
    pub data: String,
}

/// Response of `POST /api/visualization/histogram`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramResponse {
    pub success: bool,
    /// `data:image/png;base64,...`
    pub image_base64: Option<String>,
    pub error: Option<String>,
}

impl HistogramResponse {
    pub fn image(data_uri: String) -> Self {
        Self {
            success: true,
            image_base64: Some(data_uri),
            error: None,
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            image_base64: None,
            error: Some(error.to_string()),
        }
    }
}

/// Response of `GET /api/quantum/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" if responding.
    pub status: String,
    /// Service identifier.
    pub service: String,
    /// Whether the simulator backend is taking work.
    pub simulator_available: bool,
}

impl HealthResponse {
    pub fn new(simulator_available: bool) -> Self {
        Self {
            status: "ok".to_string(),
            service: "quantum-backend".to_string(),
            simulator_available,
        }
    }
}

/// Response of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
}

impl Default for RootResponse {
    fn default() -> Self {
        Self {
            message: "Scratch Quantum API".to_string(),
            status: "running".to_string(),
        }
    }
}
