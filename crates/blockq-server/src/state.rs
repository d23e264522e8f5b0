//! Application state for the blockq server.

use std::sync::Arc;

use blockq_blocks::QuantumExecutor;
use blockq_hal::Backend;

use crate::config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Runs block programs; stateless, shared by every request.
    pub executor: QuantumExecutor,
    /// Server configuration.
    pub config: ServerConfig,
}

impl AppState {
    /// Create state running programs on `backend` under `config.limits`.
    pub fn new(backend: Arc<dyn Backend>, config: ServerConfig) -> Self {
        Self {
            executor: QuantumExecutor::new(backend).with_limits(config.limits),
            config,
        }
    }
}
