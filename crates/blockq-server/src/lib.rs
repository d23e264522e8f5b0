//! blockq server - HTTP front end for the Scratch quantum extension.
//!
//! Routes:
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/` | service banner |
//! | GET | `/api/quantum/health` | liveness plus simulator availability |
//! | POST | `/api/quantum/execute` | run a block program |
//! | POST | `/api/visualization/histogram` | render counts as a PNG bar chart |
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use blockq_adapter_sim::SimulatorBackend;
//! use blockq_server::{AppState, ServerConfig, create_router};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let backend = Arc::new(SimulatorBackend::new());
//!     let state = Arc::new(AppState::new(backend, config.clone()));
//!
//!     let app = create_router(state);
//!     let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod dto;
pub mod error;
pub mod server;
pub mod state;

pub use config::{ServerArgs, ServerConfig};
pub use dto::{
    ExecuteRequest, HealthResponse, HistogramRequest, HistogramResponse, RootResponse,
};
pub use error::ApiError;
pub use server::create_router;
pub use state::AppState;
