//! blockq block compiler
//!
//! Turns the block programs produced by the Scratch quantum extension into
//! [`blockq_ir::Circuit`]s, enforces the service limits, runs them on a
//! [`blockq_hal::Backend`] and renders the measurement counts.
//!
//! The pipeline for one request is:
//!
//! ```text
//!   [Block] ──→ validate_blocks ──→ build_circuit ──→ Backend ──→ format_counts
//!            (limits, pre-scan)   (bounds checks)    (shots)     (top 5, %)
//! ```
//!
//! [`QuantumExecutor::execute`] drives all four steps and folds every failure
//! into an [`ExecutionOutcome`]. [`parse_histogram_data`] is independent and
//! normalizes count data pasted back from the Scratch stage for charting.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use blockq_adapter_sim::SimulatorBackend;
//! use blockq_blocks::{Block, QuantumExecutor};
//!
//! let blocks: Vec<Block> = serde_json::from_str(r#"[
//!     {"opcode": "quantum_createCircuit", "args": {"NUM_QUBITS": 2}},
//!     {"opcode": "quantum_gateH", "args": {"QUBIT": 0}},
//!     {"opcode": "quantum_gateCX", "args": {"CONTROL": 0, "TARGET": 1}},
//!     {"opcode": "quantum_measureAll"}
//! ]"#)?;
//!
//! let executor = QuantumExecutor::new(Arc::new(SimulatorBackend::new()));
//! let outcome = executor.execute(&blocks, 1024).await;
//! println!("{}", outcome.result_text.unwrap_or_default());
//! ```

pub mod block;
pub mod builder;
pub mod error;
pub mod executor;
pub mod format;
pub mod histogram;
pub mod limits;
pub mod validate;

pub use block::{Block, GateBlock, RawBlock};
pub use builder::build_circuit;
pub use error::{ExecuteError, HistogramError, ValidationError};
pub use executor::{ExecutionOutcome, QuantumExecutor};
pub use format::format_counts;
pub use histogram::{HistogramData, parse_histogram_data};
pub use limits::Limits;
pub use validate::validate_blocks;
