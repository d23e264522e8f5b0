//! blockq Local Statevector Simulator
//!
//! Runs the circuits produced by the block compiler. The block palette caps
//! programs at a handful of qubits, so a dense statevector is both exact and
//! fast enough to answer interactively.
//!
//! # Features
//!
//! - **Exact Simulation**: full statevector over the block gate set
//!   (H, X, Y, Z, CX)
//! - **Measurement Sampling**: terminal measurements are sampled from one
//!   final state; mid-circuit measurements collapse the state shot by shot
//! - **Reproducible Runs**: [`SimulatorBackend::with_seed`] fixes the sampler
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//!
//! # Example
//!
//! ```ignore
//! use blockq_adapter_sim::SimulatorBackend;
//! use blockq_hal::Backend;
//! use blockq_ir::{Circuit, QubitId};
//!
//! let backend = SimulatorBackend::new();
//! let mut circuit = Circuit::with_size("bell", 2, 0);
//! circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.measure_all()?;
//! let job_id = backend.submit(&circuit, 1000).await?;
//! let result = backend.wait(&job_id).await?;
//!
//! // Expect ~50% |00⟩ and ~50% |11⟩
//! println!("Results: {:?}", result.counts);
//! ```

mod simulator;
mod statevector;

pub use simulator::SimulatorBackend;
