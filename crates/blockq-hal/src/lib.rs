//! blockq Hardware Abstraction Layer
//!
//! The seam between the block compiler and whatever actually runs circuits.
//! The compiler only ever sees the [`Backend`] trait, so the bundled
//! statevector simulator can be swapped for another engine without touching
//! validation or formatting code.
//!
//! - [`Backend`]: job lifecycle (availability, submit, status, result)
//! - [`Capabilities`]: what a backend can run
//! - [`ExecutionResult`] and [`Counts`]: measurement outcomes
//!
//! # Example: Running a Circuit
//!
//! ```ignore
//! use blockq_adapter_sim::SimulatorBackend;
//! use blockq_hal::Backend;
//! use blockq_ir::{Circuit, QubitId};
//!
//! let backend = SimulatorBackend::new();
//! let mut circuit = Circuit::with_size("bell", 2, 0);
//! circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.measure_all()?;
//!
//! let job_id = backend.submit(&circuit, 1000).await?;
//! let result = backend.wait(&job_id).await?;
//!
//! for (bitstring, count) in result.counts.sorted() {
//!     println!("{bitstring}: {count}");
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod result;

pub use backend::{Backend, BackendAvailability};
pub use capability::Capabilities;
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use result::{Counts, ExecutionResult};
