//! Running block programs end to end.

use std::sync::Arc;
use std::time::Instant;

use blockq_hal::{Backend, Counts};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::block::Block;
use crate::builder::build_circuit;
use crate::error::ExecuteError;
use crate::format::format_counts;
use crate::limits::Limits;
use crate::validate::validate_blocks;

const NO_CIRCUIT: &str = "No quantum circuit created. Use 'quantum_createCircuit' block first.";

/// What one execution produced.
///
/// On success `counts` and `result_text` are set; on failure only `error` is.
/// `execution_time` is in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub counts: Option<Counts>,
    pub result_text: Option<String>,
    pub error: Option<String>,
    pub execution_time: f64,
}

impl ExecutionOutcome {
    fn success(counts: Counts, result_text: String, execution_time: f64) -> Self {
        Self {
            success: true,
            counts: Some(counts),
            result_text: Some(result_text),
            error: None,
            execution_time,
        }
    }

    fn failure(error: impl Into<String>, execution_time: f64) -> Self {
        Self {
            success: false,
            counts: None,
            result_text: None,
            error: Some(error.into()),
            execution_time,
        }
    }
}

/// Validates, builds and runs block programs on a backend.
///
/// Holds no per-call state; share one instance across requests.
#[derive(Clone)]
pub struct QuantumExecutor {
    backend: Arc<dyn Backend>,
    limits: Limits,
}

impl QuantumExecutor {
    /// Create an executor with [`Limits::DEFAULT`].
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            limits: Limits::DEFAULT,
        }
    }

    /// Replace the limits.
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Whether the backend can take work. Errors count as unavailable.
    pub async fn is_available(&self) -> bool {
        match self.backend.availability().await {
            Ok(availability) => {
                if let Some(message) = &availability.status_message {
                    debug!(status = %message, "backend status");
                }
                availability.is_available
            }
            Err(e) => {
                warn!(error = %e, "availability check failed");
                false
            }
        }
    }

    /// Run a block program for `shots` shots.
    ///
    /// Never fails; problems are reported through [`ExecutionOutcome::error`].
    /// The backend runs at most [`Limits::max_shots`] shots, but percentages in
    /// the summary are computed against the requested `shots`.
    #[instrument(skip(self, blocks), fields(blocks = blocks.len(), backend = self.backend.name()))]
    pub async fn execute(&self, blocks: &[Block], shots: u32) -> ExecutionOutcome {
        if !self.is_available().await {
            warn!("backend unavailable");
            return ExecutionOutcome::failure(
                format!("{} is not installed", self.backend.name()),
                0.0,
            );
        }

        let start = Instant::now();
        match self.run(blocks, shots).await {
            Ok(Some(counts)) => {
                let elapsed = start.elapsed().as_secs_f64();
                let text = format_counts(&counts, u64::from(shots));
                info!(outcomes = counts.len(), elapsed, "execution succeeded");
                ExecutionOutcome::success(counts, text, elapsed)
            }
            Ok(None) => {
                info!("program never created a circuit");
                ExecutionOutcome::failure(NO_CIRCUIT, 0.0)
            }
            Err(e) => {
                let elapsed = start.elapsed().as_secs_f64();
                match &e {
                    ExecuteError::Validation(_) => info!(error = %e, "program rejected"),
                    _ => warn!(error = %e, "execution failed"),
                }
                ExecutionOutcome::failure(e.to_string(), elapsed)
            }
        }
    }

    async fn run(&self, blocks: &[Block], shots: u32) -> Result<Option<Counts>, ExecuteError> {
        validate_blocks(blocks, &self.limits)?;
        let Some(circuit) = build_circuit(blocks)? else {
            return Ok(None);
        };

        let clamped = self.limits.clamp_shots(shots);
        debug!(
            qubits = circuit.num_qubits(),
            gates = circuit.num_gates(),
            shots,
            clamped,
            "submitting circuit"
        );

        let job_id = self.backend.submit(&circuit, clamped).await?;
        let result = self.backend.wait(&job_id).await?;
        debug!(
            %job_id,
            shots = result.shots,
            backend_ms = result.execution_time_ms,
            "job finished"
        );
        Ok(Some(result.counts))
    }
}
