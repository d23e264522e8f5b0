//! Error types for the block compiler.

use blockq_hal::HalError;
use blockq_ir::IrError;
use thiserror::Error;

/// A problem with the block program itself.
///
/// Messages are shown to the Scratch user as-is.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// A creation block asked for more qubits than allowed.
    #[error("Maximum {max} qubits allowed")]
    TooManyQubits {
        /// The qubit ceiling.
        max: u32,
    },

    /// The program contains more gate blocks than allowed.
    #[error("Maximum {max} gates allowed")]
    TooManyGates {
        /// The gate ceiling.
        max: usize,
    },

    /// A creation block asked for an empty register.
    #[error("Circuit must have at least 1 qubit, got {got}")]
    InvalidQubitCount {
        /// The requested register size.
        got: i64,
    },

    /// A gate referenced a qubit outside the register.
    #[error("Qubit {qubit} out of range (0-{})", .num_qubits.saturating_sub(1))]
    QubitOutOfRange {
        /// The offending index.
        qubit: i64,
        /// Register size of the current circuit.
        num_qubits: u32,
    },

    /// A CX block used the same qubit twice.
    #[error("Control and target qubits must be different")]
    SameControlTarget,

    /// The circuit IR rejected an instruction.
    #[error(transparent)]
    Circuit(#[from] IrError),
}

/// Result type for validation and circuit building.
pub type ValidateResult<T> = Result<T, ValidationError>;

/// Failure while executing a block program.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExecuteError {
    /// The program was rejected before reaching the backend.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend or something else failed unexpectedly.
    #[error("Execution error: {0}")]
    Unexpected(#[from] HalError),
}

/// Failure while normalizing histogram input.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistogramError {
    /// The text looked like a count mapping but could not be parsed as one.
    #[error("Invalid count mapping: {0}")]
    InvalidMapping(String),

    /// A ranked-summary entry carried a count that does not fit in a `u64`.
    #[error("Invalid count for |{label}>: {count}")]
    InvalidCount {
        /// The state label of the entry.
        label: String,
        /// The digits as written.
        count: String,
    },

    /// Ranked-summary text contained no `|state>: count` entries.
    #[error("Could not parse text result format")]
    UnrecognizedText,
}

impl From<serde_json::Error> for HistogramError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidMapping(e.to_string())
    }
}
