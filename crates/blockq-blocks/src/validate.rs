//! Pre-build scan of a block program against [`Limits`].

use tracing::debug;

use crate::block::Block;
use crate::error::{ValidateResult, ValidationError};
use crate::limits::Limits;

/// Check a block program against the qubit and gate ceilings.
///
/// Every creation block is checked on its own; the first one over the
/// ceiling fails. Gate blocks are counted across the whole program and the
/// total is checked once the scan is done. Qubit indices are left to
/// [`build_circuit`](crate::build_circuit).
pub fn validate_blocks(blocks: &[Block], limits: &Limits) -> ValidateResult<()> {
    let mut gate_count = 0usize;

    for block in blocks {
        if let Block::CreateCircuit { num_qubits } = block {
            if *num_qubits > i64::from(limits.max_qubits) {
                return Err(ValidationError::TooManyQubits {
                    max: limits.max_qubits,
                });
            }
        }
        if block.counts_as_gate() {
            gate_count += 1;
        }
    }

    debug!(gate_count, "block program scanned");
    if gate_count > limits.max_gates {
        return Err(ValidationError::TooManyGates {
            max: limits.max_gates,
        });
    }

    Ok(())
}
