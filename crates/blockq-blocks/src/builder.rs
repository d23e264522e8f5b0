//! Block program → circuit.

use blockq_ir::{Circuit, QubitId};
use tracing::debug;

use crate::block::{Block, GateBlock};
use crate::error::{ValidateResult, ValidationError};

/// Build a circuit from a block program.
///
/// Blocks before the first creation block are dropped. Each creation block
/// starts over with a fresh circuit. Returns `Ok(None)` if the program never
/// creates a circuit.
pub fn build_circuit(blocks: &[Block]) -> ValidateResult<Option<Circuit>> {
    let mut current: Option<Circuit> = None;

    for block in blocks {
        if let Block::CreateCircuit { num_qubits } = block {
            current = Some(create_circuit(*num_qubits)?);
            continue;
        }
        let Some(circuit) = current.as_mut() else {
            continue;
        };
        match block {
            Block::Gate(gate) => apply_gate(circuit, *gate)?,
            Block::MeasureAll => {
                circuit.measure_all()?;
            }
            Block::Unrecognized { opcode } => {
                debug!(%opcode, "ignoring unrecognized block");
            }
            Block::CreateCircuit { .. } => {}
        }
    }

    Ok(current)
}

fn create_circuit(num_qubits: i64) -> ValidateResult<Circuit> {
    let size = u32::try_from(num_qubits)
        .ok()
        .filter(|&n| n >= 1)
        .ok_or(ValidationError::InvalidQubitCount { got: num_qubits })?;
    debug!(num_qubits = size, "creating circuit");
    Ok(Circuit::with_size("scratch", size, 0))
}

fn apply_gate(circuit: &mut Circuit, gate: GateBlock) -> ValidateResult<()> {
    match gate {
        GateBlock::H { qubit } => {
            circuit.h(qubit_in_range(circuit, qubit)?)?;
        }
        GateBlock::X { qubit } => {
            circuit.x(qubit_in_range(circuit, qubit)?)?;
        }
        GateBlock::Y { qubit } => {
            circuit.y(qubit_in_range(circuit, qubit)?)?;
        }
        GateBlock::Z { qubit } => {
            circuit.z(qubit_in_range(circuit, qubit)?)?;
        }
        GateBlock::Cx { control, target } => {
            let c = qubit_in_range(circuit, control)?;
            let t = qubit_in_range(circuit, target)?;
            if c == t {
                return Err(ValidationError::SameControlTarget);
            }
            circuit.cx(c, t)?;
        }
    }
    Ok(())
}

fn qubit_in_range(circuit: &Circuit, qubit: i64) -> ValidateResult<QubitId> {
    let num_qubits = u32::try_from(circuit.num_qubits()).unwrap_or(u32::MAX);
    u32::try_from(qubit)
        .ok()
        .filter(|&q| q < num_qubits)
        .map(QubitId)
        .ok_or(ValidationError::QubitOutOfRange { qubit, num_qubits })
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockq_ir::StandardGate;

    fn create(n: i64) -> Block {
        Block::CreateCircuit { num_qubits: n }
    }

    fn gate(g: GateBlock) -> Block {
        Block::Gate(g)
    }

    #[test]
    fn test_no_creation_block() {
        let blocks = [gate(GateBlock::H { qubit: 0 }), Block::MeasureAll];
        assert!(build_circuit(&blocks).unwrap().is_none());
        assert!(build_circuit(&[]).unwrap().is_none());
    }

    #[test]
    fn test_bell_program() {
        let blocks = [
            create(2),
            gate(GateBlock::H { qubit: 0 }),
            gate(GateBlock::Cx {
                control: 0,
                target: 1,
            }),
            Block::MeasureAll,
        ];
        let circuit = build_circuit(&blocks).unwrap().unwrap();

        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.num_gates(), 2);
        let gates: Vec<_> = circuit
            .instructions()
            .iter()
            .filter_map(|i| i.as_gate())
            .collect();
        assert_eq!(gates, vec![StandardGate::H, StandardGate::CX]);
        assert!(circuit.measurements_are_terminal());
    }

    #[test]
    fn test_blocks_before_creation_are_dropped() {
        let blocks = [
            gate(GateBlock::X { qubit: 9 }),
            Block::MeasureAll,
            create(1),
            gate(GateBlock::Z { qubit: 0 }),
        ];
        let circuit = build_circuit(&blocks).unwrap().unwrap();
        assert_eq!(circuit.num_ops(), 1);
        assert!(!circuit.has_measurements());
    }

    #[test]
    fn test_later_creation_replaces_circuit() {
        let blocks = [
            create(2),
            gate(GateBlock::H { qubit: 1 }),
            create(3),
            gate(GateBlock::X { qubit: 2 }),
        ];
        let circuit = build_circuit(&blocks).unwrap().unwrap();
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_ops(), 1);
        assert_eq!(circuit.instructions()[0].as_gate(), Some(StandardGate::X));
    }

    #[test]
    fn test_qubit_out_of_range() {
        let err = build_circuit(&[create(2), gate(GateBlock::Y { qubit: 2 })]).unwrap_err();
        assert_eq!(err.to_string(), "Qubit 2 out of range (0-1)");

        let err = build_circuit(&[create(2), gate(GateBlock::H { qubit: -1 })]).unwrap_err();
        assert_eq!(err.to_string(), "Qubit -1 out of range (0-1)");

        assert!(build_circuit(&[create(2), gate(GateBlock::Y { qubit: 1 })]).is_ok());
    }

    #[test]
    fn test_cx_checks_control_before_target() {
        let err = build_circuit(&[
            create(2),
            gate(GateBlock::Cx {
                control: 4,
                target: 3,
            }),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "Qubit 4 out of range (0-1)");

        let err = build_circuit(&[
            create(2),
            gate(GateBlock::Cx {
                control: 1,
                target: 3,
            }),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "Qubit 3 out of range (0-1)");
    }

    #[test]
    fn test_cx_same_control_and_target() {
        let err = build_circuit(&[
            create(3),
            gate(GateBlock::Cx {
                control: 1,
                target: 1,
            }),
        ])
        .unwrap_err();
        assert!(matches!(err, ValidationError::SameControlTarget));
    }

    #[test]
    fn test_out_of_range_beats_same_operands() {
        let err = build_circuit(&[
            create(1),
            gate(GateBlock::Cx {
                control: 5,
                target: 5,
            }),
        ])
        .unwrap_err();
        assert!(matches!(err, ValidationError::QubitOutOfRange { qubit: 5, .. }));
    }

    #[test]
    fn test_empty_register_rejected() {
        let err = build_circuit(&[create(0)]).unwrap_err();
        assert_eq!(err.to_string(), "Circuit must have at least 1 qubit, got 0");
        assert!(matches!(
            build_circuit(&[create(-3)]),
            Err(ValidationError::InvalidQubitCount { got: -3 })
        ));
    }

    #[test]
    fn test_each_measure_all_adds_a_register() {
        let blocks = [
            create(2),
            gate(GateBlock::X { qubit: 0 }),
            Block::MeasureAll,
            gate(GateBlock::X { qubit: 1 }),
            Block::MeasureAll,
        ];
        let circuit = build_circuit(&blocks).unwrap().unwrap();
        assert_eq!(circuit.num_clbits(), 4);
        assert_eq!(circuit.clbit_registers(), &[2, 2]);
        assert!(!circuit.measurements_are_terminal());
    }

    #[test]
    fn test_unrecognized_blocks_are_ignored() {
        let blocks = [
            create(1),
            Block::Unrecognized {
                opcode: "quantum_gateT".into(),
            },
            Block::MeasureAll,
        ];
        let circuit = build_circuit(&blocks).unwrap().unwrap();
        assert_eq!(circuit.num_gates(), 0);
        assert!(circuit.has_measurements());
    }
}
