//! High-level circuit builder API.

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit over a fixed qubit register.
///
/// Instructions are kept in application order. Every instruction is checked
/// against the register when it is applied, so a `Circuit` never references a
/// qubit or classical bit it does not own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits, fixed at construction.
    num_qubits: u32,
    /// Number of classical bits.
    num_clbits: u32,
    /// Sizes of the classical registers, in allocation order.
    clbit_registers: Vec<u32>,
    /// Applied instructions in order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            clbit_registers: if num_clbits > 0 { vec![num_clbits] } else { vec![] },
            instructions: vec![],
        }
    }

    /// Append a classical register of `size` bits and return its first bit.
    pub fn add_clbit_register(&mut self, size: u32) -> ClbitId {
        let first = ClbitId(self.num_clbits);
        self.num_clbits += size;
        self.clbit_registers.push(size);
        first
    }

    /// Append an instruction after checking its operands.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let gate_name = instruction.as_gate().map(|g| g.name().to_string());

        if let InstructionKind::Gate(gate) = instruction.kind {
            let got = instruction.qubits.len() as u32;
            if got != gate.num_qubits() {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: gate.num_qubits(),
                    got,
                });
            }
        }

        for &qubit in &instruction.qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        for &clbit in &instruction.clbits {
            if clbit.0 >= self.num_clbits {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Measure every qubit into a fresh classical register.
    ///
    /// Each call allocates its own register, so qubit `i` lands in bit `i` of
    /// that register and earlier readings are kept.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let first = self.add_clbit_register(self.num_qubits).0;

        let qubits = (0..self.num_qubits).map(QubitId);
        let clbits = (first..first + self.num_qubits).map(ClbitId);
        self.apply(Instruction::measure_all(qubits, clbits)?)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Classical register sizes in allocation order; they sum to
    /// [`Circuit::num_clbits`].
    pub fn clbit_registers(&self) -> &[u32] {
        &self.clbit_registers
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of applied instructions, measurements included.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Number of gate instructions.
    pub fn num_gates(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Whether any measurement has been applied.
    pub fn has_measurements(&self) -> bool {
        self.instructions.iter().any(Instruction::is_measure)
    }

    /// Whether every measurement comes after every gate.
    ///
    /// Such circuits can be sampled from a single final statevector.
    pub fn measurements_are_terminal(&self) -> bool {
        match self.instructions.iter().position(Instruction::is_measure) {
            Some(first) => self.instructions[first..].iter().all(Instruction::is_measure),
            None => true,
        }
    }
}
