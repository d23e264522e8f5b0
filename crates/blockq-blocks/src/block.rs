//! Block programs.
//!
//! The Scratch extension posts each block as an opcode plus a loose map of
//! arguments. [`RawBlock`] is that wire shape; [`Block`] is the typed form the
//! rest of the crate works with. Conversion happens once, during
//! deserialization, so downstream code never looks at argument maps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opcode of the circuit-creation block.
pub const CREATE_CIRCUIT: &str = "quantum_createCircuit";
/// Prefix shared by every gate opcode, recognized or not.
pub const GATE_PREFIX: &str = "quantum_gate";
/// Opcode of the measure-all block.
pub const MEASURE_ALL: &str = "quantum_measureAll";

const GATE_H: &str = "quantum_gateH";
const GATE_X: &str = "quantum_gateX";
const GATE_Y: &str = "quantum_gateY";
const GATE_Z: &str = "quantum_gateZ";
const GATE_CX: &str = "quantum_gateCX";

/// A block as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    /// Block opcode, e.g. `quantum_gateH`.
    pub opcode: String,
    /// Block inputs keyed by Scratch argument name.
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl RawBlock {
    /// Create a block with no arguments.
    pub fn new(opcode: impl Into<String>) -> Self {
        Self {
            opcode: opcode.into(),
            args: Map::new(),
        }
    }

    /// Add an argument.
    #[must_use]
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    fn int_arg(&self, name: &str, default: i64) -> i64 {
        self.args
            .get(name)
            .and_then(coerce_int)
            .unwrap_or(default)
    }
}

/// A single-qubit or two-qubit gate block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateBlock {
    H { qubit: i64 },
    X { qubit: i64 },
    Y { qubit: i64 },
    Z { qubit: i64 },
    Cx { control: i64, target: i64 },
}

/// A typed block.
///
/// Qubit indices are kept as `i64` so that out-of-range and negative input
/// reaches the builder, which reports it to the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawBlock")]
pub enum Block {
    /// Allocate a fresh circuit, replacing any previous one.
    CreateCircuit { num_qubits: i64 },
    /// Apply a gate to the current circuit.
    Gate(GateBlock),
    /// Measure every qubit.
    MeasureAll,
    /// Any opcode outside the vocabulary; ignored by the builder.
    Unrecognized { opcode: String },
}

impl Block {
    /// Whether this block counts toward the gate limit.
    ///
    /// Unknown opcodes that carry the gate prefix count too.
    pub fn counts_as_gate(&self) -> bool {
        match self {
            Block::Gate(_) => true,
            Block::Unrecognized { opcode } => opcode.starts_with(GATE_PREFIX),
            Block::CreateCircuit { .. } | Block::MeasureAll => false,
        }
    }
}

impl From<&RawBlock> for Block {
    fn from(raw: &RawBlock) -> Self {
        match raw.opcode.as_str() {
            CREATE_CIRCUIT => Block::CreateCircuit {
                num_qubits: raw.int_arg("NUM_QUBITS", 1),
            },
            GATE_H => Block::Gate(GateBlock::H {
                qubit: raw.int_arg("QUBIT", 0),
            }),
            GATE_X => Block::Gate(GateBlock::X {
                qubit: raw.int_arg("QUBIT", 0),
            }),
            GATE_Y => Block::Gate(GateBlock::Y {
                qubit: raw.int_arg("QUBIT", 0),
            }),
            GATE_Z => Block::Gate(GateBlock::Z {
                qubit: raw.int_arg("QUBIT", 0),
            }),
            GATE_CX => Block::Gate(GateBlock::Cx {
                control: raw.int_arg("CONTROL", 0),
                target: raw.int_arg("TARGET", 1),
            }),
            MEASURE_ALL => Block::MeasureAll,
            other => Block::Unrecognized {
                opcode: other.to_string(),
            },
        }
    }
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        Block::from(&raw)
    }
}

/// Read a Scratch input as an integer.
///
/// Scratch hands numbers over as JSON numbers or numeric strings; fractional
/// values truncate toward zero. Anything else yields `None`.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.trunc() as i64)
}
