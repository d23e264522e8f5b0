//! Backend capability introspection.
//!
//! Describes what a backend can run: register size and shot ceiling. The
//! simulator reports these at construction and checks submissions against
//! them.

use serde::{Deserialize, Serialize};

/// Hardware capabilities of a quantum backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Maximum number of shots per job.
    pub max_shots: u32,
}

impl Capabilities {
    /// Create capabilities for a statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            max_shots: 100_000,
        }
    }

    /// Set the maximum number of shots.
    #[must_use]
    pub fn with_max_shots(mut self, max_shots: u32) -> Self {
        self.max_shots = max_shots;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(12);
        assert_eq!(caps.name, "simulator");
        assert_eq!(caps.num_qubits, 12);
        assert_eq!(caps.max_shots, 100_000);
        assert_eq!(caps.with_max_shots(10).max_shots, 10);
    }

    #[test]
    fn test_capabilities_serialize() {
        let json = serde_json::to_value(Capabilities::simulator(3)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "simulator", "num_qubits": 3, "max_shots": 100_000})
        );
    }
}
