//! Service limits.

/// Upper bounds applied to every block program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest register a creation block may request (inclusive).
    pub max_qubits: u32,
    /// Largest number of gate blocks in one program (inclusive).
    pub max_gates: usize,
    /// Shots actually sent to the backend are clamped to this.
    pub max_shots: u32,
}

impl Limits {
    /// The limits the service ships with.
    pub const DEFAULT: Self = Self {
        max_qubits: 10,
        max_gates: 100,
        max_shots: 10_000,
    };

    /// Clamp a requested shot count to [`Limits::max_shots`].
    pub fn clamp_shots(&self, requested: u32) -> u32 {
        requested.min(self.max_shots)
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_qubits, 10);
        assert_eq!(limits.max_gates, 100);
        assert_eq!(limits.max_shots, 10_000);
    }

    #[test]
    fn test_clamp_shots() {
        let limits = Limits::DEFAULT;
        assert_eq!(limits.clamp_shots(1), 1);
        assert_eq!(limits.clamp_shots(10_000), 10_000);
        assert_eq!(limits.clamp_shots(50_000), 10_000);
    }
}
