//! Execution result types.
//!
//! Bitstring ordering: the rightmost bit corresponds to the lowest-indexed
//! classical bit (OpenQASM 3 / Qiskit convention). `"01"` means bit 0 read `1`
//! and bit 1 read `0`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Measurement counts from circuit execution.
///
/// Serializes as a flat JSON object (`{"00": 512, "11": 512}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create counts from (bitstring, count) pairs; duplicates are summed.
    pub fn from_pairs(iter: impl IntoIterator<Item = (impl Into<String>, u64)>) -> Self {
        let mut counts = Self::new();
        for (k, v) in iter {
            counts.insert(k, v);
        }
        counts
    }

    /// Add `count` occurrences of a bitstring.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_default() += count;
    }

    /// Get the count for a bitstring.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Iterate over (bitstring, count) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// Get the total number of shots.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Get sorted counts: count descending, then bitstring ascending.
    pub fn sorted(&self) -> Vec<(&String, &u64)> {
        let mut items: Vec<_> = self.counts.iter().collect();
        items.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        items
    }

    /// Get the number of unique bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if counts are empty.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Result of circuit execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measurement counts.
    pub counts: Counts,
    /// Number of shots executed.
    pub shots: u32,
    /// Execution time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a new execution result.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
        }
    }

    /// Set the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, time_ms: u64) -> Self {
        self.execution_time_ms = Some(time_ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_basic() {
        let mut counts = Counts::new();
        counts.insert("00", 500);
        counts.insert("11", 400);
        counts.insert("11", 100);

        assert_eq!(counts.get("00"), 500);
        assert_eq!(counts.get("11"), 500);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.total_shots(), 1000);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_sorted_breaks_ties_by_bitstring() {
        let counts = Counts::from_pairs([("11", 5), ("01", 9), ("00", 5)]);
        let sorted: Vec<_> = counts.sorted().into_iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(sorted, vec![("01", 9), ("00", 5), ("11", 5)]);
    }

    #[test]
    fn test_counts_serialize_as_flat_object() {
        let counts = Counts::from_pairs([("0", 3)]);
        assert_eq!(serde_json::to_string(&counts).unwrap(), r#"{"0":3}"#);

        let back: Counts = serde_json::from_str(r#"{"1":7,"0":1}"#).unwrap();
        assert_eq!(back.get("1"), 7);
        assert_eq!(back.total_shots(), 8);
    }

    #[test]
    fn test_execution_result_builder() {
        let result = ExecutionResult::new(Counts::from_pairs([("1", 2)]), 2);
        assert_eq!(result.execution_time_ms, None);

        let result = result.with_execution_time(5);
        assert_eq!(result.execution_time_ms, Some(5));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({"counts": {"1": 2}, "shots": 2, "execution_time_ms": 5})
        );
    }
}
