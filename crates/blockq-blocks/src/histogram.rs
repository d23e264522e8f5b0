//! Normalizing count data for the histogram chart.
//!
//! Scratch projects pass results back as text, in one of three shapes:
//!
//! - a JSON object, `{"00": 512, "11": 512}`;
//! - a Python-style dict, `{'00': 512, '11': 512}`;
//! - the ranked summary produced by [`format_counts`](crate::format_counts),
//!   `|11>: 525 (52.5%), |00>: 475 (47.5%)`.
//!
//! All three normalize to a [`HistogramData`] that keeps the order labels
//! first appeared in, which is the order bars are drawn in.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::HistogramError;

/// Ordered label → count mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistogramData {
    entries: Vec<(String, u64)>,
}

impl HistogramData {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the count for a label.
    ///
    /// A label seen before keeps its original position and takes the new count.
    pub fn insert(&mut self, label: impl Into<String>, count: u64) {
        let label = label.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => *existing = count,
            None => self.entries.push((label, count)),
        }
    }

    /// Count for a label, if present.
    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| *c)
    }

    /// Iterate entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }

    /// Labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Largest count, or 0 when empty.
    pub fn max_count(&self) -> u64 {
        self.entries.iter().map(|(_, c)| *c).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for HistogramData {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (label, count) in iter {
            data.insert(label, count);
        }
        data
    }
}

impl Serialize for HistogramData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, count) in &self.entries {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HistogramData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = HistogramData;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of labels to non-negative integer counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut data = HistogramData::new();
                while let Some((label, count)) = access.next_entry::<String, u64>()? {
                    data.insert(label, count);
                }
                Ok(data)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Parse histogram input in any of the supported shapes.
pub fn parse_histogram_data(text: &str) -> Result<HistogramData, HistogramError> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        parse_mapping(trimmed)
    } else if trimmed.contains('|') && trimmed.contains(">:") {
        parse_ranked_summary(trimmed)
    } else {
        parse_mapping(trimmed)
    }
}

fn parse_mapping(text: &str) -> Result<HistogramData, HistogramError> {
    Ok(serde_json::from_str(&text.replace('\'', "\""))?)
}

fn summary_entry_re() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(r"\|([01]+)>:\s*(\d+)").expect("summary entry pattern is valid")
    })
}

/// Collect every `|<bits>>: <count>` entry, skipping anything else.
fn parse_ranked_summary(text: &str) -> Result<HistogramData, HistogramError> {
    let mut data = HistogramData::new();

    for caps in summary_entry_re().captures_iter(text) {
        let label = &caps[1];
        let count = caps[2]
            .parse()
            .map_err(|_| HistogramError::InvalidCount {
                label: label.to_string(),
                count: caps[2].to_string(),
            })?;
        data.insert(label, count);
    }

    if data.is_empty() {
        return Err(HistogramError::UnrecognizedText);
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(data: &HistogramData) -> Vec<(&str, u64)> {
        data.iter().collect()
    }

    #[test]
    fn test_json_mapping() {
        let data = parse_histogram_data(r#"{"00": 512, "11": 512}"#).unwrap();
        assert_eq!(pairs(&data), vec![("00", 512), ("11", 512)]);
    }

    #[test]
    fn test_python_dict_mapping() {
        let data = parse_histogram_data("  {'00': 512, '11': 512}\n").unwrap();
        assert_eq!(pairs(&data), vec![("00", 512), ("11", 512)]);
    }

    #[test]
    fn test_mapping_keeps_input_order() {
        let data = parse_histogram_data(r#"{"11": 3, "00": 9, "01": 1}"#).unwrap();
        assert_eq!(data.labels().collect::<Vec<_>>(), vec!["11", "00", "01"]);
    }

    #[test]
    fn test_duplicate_keys() {
        let data = parse_histogram_data(r#"{"a": 1, "b": 2, "a": 5}"#).unwrap();
        assert_eq!(pairs(&data), vec![("a", 5), ("b", 2)]);
    }

    #[test]
    fn test_ranked_summary() {
        let data = parse_histogram_data("|1>: 525 (52.5%), |0>: 475 (47.5%)").unwrap();
        assert_eq!(pairs(&data), vec![("1", 525), ("0", 475)]);
    }

    #[test]
    fn test_ranked_summary_without_space() {
        let data = parse_histogram_data("|10>:7, junk |x>: 3, |01>:  2").unwrap();
        assert_eq!(pairs(&data), vec![("10", 7), ("01", 2)]);
    }

    #[test]
    fn test_ranked_summary_with_no_entries() {
        let err = parse_histogram_data("|ab>: nothing here").unwrap_err();
        assert!(matches!(err, HistogramError::UnrecognizedText));
        assert_eq!(err.to_string(), "Could not parse text result format");
    }

    #[test]
    fn test_ranked_summary_count_overflow() {
        let err = parse_histogram_data("|1>: 99999999999999999999 (50.0%), |0>: 5 (50.0%)")
            .unwrap_err();
        assert!(matches!(
            &err,
            HistogramError::InvalidCount { label, .. } if label == "1"
        ));
        assert_eq!(
            err.to_string(),
            "Invalid count for |1>: 99999999999999999999"
        );
    }

    #[test]
    fn test_invalid_mapping() {
        assert!(matches!(
            parse_histogram_data("{'00': 'many'}"),
            Err(HistogramError::InvalidMapping(_))
        ));
        assert!(matches!(
            parse_histogram_data("{'00': -4}"),
            Err(HistogramError::InvalidMapping(_))
        ));
    }

    #[test]
    fn test_unmarked_text_fails() {
        assert!(matches!(
            parse_histogram_data("hello world"),
            Err(HistogramError::InvalidMapping(_))
        ));
        assert!(parse_histogram_data("").is_err());
    }

    #[test]
    fn test_serializes_in_order() {
        let data: HistogramData = [("b", 1), ("a", 2)].into_iter().collect();
        assert_eq!(serde_json::to_string(&data).unwrap(), r#"{"b":1,"a":2}"#);
        assert_eq!(data.max_count(), 2);
        assert_eq!(data.get("a"), Some(2));
        assert_eq!(data.get("z"), None);
    }
}
