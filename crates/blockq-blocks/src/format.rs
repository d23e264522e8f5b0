//! Ranked text summary of measurement counts.

use blockq_hal::Counts;

/// How many outcomes the summary lists.
const TOP_N: usize = 5;

/// Render the most frequent outcomes as `|state>: count (pct%)`.
///
/// Percentages are taken against `total_shots`, which is whatever the caller
/// asked for, not necessarily the number of shots the backend ran.
pub fn format_counts(counts: &Counts, total_shots: u64) -> String {
    if counts.is_empty() {
        return "No results".to_string();
    }

    counts
        .sorted()
        .into_iter()
        .take(TOP_N)
        .map(|(state, &count)| {
            format!("|{state}>: {count} ({:.1}%)", percentage(count, total_shots))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[allow(clippy::cast_precision_loss)]
fn percentage(count: u64, total_shots: u64) -> f64 {
    if total_shots == 0 {
        0.0
    } else {
        count as f64 / total_shots as f64 * 100.0
    }
}
