//! Small numeric helpers shared by the aggregators.

use super::types::DurationSummary;

pub fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: i64 = values.iter().sum();
    Some(sum as f64 / values.len() as f64)
}

/// Median with the two middle values averaged for even-length input.
pub fn median(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) as f64 / 2.0)
    } else {
        Some(sorted[mid] as f64)
    }
}

/// Summarize the present values of an optional metric.
pub fn summarize_durations<I>(values: I) -> DurationSummary
where
    I: IntoIterator<Item = Option<i64>>,
{
    let present: Vec<i64> = values.into_iter().flatten().collect();
    DurationSummary {
        mean_days: mean(&present),
        median_days: median(&present),
        count: present.len(),
    }
}

/// `part / whole`, 0 when the denominator is 0.
pub fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
