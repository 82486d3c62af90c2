// Minimum-gap resampling - bounds point count while keeping the curve shape
use crate::domain::sensor::SensorRow;
use chrono::Duration;

/// Thin out an ascending row sequence by enforcing a minimum gap between
/// retained rows.
///
/// The first row is always kept. A later row is kept only when at least
/// `interval_minutes` have elapsed since the last kept row. The true last
/// row is appended afterwards if the scan dropped it, so the series always
/// ends at the most recent observation and the chart is never truncated.
///
/// An interval of zero (or an empty input) returns the input unchanged.
pub fn resample(rows: &[SensorRow], interval_minutes: i64) -> Vec<SensorRow> {
    if interval_minutes <= 0 || rows.is_empty() {
        return rows.to_vec();
    }

    let min_gap = Duration::minutes(interval_minutes);
    let mut kept: Vec<SensorRow> = Vec::new();
    let mut last_kept = rows[0].timestamp;
    kept.push(rows[0].clone());

    for row in &rows[1..] {
        if row.timestamp - last_kept >= min_gap {
            last_kept = row.timestamp;
            kept.push(row.clone());
        }
    }

    if let Some(last) = rows.last() {
        let already_kept = kept
            .last()
            .map(|r| r.timestamp == last.timestamp)
            .unwrap_or(false);
        if !already_kept {
            kept.push(last.clone());
        }
    }

    kept
}
