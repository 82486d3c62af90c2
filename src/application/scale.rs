// Y-axis auto-range with headroom
use crate::domain::chart::YRange;
use crate::domain::sensor::{Metric, SensorRow};

/// Range shown when there is nothing to measure.
pub const DEFAULT_RANGE: YRange = YRange {
    min: 0.0,
    max: 100.0,
};

const HEADROOM: f64 = 0.1;

/// Suggested display range across the given metrics, padded by 10% of the
/// observed spread on each end. Unparseable values are skipped; no valid
/// values at all yields [0, 100]. A flat series keeps its single value as
/// both bounds.
pub fn y_range(rows: &[SensorRow], metrics: &[Metric]) -> YRange {
    y_range_of(
        metrics
            .iter()
            .flat_map(|metric| rows.iter().filter_map(|row| row.value(*metric))),
    )
}

/// Same padding rule over a bare value stream (used by the comparison view,
/// where values are already slot-aligned).
pub fn y_range_of<I>(values: I) -> YRange
where
    I: IntoIterator<Item = f64>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for value in values {
        min = min.min(value);
        max = max.max(value);
    }

    if min.is_infinite() {
        return DEFAULT_RANGE;
    }

    let range = max - min;
    YRange {
        min: min - range * HEADROOM,
        max: max + range * HEADROOM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sensor::parse_timestamp;

    fn row_with(metric: Metric, value: Option<f64>) -> SensorRow {
        let mut row = SensorRow::new(parse_timestamp("2025-06-01 08:00:00").unwrap());
        row.set_value(metric, value);
        row
    }

    #[test]
    fn test_padding_is_ten_percent_of_spread() {
        let metric = Metric::Temperature;
        let rows: Vec<SensorRow> = [10.0, 20.0, 30.0]
            .into_iter()
            .map(|v| row_with(metric, Some(v)))
            .collect();

        let range = y_range(&rows, &[metric]);
        assert_eq!(range.min, 8.0);
        assert_eq!(range.max, 32.0);
    }

    #[test]
    fn test_empty_selection_falls_back() {
        let range = y_range(&[], &[Metric::Temperature]);
        assert_eq!(range, DEFAULT_RANGE);
    }

    #[test]
    fn test_all_unparseable_falls_back() {
        let rows = vec![
            row_with(Metric::Humidity, None),
            row_with(Metric::Humidity, None),
        ];
        let range = y_range(&rows, &[Metric::Humidity]);
        assert_eq!(range, DEFAULT_RANGE);
    }

    #[test]
    fn test_flat_series_keeps_single_value() {
        let rows = vec![
            row_with(Metric::Humidity, Some(55.0)),
            row_with(Metric::Humidity, Some(55.0)),
        ];
        let range = y_range(&rows, &[Metric::Humidity]);
        assert_eq!(range.min, 55.0);
        assert_eq!(range.max, 55.0);
    }
}
