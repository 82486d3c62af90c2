// Chart-ready view models built from resampled sensor data
use super::sensor::Metric;
use chrono::NaiveDate;

/// Suggested display range for the y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YRange {
    pub min: f64,
    pub max: f64,
}

/// One plotted series: values are positionally aligned to the chart labels,
/// with `None` rendered as a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub metric: Metric,
    pub label: String,
    pub values: Vec<Option<f64>>,
    /// Whether the series starts visible. Only VPD is shown by default.
    pub active: bool,
    /// Suggested bounds for this series alone, so switching the visible
    /// metric can rescale the axis client-side.
    pub y_range: YRange,
}

/// A single-range chart: one label per retained row, all metrics as series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<SeriesData>,
    pub y_range: YRange,
}

/// One calendar day overlaid on the shared 24-hour slot grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySeries {
    pub label: String,
    pub date: NaiveDate,
    /// Exactly one optional value per time slot.
    pub values: Vec<Option<f64>>,
}

/// Multi-day comparison chart: up to three days of a single metric sharing
/// one time-of-day axis.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareChart {
    pub metric: Metric,
    pub slots: Vec<String>,
    pub days: Vec<DaySeries>,
    pub y_range: YRange,
}
