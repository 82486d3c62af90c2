// Mapper from domain models to the JSON shapes the frontend renders
use crate::application::status_service::StatusSnapshot;
use crate::domain::chart::{ChartData, CompareChart};
use crate::domain::sensor::{LatestReading, Metric};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct SeriesView {
    pub key: &'static str,
    pub label: &'static str,
    pub values: Vec<Option<f64>>,
    pub active: bool,
    pub y_min: f64,
    pub y_max: f64,
}

#[derive(Debug, Serialize)]
pub struct ChartView {
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<SeriesView>,
    pub y_min: f64,
    pub y_max: f64,
}

pub fn chart_view(chart: ChartData) -> ChartView {
    ChartView {
        title: chart.title,
        labels: chart.labels,
        series: chart
            .series
            .into_iter()
            .map(|s| SeriesView {
                key: s.metric.slug(),
                label: s.metric.label(),
                values: s.values,
                active: s.active,
                y_min: s.y_range.min,
                y_max: s.y_range.max,
            })
            .collect(),
        y_min: chart.y_range.min,
        y_max: chart.y_range.max,
    }
}

#[derive(Debug, Serialize)]
pub struct DayView {
    pub label: String,
    pub date: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Serialize)]
pub struct CompareView {
    pub metric: &'static str,
    pub label: &'static str,
    pub slots: Vec<String>,
    pub days: Vec<DayView>,
    pub y_min: f64,
    pub y_max: f64,
}

pub fn compare_view(chart: CompareChart) -> CompareView {
    CompareView {
        metric: chart.metric.slug(),
        label: chart.metric.label(),
        slots: chart.slots,
        days: chart
            .days
            .into_iter()
            .map(|day| DayView {
                label: day.label,
                date: day.date.to_string(),
                values: day.values,
            })
            .collect(),
        y_min: chart.y_range.min,
        y_max: chart.y_range.max,
    }
}

#[derive(Debug, Serialize)]
pub struct ReadingView {
    pub timestamp: String,
    pub metrics: BTreeMap<&'static str, Option<f64>>,
    pub actuators: BTreeMap<String, String>,
    pub emergency_stop: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusView {
    pub data: Option<ReadingView>,
    pub last_updated: Option<String>,
}

pub fn status_view(snapshot: StatusSnapshot) -> StatusView {
    StatusView {
        data: snapshot.latest.map(reading_view),
        last_updated: snapshot
            .last_updated
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
    }
}

fn reading_view(reading: LatestReading) -> ReadingView {
    let metrics = Metric::ALL
        .iter()
        .map(|&metric| (metric.slug(), reading.row.value(metric)))
        .collect();

    ReadingView {
        timestamp: reading.row.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        metrics,
        actuators: reading.actuators,
        emergency_stop: reading.emergency_stop,
    }
}
