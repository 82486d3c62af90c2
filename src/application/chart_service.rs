// Chart service - Use case for building chart-ready data
use crate::application::align::{align_day, slot_labels};
use crate::application::farm_repository::{ApiError, FarmRepository};
use crate::application::resample::resample;
use crate::application::scale::{y_range, y_range_of};
use crate::domain::chart::{ChartData, CompareChart, DaySeries, SeriesData};
use crate::domain::sensor::{normalize, Metric, SensorRow};
use crate::infrastructure::config::ChartTuning;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use futures::future::join_all;
use std::sync::Arc;

#[derive(Clone)]
pub struct ChartService {
    repository: Arc<dyn FarmRepository>,
    tuning: ChartTuning,
}

impl ChartService {
    pub fn new(repository: Arc<dyn FarmRepository>, tuning: ChartTuning) -> Self {
        Self { repository, tuning }
    }

    /// Chart for the trailing `hours` window ending at `now`.
    ///
    /// Fetches the covering date range, clips to the window, normalizes,
    /// then resamples at the tier interval for that window size. Returns
    /// `Ok(None)` when the window holds no rows so the caller can keep its
    /// previous view. A window too large to represent as a start time also
    /// reads as empty rather than panicking on duration overflow.
    pub async fn recent_window(
        &self,
        hours: i64,
        now: NaiveDateTime,
    ) -> Result<Option<ChartData>, ApiError> {
        let Some(start) = Duration::try_hours(hours)
            .and_then(|window| now.checked_sub_signed(window))
        else {
            return Ok(None);
        };

        let fetched = self
            .repository
            .fetch_range(start.date(), now.date())
            .await?;
        let rows: Vec<SensorRow> = fetched
            .into_iter()
            .filter(|row| row.timestamp >= start && row.timestamp <= now)
            .collect();
        let rows = normalize(rows);

        if rows.is_empty() {
            return Ok(None);
        }

        let interval = self.tuning.interval_for_window(hours);
        let rows = resample(&rows, interval);

        let labels = rows
            .iter()
            .map(|row| row.timestamp.format("%m-%d %H:%M").to_string())
            .collect();

        // each series carries its own bounds so toggling the visible metric
        // can rescale without refetching; the chart-level range is the
        // initially active series' one
        let series: Vec<SeriesData> = Metric::ALL
            .iter()
            .map(|&metric| SeriesData {
                metric,
                label: metric.label().to_string(),
                values: rows.iter().map(|row| row.value(metric)).collect(),
                active: metric == Metric::default(),
                y_range: y_range(&rows, &[metric]),
            })
            .collect();

        Ok(Some(ChartData {
            title: format!("Sensor data (last {hours}h)"),
            labels,
            y_range: y_range(&rows, &[Metric::default()]),
            series,
        }))
    }

    /// Overlay today and the two previous calendar days for one metric on
    /// the shared time-of-day grid.
    pub async fn compare_days(
        &self,
        metric: Metric,
        today: NaiveDate,
    ) -> Result<CompareChart, ApiError> {
        let days = [
            (today, "today"),
            (today - Duration::days(1), "D-1"),
            (today - Duration::days(2), "D-2"),
        ];

        let buckets = join_all(days.iter().map(|(date, _)| self.day_bucket(*date))).await;

        let mut day_series = Vec::with_capacity(days.len());
        for ((date, label), bucket) in days.iter().zip(buckets) {
            let rows = match bucket {
                Ok(rows) => rows,
                // a day the backend cannot serve shows as an empty overlay,
                // transport failures abort the whole comparison
                Err(ApiError::Status { status, body }) => {
                    tracing::warn!(%date, status, %body, "comparison day unavailable");
                    Vec::new()
                }
                Err(ApiError::Backend(message)) => {
                    tracing::warn!(%date, %message, "comparison day unavailable");
                    Vec::new()
                }
                Err(e) => return Err(e),
            };

            day_series.push(DaySeries {
                label: (*label).to_string(),
                date: *date,
                values: align_day(&rows, metric),
            });
        }

        let range = y_range_of(
            day_series
                .iter()
                .flat_map(|day| day.values.iter().flatten().copied()),
        );

        Ok(CompareChart {
            metric,
            slots: slot_labels(),
            days: day_series,
            y_range: range,
        })
    }

    /// One day's bucket: fetch, clip to the calendar day, normalize, and
    /// resample at the coarse comparison interval.
    async fn day_bucket(&self, date: NaiveDate) -> Result<Vec<SensorRow>, ApiError> {
        let fetched = self.repository.fetch_range(date, date).await?;
        let rows: Vec<SensorRow> = fetched
            .into_iter()
            .filter(|row| row.timestamp.date() == date)
            .collect();
        let rows = normalize(rows);
        Ok(resample(&rows, self.tuning.compare_interval_minutes))
    }
}
