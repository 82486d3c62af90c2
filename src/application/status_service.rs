// Status service - Cached latest reading and alerts, refreshed by polling
use crate::application::farm_repository::{ApiError, FarmRepository};
use crate::domain::alert::Alert;
use crate::domain::sensor::LatestReading;
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// What the status endpoints serve. Owned by the service and replaced
/// wholesale on each refresh; handlers only ever read a clone.
#[derive(Debug, Clone, Default)]
pub struct StatusSnapshot {
    pub latest: Option<LatestReading>,
    pub alerts: Vec<Alert>,
    pub last_updated: Option<NaiveDateTime>,
    pub session_expired: bool,
}

#[derive(Clone)]
pub struct StatusService {
    repository: Arc<dyn FarmRepository>,
    cache: Arc<RwLock<StatusSnapshot>>,
}

impl StatusService {
    pub fn new(repository: Arc<dyn FarmRepository>) -> Self {
        Self {
            repository,
            cache: Arc::new(RwLock::new(StatusSnapshot::default())),
        }
    }

    pub async fn snapshot(&self) -> StatusSnapshot {
        self.cache.read().await.clone()
    }

    /// Re-fetch the latest reading and the active alerts.
    ///
    /// A failed latest fetch keeps the previous reading and its refresh
    /// time, so `last_updated` reflects how old the served data really is.
    /// An unreachable alerts endpoint reads as calm (no alerts) rather
    /// than as an error banner.
    pub async fn refresh(&self) {
        let latest = self.repository.fetch_latest().await;
        let alerts = match self.repository.fetch_alerts().await {
            Ok(alerts) => alerts,
            Err(e) => {
                tracing::warn!(error = %e, "alerts poll failed, showing none");
                Vec::new()
            }
        };

        let mut cache = self.cache.write().await;
        match latest {
            Ok(Some(reading)) => {
                cache.latest = Some(reading);
                cache.session_expired = false;
                cache.last_updated = Some(chrono::Local::now().naive_local());
            }
            Ok(None) => {
                cache.session_expired = false;
                cache.last_updated = Some(chrono::Local::now().naive_local());
            }
            Err(ApiError::SessionExpired) => {
                tracing::warn!("latest-data poll rejected, session expired");
                cache.session_expired = true;
            }
            Err(e) => {
                tracing::warn!(error = %e, "latest-data poll failed, keeping previous reading");
            }
        }
        cache.alerts = alerts;
    }

    /// Refresh on a fixed cadence, starting immediately.
    ///
    /// Each tick spawns its refresh independently, so a fetch slower than
    /// the interval may overlap the next one. The reads are idempotent and
    /// the last write wins.
    pub fn spawn_poller(self, interval: Duration) {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let service = self.clone();
                tokio::spawn(async move { service.refresh().await });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::farm_repository::{ActuatorToggle, CaptureResult, ImageInfo};
    use crate::domain::alert::AlertLevel;
    use crate::domain::sensor::{parse_timestamp, SensorRow};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct StubRepository {
        latest: Option<LatestReading>,
        latest_unauthorized: bool,
        latest_unreachable: bool,
        alerts: Vec<Alert>,
        alerts_unreachable: bool,
    }

    #[async_trait]
    impl FarmRepository for StubRepository {
        async fn fetch_range(
            &self,
            _start_date: NaiveDate,
            _end_date: NaiveDate,
        ) -> Result<Vec<SensorRow>, ApiError> {
            unimplemented!()
        }

        async fn fetch_latest(&self) -> Result<Option<LatestReading>, ApiError> {
            if self.latest_unauthorized {
                return Err(ApiError::SessionExpired);
            }
            if self.latest_unreachable {
                return Err(ApiError::Backend("boom".into()));
            }
            Ok(self.latest.clone())
        }

        async fn fetch_alerts(&self) -> Result<Vec<Alert>, ApiError> {
            if self.alerts_unreachable {
                return Err(ApiError::Backend("boom".into()));
            }
            Ok(self.alerts.clone())
        }

        async fn list_dates(&self) -> Result<Vec<NaiveDate>, ApiError> {
            unimplemented!()
        }

        async fn toggle_actuator(&self, _kind: &str) -> Result<ActuatorToggle, ApiError> {
            unimplemented!()
        }

        async fn capture_image(&self) -> Result<CaptureResult, ApiError> {
            unimplemented!()
        }

        async fn latest_image(&self) -> Result<ImageInfo, ApiError> {
            unimplemented!()
        }

        async fn image_at(
            &self,
            _date: NaiveDate,
            _time: Option<&str>,
        ) -> Result<ImageInfo, ApiError> {
            unimplemented!()
        }

        async fn image_times(&self, _date: NaiveDate) -> Result<Vec<String>, ApiError> {
            unimplemented!()
        }
    }

    fn reading(datetime: &str) -> LatestReading {
        LatestReading {
            row: SensorRow::new(parse_timestamp(datetime).unwrap()),
            actuators: BTreeMap::new(),
            emergency_stop: false,
        }
    }

    fn alert() -> Alert {
        Alert {
            id: 1,
            level: AlertLevel::Warning,
            title: "t".into(),
            message: "m".into(),
            actions: Vec::new(),
            case_code: None,
            dli_info: None,
        }
    }

    #[tokio::test]
    async fn test_refresh_populates_cache() {
        let service = StatusService::new(Arc::new(StubRepository {
            latest: Some(reading("2025-06-01 08:00:00")),
            alerts: vec![alert()],
            ..Default::default()
        }));

        service.refresh().await;
        let snapshot = service.snapshot().await;
        assert!(snapshot.latest.is_some());
        assert_eq!(snapshot.alerts.len(), 1);
        assert!(snapshot.last_updated.is_some());
        assert!(!snapshot.session_expired);
    }

    #[tokio::test]
    async fn test_failed_latest_keeps_previous_reading() {
        let good = Arc::new(StubRepository {
            latest: Some(reading("2025-06-01 08:00:00")),
            ..Default::default()
        });
        let service = StatusService::new(good);
        service.refresh().await;

        let failing = StatusService {
            repository: Arc::new(StubRepository {
                latest_unreachable: true,
                ..Default::default()
            }),
            cache: service.cache.clone(),
        };
        let before = service.snapshot().await.last_updated;
        failing.refresh().await;

        let snapshot = failing.snapshot().await;
        assert!(snapshot.latest.is_some(), "stale reading must survive");
        assert_eq!(
            snapshot.last_updated, before,
            "refresh time must not advance over a stale reading"
        );
    }

    #[tokio::test]
    async fn test_alerts_failure_reads_as_calm() {
        let service = StatusService::new(Arc::new(StubRepository {
            latest: Some(reading("2025-06-01 08:00:00")),
            alerts_unreachable: true,
            ..Default::default()
        }));

        service.refresh().await;
        assert!(service.snapshot().await.alerts.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_marks_session_expired() {
        let service = StatusService::new(Arc::new(StubRepository {
            latest_unauthorized: true,
            ..Default::default()
        }));

        service.refresh().await;
        assert!(service.snapshot().await.session_expired);
    }
}
