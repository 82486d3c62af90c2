// Repository trait for the farm backend API
use crate::domain::alert::Alert;
use crate::domain::sensor::{LatestReading, SensorRow};
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend answered 200 but put an error in the envelope.
    #[error("backend error: {0}")]
    Backend(String),

    /// HTTP 401 from the backend, the login session is gone.
    #[error("session expired")]
    SessionExpired,

    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

/// Result of toggling an actuator relay.
#[derive(Debug, Clone, PartialEq)]
pub struct ActuatorToggle {
    pub success: bool,
    pub status: String,
}

/// Result of asking the camera to capture a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureResult {
    pub success: bool,
    pub image_url: Option<String>,
    pub message: Option<String>,
}

/// A stored camera image, or a message explaining why there is none.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub image_url: Option<String>,
    pub timestamp: Option<String>,
    pub message: Option<String>,
}

#[async_trait]
pub trait FarmRepository: Send + Sync {
    /// Fetch raw sensor rows for an inclusive calendar-date range.
    /// Rows come back unsorted and possibly duplicated.
    async fn fetch_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<SensorRow>, ApiError>;

    /// Fetch the single most recent reading, if any exists yet.
    async fn fetch_latest(&self) -> Result<Option<LatestReading>, ApiError>;

    /// Fetch currently active alerts.
    async fn fetch_alerts(&self) -> Result<Vec<Alert>, ApiError>;

    /// List dates that have logged data, ascending.
    async fn list_dates(&self) -> Result<Vec<NaiveDate>, ApiError>;

    /// Toggle an actuator (fan, led_w, led_p, valve, curtain).
    async fn toggle_actuator(&self, kind: &str) -> Result<ActuatorToggle, ApiError>;

    /// Trigger an immediate camera capture.
    async fn capture_image(&self) -> Result<CaptureResult, ApiError>;

    /// Most recently captured image.
    async fn latest_image(&self) -> Result<ImageInfo, ApiError>;

    /// Image closest to the given date and optional HH:MM time.
    async fn image_at(&self, date: NaiveDate, time: Option<&str>) -> Result<ImageInfo, ApiError>;

    /// Capture times available on the given date, as HH:MM strings.
    async fn image_times(&self, date: NaiveDate) -> Result<Vec<String>, ApiError>;
}
