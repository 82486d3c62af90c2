// Farm backend REST API client
use crate::application::farm_repository::{
    ActuatorToggle, ApiError, CaptureResult, FarmRepository, ImageInfo,
};
use crate::domain::alert::Alert;
use crate::domain::sensor::{LatestReading, SensorRow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

type JsonMap = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone)]
pub struct BackendApi {
    base_url: String,
    client: reqwest::Client,
}

// The backend wraps every payload in an envelope that may carry an `error`
// string, even on HTTP 200.

#[derive(Debug, Deserialize)]
struct DataEnvelope {
    #[serde(default)]
    data: Vec<JsonMap>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LatestEnvelope {
    #[serde(default)]
    data: Option<JsonMap>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlertsEnvelope {
    #[serde(default)]
    alerts: Vec<Alert>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DatesEnvelope {
    #[serde(default)]
    dates: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ToggleEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptureEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageEnvelope {
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageTimesEnvelope {
    #[serde(default)]
    times: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

impl BackendApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        tracing::debug!(%url, "backend GET");
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "backend POST");
        let response = self.client.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::SessionExpired);
        }

        let body = response.text().await?;
        if !status.is_success() {
            // failed endpoints usually still ship the envelope, surface its
            // message when they do
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
                if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
                    return Err(ApiError::Backend(message.to_string()));
                }
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn check_envelope(error: Option<String>) -> Result<(), ApiError> {
        match error {
            Some(message) => Err(ApiError::Backend(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FarmRepository for BackendApi {
    async fn fetch_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<SensorRow>, ApiError> {
        let envelope: DataEnvelope = self
            .get(&format!(
                "/api/data?start_date={start_date}&end_date={end_date}"
            ))
            .await?;
        Self::check_envelope(envelope.error)?;

        // rows with a broken timestamp are dropped, everything else is kept
        Ok(envelope
            .data
            .iter()
            .filter_map(SensorRow::from_json_map)
            .collect())
    }

    async fn fetch_latest(&self) -> Result<Option<LatestReading>, ApiError> {
        let envelope: LatestEnvelope = self.get("/api/latest").await?;
        Self::check_envelope(envelope.error)?;
        Ok(envelope
            .data
            .as_ref()
            .and_then(LatestReading::from_json_map))
    }

    async fn fetch_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        let envelope: AlertsEnvelope = self.get("/api/alerts").await?;
        Self::check_envelope(envelope.error)?;
        Ok(envelope.alerts)
    }

    async fn list_dates(&self) -> Result<Vec<NaiveDate>, ApiError> {
        let envelope: DatesEnvelope = self.get("/api/dates").await?;
        Self::check_envelope(envelope.error)?;
        Ok(envelope
            .dates
            .iter()
            .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .collect())
    }

    async fn toggle_actuator(&self, kind: &str) -> Result<ActuatorToggle, ApiError> {
        let envelope: ToggleEnvelope = self
            .post("/api/actuator/toggle", &serde_json::json!({ "type": kind }))
            .await?;
        Self::check_envelope(envelope.error)?;
        Ok(ActuatorToggle {
            success: envelope.success,
            status: envelope.status.unwrap_or_default(),
        })
    }

    async fn capture_image(&self) -> Result<CaptureResult, ApiError> {
        let envelope: CaptureEnvelope = self
            .post("/api/camera/capture", &serde_json::json!({}))
            .await?;
        Self::check_envelope(envelope.error)?;
        Ok(CaptureResult {
            success: envelope.success,
            image_url: envelope.image_url,
            message: envelope.message,
        })
    }

    async fn latest_image(&self) -> Result<ImageInfo, ApiError> {
        let envelope: ImageEnvelope = self.get("/api/latest_image").await?;
        Self::check_envelope(envelope.error)?;
        Ok(ImageInfo {
            image_url: envelope.image_url,
            timestamp: envelope.timestamp,
            message: envelope.message,
        })
    }

    async fn image_at(&self, date: NaiveDate, time: Option<&str>) -> Result<ImageInfo, ApiError> {
        let path = match time {
            Some(time) => format!("/api/image?date={date}&time={}", urlencoding::encode(time)),
            None => format!("/api/image?date={date}"),
        };
        let envelope: ImageEnvelope = self.get(&path).await?;
        Self::check_envelope(envelope.error)?;
        Ok(ImageInfo {
            image_url: envelope.image_url,
            timestamp: envelope.timestamp,
            message: envelope.message,
        })
    }

    async fn image_times(&self, date: NaiveDate) -> Result<Vec<String>, ApiError> {
        let envelope: ImageTimesEnvelope =
            self.get(&format!("/api/image_times?date={date}")).await?;
        Self::check_envelope(envelope.error)?;
        Ok(envelope.times)
    }
}
