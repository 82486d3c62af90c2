// HTTP request handlers
use crate::application::farm_repository::ApiError;
use crate::domain::sensor::Metric;
use crate::presentation::app_state::AppState;
use crate::presentation::views::{chart_view, compare_view, status_view};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct RangeQuery {
    pub hours: Option<i64>,
}

/// Largest accepted chart window. The dashboard itself asks for at most
/// 24h; this cap rejects garbage input before it reaches date arithmetic.
const MAX_WINDOW_HOURS: i64 = 24 * 31;

fn window_hours(requested: Option<i64>) -> Result<i64, String> {
    let hours = requested.unwrap_or(1);
    if !(1..=MAX_WINDOW_HOURS).contains(&hours) {
        return Err(format!("hours must be between 1 and {MAX_WINDOW_HOURS}"));
    }
    Ok(hours)
}

#[derive(Deserialize)]
pub struct CompareQuery {
    pub metric: Option<String>,
}

#[derive(Deserialize)]
pub struct ImageQuery {
    pub date: NaiveDate,
    pub time: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Chart for the trailing N-hour window (default 1h, the dashboard's
/// initial view).
pub async fn get_chart(
    Query(query): Query<RangeQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let hours = match window_hours(query.hours) {
        Ok(hours) => hours,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
                .into_response();
        }
    };
    let now = chrono::Local::now().naive_local();

    match state.chart_service.recent_window(hours, now).await {
        Ok(Some(chart)) => Json(chart_view(chart)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no data in the requested window" })),
        )
            .into_response(),
        Err(e) => api_error(e).into_response(),
    }
}

/// Overlay of today and the two previous days for one metric.
pub async fn get_compare(
    Query(query): Query<CompareQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let metric = match query.metric {
        None => Metric::default(),
        Some(slug) => match Metric::from_slug(&slug) {
            Some(metric) => metric,
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("unknown metric '{slug}'") })),
                )
                    .into_response();
            }
        },
    };

    let today = chrono::Local::now().date_naive();
    match state.chart_service.compare_days(metric, today).await {
        Ok(chart) => Json(compare_view(chart)).into_response(),
        Err(e) => api_error(e).into_response(),
    }
}

/// Latest reading plus actuator states, served from the poller's cache.
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.status_service.snapshot().await;
    if snapshot.session_expired {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "session expired" })),
        )
            .into_response();
    }
    Json(status_view(snapshot)).into_response()
}

/// Active alerts. Never errors: an empty list reads as "all systems normal".
pub async fn get_alerts(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.status_service.snapshot().await;
    Json(json!({ "alerts": snapshot.alerts }))
}

/// Dates with logged data, ascending.
pub async fn get_dates(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.repository.list_dates().await {
        Ok(dates) => {
            let dates: Vec<String> = dates.iter().map(ToString::to_string).collect();
            Json(json!({ "dates": dates })).into_response()
        }
        Err(e) => api_error(e).into_response(),
    }
}

/// Toggle an actuator relay via the backend.
pub async fn toggle_actuator(
    Path(kind): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.repository.toggle_actuator(&kind).await {
        Ok(toggle) => Json(json!({
            "success": toggle.success,
            "status": toggle.status,
        }))
        .into_response(),
        Err(e) => api_error(e).into_response(),
    }
}

/// Ask the camera to capture a frame right now.
pub async fn capture_image(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.repository.capture_image().await {
        Ok(capture) => Json(json!({
            "success": capture.success,
            "image_url": capture.image_url,
            "message": capture.message,
        }))
        .into_response(),
        Err(e) => api_error(e).into_response(),
    }
}

/// Most recently captured image.
pub async fn latest_image(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.repository.latest_image().await {
        Ok(image) => image_response(image).into_response(),
        Err(e) => api_error(e).into_response(),
    }
}

/// Image closest to the given date and optional HH:MM time.
pub async fn image_at(
    Query(query): Query<ImageQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state
        .repository
        .image_at(query.date, query.time.as_deref())
        .await
    {
        Ok(image) => image_response(image).into_response(),
        Err(e) => api_error(e).into_response(),
    }
}

/// Capture times available on the given date.
pub async fn image_times(
    Query(query): Query<ImageQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.repository.image_times(query.date).await {
        Ok(times) => Json(json!({ "times": times })).into_response(),
        Err(e) => api_error(e).into_response(),
    }
}

fn image_response(image: crate::application::farm_repository::ImageInfo) -> impl IntoResponse {
    Json(json!({
        "image_url": image.image_url,
        "timestamp": image.timestamp,
        "message": image.message,
    }))
}

fn api_error(error: ApiError) -> impl IntoResponse {
    let status = match error {
        ApiError::SessionExpired => StatusCode::UNAUTHORIZED,
        _ => StatusCode::BAD_GATEWAY,
    };
    (status, Json(json!({ "error": error.to_string() })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_defaults_to_one_hour() {
        assert_eq!(window_hours(None), Ok(1));
        assert_eq!(window_hours(Some(24)), Ok(24));
    }

    #[test]
    fn test_window_rejects_out_of_range_hours() {
        assert!(window_hours(Some(0)).is_err());
        assert!(window_hours(Some(-3)).is_err());
        assert!(window_hours(Some(i64::MAX)).is_err());
    }
}
