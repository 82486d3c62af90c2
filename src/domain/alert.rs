// Alert domain model - content is evaluated by the backend, this service only relays it
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Error,
}

/// Daily-light-integral progress attached to DLI alerts.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DliInfo {
    pub target_ratio: Option<f64>,
    pub is_on_track: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Alert {
    pub id: u64,
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dli_info: Option<DliInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alert_deserializes_backend_shape() {
        let alert: Alert = serde_json::from_value(json!({
            "id": 7,
            "case_code": "TEMP_CRITICAL_LOW",
            "level": "error",
            "title": "Frost risk",
            "message": "Temperature is 3.2°C",
            "actions": ["Close the curtain", "Turn on heating"]
        }))
        .unwrap();

        assert_eq!(alert.id, 7);
        assert_eq!(alert.level, AlertLevel::Error);
        assert_eq!(alert.actions.len(), 2);
        assert!(alert.dli_info.is_none());
    }

    #[test]
    fn test_alert_with_dli_info() {
        let alert: Alert = serde_json::from_value(json!({
            "id": 12,
            "level": "warning",
            "title": "DLI behind target",
            "message": "Projected total DLI: 6.40 mol/m²/day",
            "actions": [],
            "dli_info": {
                "target_ratio": 53.3,
                "is_on_track": false,
                "remaining_hours": 4.5
            }
        }))
        .unwrap();

        let dli = alert.dli_info.unwrap();
        assert_eq!(dli.target_ratio, Some(53.3));
        assert_eq!(dli.is_on_track, Some(false));
        assert_eq!(dli.remaining_hours, Some(4.5));
    }
}
