// Sensor domain models
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::BTreeMap;

/// The fixed set of metrics recorded by the farm logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Humidity,
    SoilMoisture,
    Illuminance,
    VaporPressureDeficit,
    DailyLightIntegral,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::SoilMoisture,
        Metric::Illuminance,
        Metric::VaporPressureDeficit,
        Metric::DailyLightIntegral,
    ];

    /// Column name used by the backend API for this metric.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Temperature => "Temp_C",
            Metric::Humidity => "Hum_Pct",
            Metric::SoilMoisture => "Soil_Pct",
            Metric::Illuminance => "Lux",
            Metric::VaporPressureDeficit => "VPD_kPa",
            Metric::DailyLightIntegral => "DLI_mol",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature (°C)",
            Metric::Humidity => "Humidity (%)",
            Metric::SoilMoisture => "Soil moisture (%)",
            Metric::Illuminance => "Illuminance (Lux)",
            Metric::VaporPressureDeficit => "VPD (kPa)",
            Metric::DailyLightIntegral => "DLI (mol/m²/day)",
        }
    }

    /// Short identifier used in API query parameters.
    pub fn slug(self) -> &'static str {
        match self {
            Metric::Temperature => "temp",
            Metric::Humidity => "hum",
            Metric::SoilMoisture => "soil",
            Metric::Illuminance => "lux",
            Metric::VaporPressureDeficit => "vpd",
            Metric::DailyLightIntegral => "dli",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.slug() == slug)
    }

    fn index(self) -> usize {
        match self {
            Metric::Temperature => 0,
            Metric::Humidity => 1,
            Metric::SoilMoisture => 2,
            Metric::Illuminance => 3,
            Metric::VaporPressureDeficit => 4,
            Metric::DailyLightIntegral => 5,
        }
    }
}

impl Default for Metric {
    fn default() -> Self {
        Metric::VaporPressureDeficit
    }
}

/// One timestamped observation with a value per metric.
///
/// A metric value is `None` when the backend field was present but not
/// parseable as a number. A field that is missing entirely (or empty) is
/// recorded as `0.0`, matching how the logger emits sparse columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRow {
    pub timestamp: NaiveDateTime,
    values: [Option<f64>; 6],
}

impl SensorRow {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            values: [Some(0.0); 6],
        }
    }

    /// Build a row from a raw backend JSON object.
    ///
    /// Returns `None` when the `Timestamp` field is missing or unparseable,
    /// in which case the whole row is discarded. A single corrupt metric
    /// field only blanks that metric.
    pub fn from_json_map(fields: &serde_json::Map<String, Value>) -> Option<Self> {
        let timestamp = fields
            .get("Timestamp")
            .and_then(Value::as_str)
            .and_then(parse_timestamp)?;

        let mut row = SensorRow::new(timestamp);
        for metric in Metric::ALL {
            row.set_value(metric, coerce_numeric(fields.get(metric.key())));
        }
        Some(row)
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values[metric.index()]
    }

    pub fn set_value(&mut self, metric: Metric, value: Option<f64>) {
        self.values[metric.index()] = value;
    }
}

/// Parse a backend timestamp. The logger writes `YYYY-MM-DD HH:MM:SS`;
/// RFC 3339 is accepted as a fallback.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// Missing/null/empty fields count as zero; anything else must parse as a
/// number or the value is dropped.
fn coerce_numeric(value: Option<&Value>) -> Option<f64> {
    match value {
        None | Some(Value::Null) => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => Some(0.0),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    }
}

/// Sort ascending by timestamp and drop exact-duplicate timestamps.
///
/// Fetched batches span multiple log files and carry no ordering guarantee,
/// so this runs before any resampling.
pub fn normalize(mut rows: Vec<SensorRow>) -> Vec<SensorRow> {
    rows.sort_by_key(|r| r.timestamp);
    rows.dedup_by_key(|r| r.timestamp);
    rows
}

/// The most recent observation together with actuator states.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestReading {
    pub row: SensorRow,
    pub actuators: BTreeMap<String, String>,
    pub emergency_stop: bool,
}

const ACTUATOR_FIELDS: [(&str, &str); 5] = [
    ("fan", "Fan_Status"),
    ("led_w", "LED_W_Status"),
    ("led_p", "LED_P_Status"),
    ("valve", "Valve_Status"),
    ("curtain", "Curtain_Status"),
];

impl LatestReading {
    pub fn from_json_map(fields: &serde_json::Map<String, Value>) -> Option<Self> {
        let row = SensorRow::from_json_map(fields)?;

        let mut actuators = BTreeMap::new();
        for (name, key) in ACTUATOR_FIELDS {
            if let Some(status) = fields.get(key).and_then(Value::as_str) {
                actuators.insert(name.to_string(), status.to_string());
            }
        }

        // The logger writes the flag either as a bool or as "True"/"False"
        let emergency_stop = match fields.get("Emergency_Stop") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "True",
            _ => false,
        };

        Some(Self {
            row,
            actuators,
            emergency_stop,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(m) => m,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_row_from_json_map() {
        let fields = map(json!({
            "Timestamp": "2025-06-01 08:07:00",
            "Temp_C": 21.5,
            "Hum_Pct": "63.2",
            "VPD_kPa": "bogus",
            "Lux": ""
        }));

        let row = SensorRow::from_json_map(&fields).unwrap();
        assert_eq!(row.value(Metric::Temperature), Some(21.5));
        assert_eq!(row.value(Metric::Humidity), Some(63.2));
        // unparseable field is dropped, not zeroed
        assert_eq!(row.value(Metric::VaporPressureDeficit), None);
        // empty and missing fields count as zero
        assert_eq!(row.value(Metric::Illuminance), Some(0.0));
        assert_eq!(row.value(Metric::SoilMoisture), Some(0.0));
    }

    #[test]
    fn test_row_without_timestamp_is_discarded() {
        let fields = map(json!({ "Temp_C": 21.5 }));
        assert!(SensorRow::from_json_map(&fields).is_none());

        let fields = map(json!({ "Timestamp": "not a date", "Temp_C": 21.5 }));
        assert!(SensorRow::from_json_map(&fields).is_none());
    }

    #[test]
    fn test_parse_timestamp_rfc3339_fallback() {
        let parsed = parse_timestamp("2025-06-01T08:07:00+00:00").unwrap();
        assert_eq!(parsed.format("%H:%M").to_string(), "08:07");
    }

    #[test]
    fn test_normalize_sorts_and_dedups() {
        let ts = |s: &str| parse_timestamp(s).unwrap();
        let rows = vec![
            SensorRow::new(ts("2025-06-01 10:00:00")),
            SensorRow::new(ts("2025-06-01 09:00:00")),
            SensorRow::new(ts("2025-06-01 10:00:00")),
            SensorRow::new(ts("2025-06-01 08:00:00")),
        ];

        let rows = normalize(rows);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].timestamp, ts("2025-06-01 08:00:00"));
        assert_eq!(rows[1].timestamp, ts("2025-06-01 09:00:00"));
        assert_eq!(rows[2].timestamp, ts("2025-06-01 10:00:00"));
    }

    #[test]
    fn test_latest_reading_actuators() {
        let fields = map(json!({
            "Timestamp": "2025-06-01 08:07:00",
            "Temp_C": 21.5,
            "Fan_Status": "ON",
            "Curtain_Status": "CLOSED",
            "Emergency_Stop": "True"
        }));

        let reading = LatestReading::from_json_map(&fields).unwrap();
        assert_eq!(reading.actuators.get("fan").map(String::as_str), Some("ON"));
        assert_eq!(
            reading.actuators.get("curtain").map(String::as_str),
            Some("CLOSED")
        );
        assert!(reading.emergency_stop);
    }
}
