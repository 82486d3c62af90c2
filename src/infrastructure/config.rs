use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub backend: BackendSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Resample interval applied to windows up to `max_hours` long.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SamplingTier {
    pub max_hours: i64,
    pub interval_minutes: i64,
}

/// Chart shaping knobs. The tier thresholds are data rather than code
/// because they are a display-density policy that gets tuned.
#[derive(Debug, Deserialize, Clone)]
pub struct ChartTuning {
    #[serde(default = "default_sampling_tiers")]
    pub sampling_tiers: Vec<SamplingTier>,
    #[serde(default = "default_compare_interval_minutes")]
    pub compare_interval_minutes: i64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for ChartTuning {
    fn default() -> Self {
        Self {
            sampling_tiers: default_sampling_tiers(),
            compare_interval_minutes: default_compare_interval_minutes(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl ChartTuning {
    /// Resample interval for a requested window, from the first tier that
    /// covers it (tiers are listed ascending by `max_hours`). Windows longer
    /// than every tier reuse the coarsest interval.
    pub fn interval_for_window(&self, hours: i64) -> i64 {
        for tier in &self.sampling_tiers {
            if hours <= tier.max_hours {
                return tier.interval_minutes;
            }
        }
        self.sampling_tiers
            .last()
            .map(|t| t.interval_minutes)
            .unwrap_or(0)
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_port() -> u16 {
    8080
}

// Short windows render raw; half-day windows at 1 minute; day-long at 5.
fn default_sampling_tiers() -> Vec<SamplingTier> {
    vec![
        SamplingTier {
            max_hours: 3,
            interval_minutes: 0,
        },
        SamplingTier {
            max_hours: 12,
            interval_minutes: 1,
        },
        SamplingTier {
            max_hours: 24,
            interval_minutes: 5,
        },
    ]
}

fn default_compare_interval_minutes() -> i64 {
    10
}

fn default_poll_interval_secs() -> u64 {
    30
}

pub fn load_backend_config() -> anyhow::Result<BackendConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/backend"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_chart_tuning() -> anyhow::Result<ChartTuning> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/chart").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiering() {
        let tuning = ChartTuning::default();
        assert_eq!(tuning.interval_for_window(1), 0);
        assert_eq!(tuning.interval_for_window(3), 0);
        assert_eq!(tuning.interval_for_window(6), 1);
        assert_eq!(tuning.interval_for_window(12), 1);
        assert_eq!(tuning.interval_for_window(24), 5);
        // beyond the last tier the coarsest interval applies
        assert_eq!(tuning.interval_for_window(72), 5);
    }

    #[test]
    fn test_tuning_deserializes_with_defaults() {
        let tuning: ChartTuning = toml::from_str("").unwrap();
        assert_eq!(tuning.poll_interval_secs, 30);
        assert_eq!(tuning.compare_interval_minutes, 10);
        assert_eq!(tuning.sampling_tiers.len(), 3);
    }

    #[test]
    fn test_tuning_overrides() {
        let tuning: ChartTuning = toml::from_str(
            r#"
            compare_interval_minutes = 15

            [[sampling_tiers]]
            max_hours = 6
            interval_minutes = 2
            "#,
        )
        .unwrap();
        assert_eq!(tuning.compare_interval_minutes, 15);
        assert_eq!(tuning.interval_for_window(2), 2);
        assert_eq!(tuning.interval_for_window(48), 2);
    }
}
