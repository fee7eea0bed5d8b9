use chrono::NaiveDate;
use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `SUBSCRIPTION_ANALYTICS__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Parameters of the synthetic dataset. The defaults reproduce the
/// reference dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default = "default_days")]
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    /// Length of the window selected when no dates are given.
    #[serde(default = "default_window_days")]
    pub default_window_days: i64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_seed() -> u64 {
    42
}
fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}
fn default_days() -> u32 {
    400
}
fn default_window_days() -> i64 {
    30
}
fn default_page_size() -> usize {
    50
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            start_date: default_start_date(),
            days: default_days(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_window_days: default_window_days(),
            page_size: default_page_size(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("SUBSCRIPTION_ANALYTICS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_dataset() {
        let config = AppConfig::default();
        assert_eq!(config.generator.seed, 42);
        assert_eq!(config.generator.days, 400);
        assert_eq!(
            config.generator.start_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(config.dashboard.default_window_days, 30);
        assert_eq!(config.dashboard.page_size, 50);
    }

    #[test]
    fn test_partial_sections_fall_back_to_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"generator": {"seed": 7}}"#).unwrap();
        assert_eq!(config.generator.seed, 7);
        assert_eq!(config.generator.days, 400);
        assert_eq!(config.dashboard.page_size, 50);
    }
}
