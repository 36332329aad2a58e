use config::{Config, ConfigError, Environment, File};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "cfg/config.json";
pub const ENV_PREFIX: &str = "SERVICE";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_weather_bind")]
    pub weather_bind: String,

    #[serde(default = "default_stock_bind")]
    pub stock_bind: String,

    #[serde(default = "default_geocoding_uri")]
    pub geocoding_uri: String,

    #[serde(default = "default_forecast_uri")]
    pub forecast_uri: String,

    #[serde(default = "default_chart_uri")]
    pub chart_uri: String,

    #[serde(default = "default_search_uri")]
    pub search_uri: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Settings {
    /// Reads `path` (if it exists) and then `SERVICE_*` environment overrides.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let mut settings = Config::default();
        settings.merge(File::with_name(path).required(false))?;
        settings.merge(Environment::with_prefix(ENV_PREFIX))?;

        settings.try_into::<Settings>()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            weather_bind: default_weather_bind(),
            stock_bind: default_stock_bind(),
            geocoding_uri: default_geocoding_uri(),
            forecast_uri: default_forecast_uri(),
            chart_uri: default_chart_uri(),
            search_uri: default_search_uri(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_weather_bind() -> String {
    String::from("127.0.0.1:3001")
}

fn default_stock_bind() -> String {
    String::from("127.0.0.1:3000")
}

fn default_geocoding_uri() -> String {
    String::from("https://geocoding-api.open-meteo.com/v1/search")
}

fn default_forecast_uri() -> String {
    String::from("https://api.open-meteo.com/v1/forecast")
}

fn default_chart_uri() -> String {
    String::from("https://query1.finance.yahoo.com/v8/finance/chart")
}

fn default_search_uri() -> String {
    String::from("https://query1.finance.yahoo.com/v1/finance/search")
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    String::from("quote-weather-service/0.1")
}

#[cfg(test)]
mod settings_test {
    use super::*;

    #[test]
    fn test_load_reads_config_file() {
        let settings = Settings::load("cfg/config_test.json").unwrap();

        assert_eq!(settings.weather_bind, "127.0.0.1:4001");
        assert_eq!(settings.stock_bind, "127.0.0.1:4000");
        assert_eq!(settings.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_load_falls_back_to_defaults_for_missing_keys() {
        let settings = Settings::load("cfg/config_test.json").unwrap();

        assert_eq!(settings.forecast_uri, "https://api.open-meteo.com/v1/forecast");
        assert_eq!(settings.chart_uri, "https://query1.finance.yahoo.com/v8/finance/chart");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let settings = Settings::load("cfg/does_not_exist").unwrap();
        let defaults = Settings::default();

        assert_eq!(settings.geocoding_uri, defaults.geocoding_uri);
        assert_eq!(settings.request_timeout_secs, 10);
    }
}
