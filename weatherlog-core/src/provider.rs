use crate::config::Config;
use crate::error::Result;
use crate::provider::{mock::MockProvider, openweather::OpenWeatherProvider};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

pub mod mock;
pub mod openweather;

/// A source of raw weather observations for a city or coordinate pair.
///
/// Implementations return the upstream document untouched; interpretation
/// is the normalizer's job. `name` is a stable label for logs and
/// diagnostics only; callers must not branch on it.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_by_city(&self, city: &str, country_code: Option<&str>) -> Result<Value>;

    async fn fetch_by_coordinates(&self, lat: f64, lon: f64) -> Result<Value>;

    fn name(&self) -> &'static str;
}

/// Construct the provider the configuration calls for.
///
/// A non-empty API key selects the live OpenWeather provider; otherwise the
/// synthetic provider stands in. The choice is made once, here, and never
/// exposed to callers beyond an informational log line.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    match config.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => {
            tracing::info!("using OpenWeather provider");
            Box::new(OpenWeatherProvider::new(key.trim().to_owned()))
        }
        _ => {
            tracing::info!("no API key configured, using synthetic weather provider");
            Box::new(MockProvider::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_falls_back_to_mock_without_credential() {
        let cfg = Config::default();
        let provider = provider_from_config(&cfg);
        assert_eq!(provider.name(), "mock");
    }

    #[test]
    fn selector_treats_blank_credential_as_absent() {
        let cfg = Config { api_key: Some("   ".into()), data_file: None };
        let provider = provider_from_config(&cfg);
        assert_eq!(provider.name(), "mock");
    }

    #[test]
    fn selector_picks_live_provider_with_credential() {
        let cfg = Config { api_key: Some("KEY".into()), data_file: None };
        let provider = provider_from_config(&cfg);
        assert_eq!(provider.name(), "openweather");
    }
}
