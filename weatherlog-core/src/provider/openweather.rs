use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::{Result, WeatherError};

use super::WeatherProvider;

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Live provider backed by the OpenWeather current-conditions endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_owned())
    }

    /// Point the provider at a different endpoint, e.g. a local test server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    async fn fetch(&self, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}/weather", self.base_url);

        let mut query: Vec<(&str, String)> = params.to_vec();
        query.push(("appid", self.api_key.clone()));
        query.push(("units", "metric".to_owned()));

        let res = self
            .http
            .get(&url)
            .query(&query)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                WeatherError::UpstreamUnavailable(format!("OpenWeather request failed: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::UpstreamUnavailable(format!(
                "Failed to read OpenWeather response body: {e}"
            ))
        })?;

        if !status.is_success() {
            return Err(WeatherError::UpstreamUnavailable(format!(
                "OpenWeather request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        // The call itself succeeded; an unreadable body is a payload problem.
        serde_json::from_str(&body).map_err(|e| {
            WeatherError::Transformation(format!("OpenWeather response is not valid JSON: {e}"))
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_by_city(&self, city: &str, country_code: Option<&str>) -> Result<Value> {
        let query = match country_code {
            Some(code) if !code.is_empty() => format!("{city},{code}"),
            _ => city.to_owned(),
        };

        self.fetch(&[("q", query)]).await
    }

    async fn fetch_by_coordinates(&self, lat: f64, lon: f64) -> Result<Value> {
        self.fetch(&[("lat", lat.to_string()), ("lon", lon.to_string())])
            .await
    }

    fn name(&self) -> &'static str {
        "openweather"
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
