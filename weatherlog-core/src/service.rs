//! Ingestion orchestration and the query surface.

use std::sync::Arc;

use crate::aggregate::{Aggregator, LatestPerCity, WeatherStats};
use crate::config::Config;
use crate::error::{Result, WeatherError};
use crate::model::{FetchRequest, WeatherRecord};
use crate::normalize::normalize;
use crate::provider::{WeatherProvider, provider_from_config};
use crate::store::RecordStore;

const MAX_CITY_LEN: usize = 100;

/// Coordinates a single fetch: provider call, normalization, persistence.
///
/// Every failure short-circuits before the store is touched; no partial or
/// placeholder record is ever written. Queries read a point-in-time
/// snapshot and are independent of in-flight ingestion.
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
    store: Arc<RecordStore>,
}

impl WeatherService {
    pub fn new(provider: Box<dyn WeatherProvider>, store: Arc<RecordStore>) -> Self {
        Self { provider, store }
    }

    /// Build a service with the provider the configuration selects.
    pub fn from_config(config: &Config, store: Arc<RecordStore>) -> Self {
        Self::new(provider_from_config(config), store)
    }

    /// Fetch one observation for a city and persist it.
    pub async fn ingest(&self, request: &FetchRequest) -> Result<WeatherRecord> {
        let city = request.city.trim();
        if city.is_empty() {
            return Err(WeatherError::Validation("city must not be empty".into()));
        }
        if city.len() > MAX_CITY_LEN {
            return Err(WeatherError::Validation(format!(
                "city must be at most {MAX_CITY_LEN} characters"
            )));
        }

        let raw = self
            .provider
            .fetch_by_city(city, request.country.as_deref())
            .await
            .map_err(|err| {
                tracing::warn!(%city, %err, "weather fetch failed");
                err
            })?;

        let observation = normalize(&raw).map_err(|err| {
            tracing::warn!(%city, %err, "weather payload rejected");
            err
        })?;

        self.store.append(observation)
    }

    /// Fetch one observation for a coordinate pair and persist it.
    pub async fn ingest_at(&self, lat: f64, lon: f64) -> Result<WeatherRecord> {
        let raw = self
            .provider
            .fetch_by_coordinates(lat, lon)
            .await
            .map_err(|err| {
                tracing::warn!(lat, lon, %err, "weather fetch failed");
                err
            })?;

        let observation = normalize(&raw).map_err(|err| {
            tracing::warn!(lat, lon, %err, "weather payload rejected");
            err
        })?;

        self.store.append(observation)
    }

    /// Every record, newest first.
    pub fn list(&self) -> Vec<WeatherRecord> {
        let mut records = self.store.all();
        records.sort_by(|a, b| (b.fetched_at, b.id).cmp(&(a.fetched_at, a.id)));
        records
    }

    pub fn get(&self, id: i64) -> Result<WeatherRecord> {
        self.store.get(id).ok_or(WeatherError::NotFound(id))
    }

    pub fn latest_per_city(&self) -> LatestPerCity {
        Aggregator::latest_per_city(&self.store.all())
    }

    pub fn statistics(&self) -> WeatherStats {
        Aggregator::statistics(&self.store.all())
    }
}
