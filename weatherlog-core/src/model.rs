use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ingestion request: which city to fetch an observation for.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchRequest {
    pub city: String,
    pub country: Option<String>,
}

impl FetchRequest {
    pub fn new(city: impl Into<String>, country: Option<&str>) -> Self {
        Self {
            city: city.into(),
            country: country.map(str::to_owned),
        }
    }
}

/// A normalized observation, before it is assigned an id and persisted.
///
/// Produced only by [`crate::normalize::normalize`]; every provider payload
/// goes through the same reconciliation regardless of its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: i32,
    pub pressure: i32,
    pub description: String,
    pub wind_speed: f64,
    pub visibility: Option<i32>,
}

/// A persisted weather observation.
///
/// Records are immutable: the store only ever appends, and `fetched_at` is
/// assigned once at creation. `id` is the insertion-order identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub id: i64,
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: i32,
    pub pressure: i32,
    pub description: String,
    pub wind_speed: f64,
    pub visibility: Option<i32>,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherRecord {
    pub fn from_observation(id: i64, observation: Observation, fetched_at: DateTime<Utc>) -> Self {
        Self {
            id,
            city: observation.city,
            country: observation.country,
            temperature: observation.temperature,
            feels_like: observation.feels_like,
            humidity: observation.humidity,
            pressure: observation.pressure,
            description: observation.description,
            wind_speed: observation.wind_speed,
            visibility: observation.visibility,
            fetched_at,
        }
    }
}
