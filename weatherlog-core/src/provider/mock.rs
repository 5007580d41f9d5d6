use async_trait::async_trait;
use serde_json::{Value, json};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;

use super::WeatherProvider;

/// Synthetic observation generator, used when no API key is configured.
///
/// Emits payloads in the same raw shape as the live provider so the
/// normalizer path is identical in both modes. Values are plausible:
/// temperature in [-10, 35] °C, humidity in [30, 90] %, pressure in
/// [990, 1030] hPa, wind in [0, 15] m/s, visibility in [5000, 10000] m,
/// and one of six fixed sky-condition phrases.
#[derive(Debug, Clone, Default)]
pub struct MockProvider;

const SKY_CONDITIONS: [&str; 6] = [
    "clear sky",
    "few clouds",
    "scattered clouds",
    "broken clouds",
    "light rain",
    "moderate rain",
];

const DEFAULT_COUNTRY: &str = "US";

/// City label returned for coordinate lookups, whatever the coordinates.
const COORDINATE_CITY: &str = "MockCity";

impl MockProvider {
    pub fn new() -> Self {
        Self
    }

    fn observation(&self, city: &str, country_code: Option<&str>) -> Value {
        let mut rng = Scramble::for_city(city);

        let country = match country_code {
            Some(code) if !code.is_empty() => code,
            _ => DEFAULT_COUNTRY,
        };

        json!({
            "name": city,
            "sys": {"country": country},
            "main": {
                "temp": rng.float_in(-10.0, 35.0),
                "feels_like": rng.float_in(-10.0, 35.0),
                "humidity": rng.int_in(30, 90),
                "pressure": rng.int_in(990, 1030),
            },
            "weather": [
                {"description": SKY_CONDITIONS[rng.int_in(0, SKY_CONDITIONS.len() as i64 - 1) as usize]},
            ],
            "wind": {"speed": rng.float_in(0.0, 15.0)},
            "visibility": rng.int_in(5000, 10000),
        })
    }
}

#[async_trait]
impl WeatherProvider for MockProvider {
    async fn fetch_by_city(&self, city: &str, country_code: Option<&str>) -> Result<Value> {
        Ok(self.observation(city, country_code))
    }

    async fn fetch_by_coordinates(&self, _lat: f64, _lon: f64) -> Result<Value> {
        Ok(self.observation(COORDINATE_CITY, None))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Small xorshift generator seeded from the city name and the wall clock,
/// so repeated fetches vary without pulling in a randomness dependency.
struct Scramble(u64);

impl Scramble {
    fn for_city(city: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        city.hash(&mut hasher);

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as u64 ^ d.as_secs())
            .unwrap_or(0);
        nanos.hash(&mut hasher);

        // xorshift needs a nonzero state.
        Self(hasher.finish() | 1)
    }

    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform-ish float in [lo, hi], rounded to one decimal place.
    fn float_in(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = self.next() as f64 / u64::MAX as f64;
        let value = lo + unit * (hi - lo);
        (value * 10.0).round() / 10.0
    }

    /// Uniform-ish integer in [lo, hi], both ends inclusive.
    fn int_in(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next() % (hi - lo + 1) as u64) as i64
    }
}
