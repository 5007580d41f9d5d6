//! Reconciliation of raw provider payloads into flat [`Observation`]s.
//!
//! The policy is two-tier: the payload root, `main` and `weather` sections
//! must be structurally present, otherwise the whole fetch fails; every
//! individual leaf inside them is optional and falls back to its zero value.

use serde_json::Value;

use crate::error::{Result, WeatherError};
use crate::model::Observation;

/// Map a raw payload shaped like the OpenWeather current-conditions
/// document into a canonical observation.
///
/// Hard failures (`Transformation`): root is not an object, `main` is
/// missing or not an object, `weather` is missing or not an array. Any
/// other absent or mistyped leaf defaults silently: 0 / 0.0 / "" and
/// `None` for `visibility`. An empty `weather` array is tolerated and
/// yields an empty description.
pub fn normalize(raw: &Value) -> Result<Observation> {
    let root = raw
        .as_object()
        .ok_or_else(|| WeatherError::Transformation("payload root is not an object".into()))?;

    let main = root
        .get("main")
        .and_then(Value::as_object)
        .ok_or_else(|| WeatherError::Transformation("missing `main` section".into()))?;

    let weather = root
        .get("weather")
        .and_then(Value::as_array)
        .ok_or_else(|| WeatherError::Transformation("missing `weather` section".into()))?;

    let wind = root.get("wind").and_then(Value::as_object);
    let sys = root.get("sys").and_then(Value::as_object);

    Ok(Observation {
        city: string_or_empty(root.get("name")),
        country: string_or_empty(sys.and_then(|s| s.get("country"))),
        temperature: float_or_zero(main.get("temp")),
        feels_like: float_or_zero(main.get("feels_like")),
        humidity: int_or_zero(main.get("humidity")),
        pressure: int_or_zero(main.get("pressure")),
        description: string_or_empty(weather.first().and_then(|w| w.get("description"))),
        wind_speed: float_or_zero(wind.and_then(|w| w.get("speed"))),
        visibility: root.get("visibility").and_then(int_opt),
    })
}

fn string_or_empty(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_owned()
}

fn float_or_zero(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(0.0)
}

fn int_or_zero(value: Option<&Value>) -> i32 {
    value.and_then(int_opt).unwrap_or(0)
}

fn int_opt(value: &Value) -> Option<i32> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .map(|n| n as i32)
}
