use thiserror::Error;

/// Errors surfaced by ingestion and query operations.
///
/// The first three variants form the caller-visible taxonomy: bad input,
/// an upstream that could not be reached, and an upstream payload that was
/// reachable but structurally unusable. The remaining variants cover point
/// lookups and the file-backed store.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("weather provider unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("malformed weather payload: {0}")]
    Transformation(String),

    #[error("weather record {0} not found")]
    NotFound(i64),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, WeatherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = WeatherError::Validation("city must not be empty".into());
        assert_eq!(err.to_string(), "invalid request: city must not be empty");

        let err = WeatherError::NotFound(7);
        assert_eq!(err.to_string(), "weather record 7 not found");
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: WeatherError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }
}
