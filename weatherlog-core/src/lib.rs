//! Core library for the `weatherlog` tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over weather providers (live and synthetic)
//! - Normalization of raw provider payloads into canonical records
//! - The append-only record store and aggregation queries
//!
//! It is used by `weatherlog-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod service;
pub mod store;

pub use aggregate::{Aggregator, LatestPerCity, WeatherStats};
pub use config::Config;
pub use error::{Result, WeatherError};
pub use model::{FetchRequest, Observation, WeatherRecord};
pub use provider::{WeatherProvider, provider_from_config};
pub use service::WeatherService;
pub use store::RecordStore;
