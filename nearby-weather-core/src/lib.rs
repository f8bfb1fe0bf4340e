//! Core library for the `nearby-weather` CLI.
//!
//! This crate defines:
//! - The fetch-and-cache client for OpenWeatherMap's `find` endpoint
//! - A single-slot on-disk cache of the last good response
//! - Validated domain models (observations, query results)
//! - Configuration handling
//!
//! Failures never reach callers of [`ObservationSource`]; they see `None` instead.

pub mod cache;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod model;

pub use cache::ResponseCache;
pub use client::{ObservationSource, RESULT_LIMIT, WeatherClient};
pub use config::Config;
pub use decode::decode_response;
pub use error::WeatherError;
pub use model::{Coordinate, WeatherObservation, WeatherQueryResult};
