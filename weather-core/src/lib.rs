//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & API key handling
//! - Geocoding (Google) and one-call weather lookups (OpenWeather)
//! - The decoded weather model and the text summaries built from it
//! - The temperature conversion tools
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod summary;
pub mod tools;

pub use config::{ApiKeys, Config, ServiceConfig};
pub use error::{Result, WeatherError};
pub use model::{
    AverageWeather, Coordinates, CurrentSnapshot, DailySnapshot, HourlySnapshot, Period,
    UnitSystem, WeatherCondition, WeatherReport,
};
pub use provider::{Geocoder, ServiceId, WeatherProvider, WeatherService};
pub use tools::{Conversion, TempUnit, convert, fake_forecast};
