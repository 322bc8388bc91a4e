use crate::{
    ApiKeys, Coordinates, Period, UnitSystem, WeatherReport,
    error::{Result, WeatherError},
    provider::{google::GoogleGeocoder, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

pub mod google;
pub mod openweather;

/// Timeout applied to every outbound request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceId {
    Google,
    OpenWeather,
}

impl ServiceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::Google => "google",
            ServiceId::OpenWeather => "openweather",
        }
    }

    pub const fn all() -> &'static [ServiceId] {
        &[ServiceId::Google, ServiceId::OpenWeather]
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "google" => Ok(ServiceId::Google),
            "openweather" => Ok(ServiceId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown service '{value}'. Supported services: google, openweather."
            )),
        }
    }
}

/// Turns free text into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn resolve(&self, place: &str) -> Result<Coordinates>;
}

/// Fetches one period of weather for a position.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(
        &self,
        coords: Coordinates,
        units: UnitSystem,
        period: Period,
    ) -> Result<WeatherReport>;
}

/// Build the HTTP client shared by all outbound calls.
pub fn http_client() -> Result<Client> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Shorten an upstream body for log output.
pub(crate) fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Geocoder and weather provider chained for a single address lookup.
#[derive(Debug)]
pub struct WeatherService {
    geocoder: Box<dyn Geocoder>,
    provider: Box<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(geocoder: Box<dyn Geocoder>, provider: Box<dyn WeatherProvider>) -> Self {
        Self { geocoder, provider }
    }

    /// Construct the Google + OpenWeather pair around one shared client.
    pub fn from_keys(keys: &ApiKeys) -> Result<Self> {
        let http = http_client()?;

        Ok(Self::new(
            Box::new(GoogleGeocoder::new(keys.google.clone(), http.clone())),
            Box::new(OpenWeatherProvider::new(keys.openweather.clone(), http)),
        ))
    }

    /// Resolve `place`, then fetch `period` weather for it. Errors are returned as-is.
    pub async fn lookup(
        &self,
        place: &str,
        units: UnitSystem,
        period: Period,
    ) -> Result<(Coordinates, WeatherReport)> {
        let place = place.trim();
        if place.is_empty() {
            return Err(WeatherError::NotFound {
                place: place.to_string(),
            });
        }

        let coords = self.geocoder.resolve(place).await?;
        tracing::info!(%place, %coords, %period, "resolved location");

        let report = self.provider.fetch(coords, units, period).await?;
        Ok((coords, report))
    }
}
