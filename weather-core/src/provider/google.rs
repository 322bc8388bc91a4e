use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{Result, WeatherError},
    model::Coordinates,
    provider::truncate_body,
};

use super::Geocoder;

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const SERVICE: &str = "Google Geocoding";

#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl GoogleGeocoder {
    pub fn new(api_key: String, http: Client) -> Self {
        Self {
            api_key,
            endpoint: GEOCODE_URL.to_string(),
            http,
        }
    }

    /// Point the geocoder at another endpoint (used against mock servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: Coordinates,
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn resolve(&self, place: &str) -> Result<Coordinates> {
        tracing::debug!(%place, "geocoding request");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("key", self.api_key.as_str()), ("address", place)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, body = truncate_body(&body), "geocoding failed");
            return Err(WeatherError::UpstreamStatus {
                service: SERVICE,
                status: status.to_string(),
            });
        }

        let parsed: GeocodeResponse = serde_json::from_str(&body)
            .map_err(|source| WeatherError::Decode { service: SERVICE, source })?;

        match parsed.status.as_str() {
            "OK" | "ZERO_RESULTS" => parsed
                .results
                .into_iter()
                .next()
                .map(|r| r.geometry.location)
                .ok_or_else(|| WeatherError::NotFound {
                    place: place.to_string(),
                }),
            other => {
                let status = match parsed.error_message {
                    Some(msg) => format!("{other}: {msg}"),
                    None => other.to_string(),
                };
                Err(WeatherError::UpstreamStatus {
                    service: SERVICE,
                    status,
                })
            }
        }
    }
}
