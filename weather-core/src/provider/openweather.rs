use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::{Result, WeatherError},
    model::{Coordinates, Period, UnitSystem, WeatherReport},
    provider::truncate_body,
};

use super::WeatherProvider;

const ONECALL_URL: &str = "https://api.openweathermap.org/data/2.5/onecall";
const SERVICE: &str = "OpenWeather";
const MINUTELY: &str = "minutely";

/// Blocks to leave out of a one-call response so only `period` comes back.
/// `minutely` is always excluded.
pub fn exclusions(period: Period) -> Vec<&'static str> {
    std::iter::once(MINUTELY)
        .chain(
            Period::all()
                .iter()
                .filter(|p| **p != period)
                .map(Period::as_str),
        )
        .collect()
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, http: Client) -> Self {
        Self {
            api_key,
            endpoint: ONECALL_URL.to_string(),
            http,
        }
    }

    /// Point the provider at another endpoint (used against mock servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(
        &self,
        coords: Coordinates,
        units: UnitSystem,
        period: Period,
    ) -> Result<WeatherReport> {
        let exclude = exclusions(period).join(",");
        tracing::debug!(%coords, %units, %period, %exclude, "one-call request");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("appid", self.api_key.clone()),
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("exclude", exclude),
                ("units", units.as_str().to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        if status != reqwest::StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            tracing::debug!(%status, body = truncate_body(&body), "one-call failed");
            return Err(WeatherError::UpstreamStatus {
                service: SERVICE,
                status: status.to_string(),
            });
        }

        let body = res.text().await?;
        serde_json::from_str(&body).map_err(|source| WeatherError::Decode {
            service: SERVICE,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DailySnapshot, FeelsLikeRange, TemperatureRange, WeatherCondition};
    use crate::provider::http_client;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COORDS: Coordinates = Coordinates {
        latitude: 51.5074,
        longitude: -0.1278,
    };

    fn provider_for(server: &MockServer) -> OpenWeatherProvider {
        let http = http_client().expect("client builds");
        OpenWeatherProvider::new("owm_key".to_string(), http)
            .with_endpoint(format!("{}/data/2.5/onecall", server.uri()))
    }

    fn day(dt: i64) -> DailySnapshot {
        DailySnapshot {
            dt,
            sunrise: dt - 20_000,
            sunset: dt + 20_000,
            temp: TemperatureRange {
                day: 15.0,
                min: 9.5,
                max: 17.25,
                night: 10.0,
                evening: 14.0,
                morning: 11.0,
            },
            feels_like: FeelsLikeRange {
                day: 14.5,
                night: 9.0,
                evening: 13.0,
                morning: 10.0,
            },
            pressure: 1012,
            humidity: 70,
            dew_point: 8.0,
            uvi: 2.5,
            clouds: 40,
            wind_speed: 4.1,
            wind_gust: Some(7.0),
            wind_deg: 200,
            weather: vec![WeatherCondition {
                id: 500,
                main: "Rain".to_string(),
                description: "light rain".to_string(),
                icon: "10d".to_string(),
            }],
            rain: Some(1.2),
            snow: None,
        }
    }

    #[test]
    fn daily_excludes_everything_else() {
        assert_eq!(exclusions(Period::Daily), vec!["minutely", "current", "hourly"]);
    }

    #[test]
    fn current_excludes_everything_else() {
        assert_eq!(exclusions(Period::Current), vec!["minutely", "hourly", "daily"]);
    }

    #[test]
    fn hourly_keeps_only_hourly() {
        assert_eq!(exclusions(Period::Hourly), vec!["minutely", "current", "daily"]);
    }

    #[tokio::test]
    async fn fetches_daily_block_with_expected_query() {
        let mock_server = MockServer::start().await;

        let report = WeatherReport {
            daily: Some(vec![day(1_700_000_000), day(1_700_086_400)]),
            ..WeatherReport::default()
        };

        Mock::given(method("GET"))
            .and(path("/data/2.5/onecall"))
            .and(query_param("appid", "owm_key"))
            .and(query_param("lat", "51.5074"))
            .and(query_param("lon", "-0.1278"))
            .and(query_param("exclude", "minutely,current,hourly"))
            .and(query_param("units", "metric"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::to_value(&report).unwrap()),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetched = provider_for(&mock_server)
            .fetch(COORDS, UnitSystem::Metric, Period::Daily)
            .await
            .unwrap();

        assert_eq!(fetched, report);
        assert!(fetched.current.is_none());
        assert_eq!(fetched.daily().unwrap()[1].dt, 1_700_086_400);
    }

    #[tokio::test]
    async fn server_error_is_upstream_status_without_decoding() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/onecall"))
            .respond_with(ResponseTemplate::new(500).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let err = provider_for(&mock_server)
            .fetch(COORDS, UnitSystem::Imperial, Period::Current)
            .await
            .unwrap_err();

        match err {
            WeatherError::UpstreamStatus { service, status } => {
                assert_eq!(service, "OpenWeather");
                assert_eq!(status, "500 Internal Server Error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unauthorized_is_upstream_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/onecall"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401,
                "message": "Invalid API key."
            })))
            .mount(&mock_server)
            .await;

        let err = provider_for(&mock_server)
            .fetch(COORDS, UnitSystem::Imperial, Period::Hourly)
            .await
            .unwrap_err();

        assert!(
            matches!(err, WeatherError::UpstreamStatus { ref status, .. }
                if status == "401 Unauthorized")
        );
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/onecall"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"current\": 12"))
            .mount(&mock_server)
            .await;

        let err = provider_for(&mock_server)
            .fetch(COORDS, UnitSystem::Imperial, Period::Current)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Decode { service: "OpenWeather", .. }));
    }

    #[tokio::test]
    async fn snapshot_without_conditions_is_decode_error() {
        let mock_server = MockServer::start().await;

        let mut value = serde_json::to_value(WeatherReport {
            daily: Some(vec![day(1_700_000_000)]),
            ..WeatherReport::default()
        })
        .unwrap();
        value["daily"][0]["weather"] = serde_json::json!([]);

        Mock::given(method("GET"))
            .and(path("/data/2.5/onecall"))
            .respond_with(ResponseTemplate::new(200).set_body_json(value))
            .mount(&mock_server)
            .await;

        let err = provider_for(&mock_server)
            .fetch(COORDS, UnitSystem::Metric, Period::Daily)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Decode { .. }));
    }
}
