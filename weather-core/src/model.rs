use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::error::{Result, WeatherError};

/// A resolved position, as returned by the geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Unit system sent to the weather API and used to label temperatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "imperial",
            UnitSystem::Metric => "metric",
        }
    }

    /// Temperature label: "F" for imperial, "C" for metric.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "F",
            UnitSystem::Metric => "C",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "imperial" => Ok(UnitSystem::Imperial),
            "metric" => Ok(UnitSystem::Metric),
            _ => Err(WeatherError::InvalidUnit(s.to_string())),
        }
    }
}

/// Granularity of a weather request. Exactly one period is kept per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Current,
    Hourly,
    Daily,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Current => "current",
            Period::Hourly => "hourly",
            Period::Daily => "daily",
        }
    }

    pub const fn all() -> &'static [Period] {
        &[Period::Current, Period::Hourly, Period::Daily]
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the `weather` list attached to every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub id: i32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Precipitation volume for the last hour, in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Precipitation {
    #[serde(rename = "1h")]
    pub last_hour: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSnapshot {
    pub dt: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: u32,
    pub humidity: u8,
    pub dew_point: f64,
    pub uvi: f64,
    pub clouds: u8,
    #[serde(default)]
    pub visibility: Option<u32>,
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_gust: Option<f64>,
    pub wind_deg: u16,
    #[serde(deserialize_with = "non_empty_conditions")]
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub rain: Option<Precipitation>,
    #[serde(default)]
    pub snow: Option<Precipitation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySnapshot {
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: u32,
    pub humidity: u8,
    pub dew_point: f64,
    pub clouds: u8,
    #[serde(default)]
    pub visibility: Option<u32>,
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_gust: Option<f64>,
    pub wind_deg: u16,
    #[serde(deserialize_with = "non_empty_conditions")]
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub rain: Option<Precipitation>,
    #[serde(default)]
    pub snow: Option<Precipitation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub day: f64,
    pub min: f64,
    pub max: f64,
    pub night: f64,
    #[serde(rename = "eve")]
    pub evening: f64,
    #[serde(rename = "morn")]
    pub morning: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeelsLikeRange {
    pub day: f64,
    pub night: f64,
    #[serde(rename = "eve")]
    pub evening: f64,
    #[serde(rename = "morn")]
    pub morning: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub dt: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub temp: TemperatureRange,
    pub feels_like: FeelsLikeRange,
    pub pressure: u32,
    pub humidity: u8,
    pub dew_point: f64,
    pub uvi: f64,
    pub clouds: u8,
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_gust: Option<f64>,
    pub wind_deg: u16,
    #[serde(deserialize_with = "non_empty_conditions")]
    pub weather: Vec<WeatherCondition>,
    /// Daily rain volume in mm; absent on dry days.
    #[serde(default)]
    pub rain: Option<f64>,
    #[serde(default)]
    pub snow: Option<f64>,
}

/// Decoded one-call response. Only the requested period is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(default)]
    pub current: Option<CurrentSnapshot>,
    #[serde(default)]
    pub hourly: Option<Vec<HourlySnapshot>>,
    #[serde(default)]
    pub daily: Option<Vec<DailySnapshot>>,
}

impl WeatherReport {
    pub fn current(&self) -> Result<&CurrentSnapshot> {
        self.current
            .as_ref()
            .ok_or(WeatherError::MissingPeriod(Period::Current))
    }

    pub fn hourly(&self) -> Result<&[HourlySnapshot]> {
        self.hourly
            .as_deref()
            .ok_or(WeatherError::MissingPeriod(Period::Hourly))
    }

    pub fn daily(&self) -> Result<&[DailySnapshot]> {
        self.daily
            .as_deref()
            .ok_or(WeatherError::MissingPeriod(Period::Daily))
    }
}

/// Means over the seven days following today. Derived, never fetched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AverageWeather {
    pub min_temp: f64,
    pub max_temp: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub uvi: f64,
}

fn non_empty_conditions<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<WeatherCondition>, D::Error>
where
    D: Deserializer<'de>,
{
    let conditions = Vec::<WeatherCondition>::deserialize(deserializer)?;
    if conditions.is_empty() {
        return Err(de::Error::invalid_length(0, &"at least one weather condition"));
    }
    Ok(conditions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current_json(weather: serde_json::Value) -> serde_json::Value {
        json!({
            "dt": 1_700_000_000,
            "sunrise": 1_699_990_000,
            "sunset": 1_700_030_000,
            "temp": 71.3,
            "feels_like": 70.9,
            "pressure": 1014,
            "humidity": 52,
            "dew_point": 52.1,
            "uvi": 3.2,
            "clouds": 20,
            "visibility": 10000,
            "wind_speed": 6.9,
            "wind_deg": 250,
            "weather": weather,
            "rain": { "1h": 0.25 }
        })
    }

    #[test]
    fn current_snapshot_decodes_optional_fields() {
        let value = current_json(json!([
            { "id": 801, "main": "Clouds", "description": "few clouds", "icon": "02d" }
        ]));

        let snapshot: CurrentSnapshot = serde_json::from_value(value).expect("valid snapshot");

        assert_eq!(snapshot.humidity, 52);
        assert_eq!(snapshot.visibility, Some(10000));
        assert_eq!(snapshot.wind_gust, None);
        assert_eq!(snapshot.rain, Some(Precipitation { last_hour: 0.25 }));
        assert_eq!(snapshot.snow, None);
        assert_eq!(snapshot.weather[0].description, "few clouds");
    }

    #[test]
    fn empty_condition_list_is_a_decode_error() {
        let value = current_json(json!([]));
        let err = serde_json::from_value::<CurrentSnapshot>(value).unwrap_err();
        assert!(err.to_string().contains("at least one weather condition"));
    }

    #[test]
    fn report_with_only_daily_block() {
        let report: WeatherReport = serde_json::from_value(json!({
            "lat": 40.7,
            "lon": -74.0,
            "timezone": "America/New_York",
            "daily": []
        }))
        .expect("valid report");

        assert!(report.current.is_none());
        assert!(report.hourly.is_none());
        assert_eq!(report.daily().map(<[_]>::len).ok(), Some(0));
        assert!(matches!(
            report.current(),
            Err(WeatherError::MissingPeriod(Period::Current))
        ));
    }

    #[test]
    fn unit_system_parsing_and_labels() {
        assert_eq!("Metric".parse::<UnitSystem>().ok(), Some(UnitSystem::Metric));
        assert_eq!(" imperial ".parse::<UnitSystem>().ok(), Some(UnitSystem::Imperial));
        assert!(matches!(
            "kelvin".parse::<UnitSystem>(),
            Err(WeatherError::InvalidUnit(_))
        ));
        assert_eq!(UnitSystem::Metric.abbreviation(), "C");
        assert_eq!(UnitSystem::Imperial.abbreviation(), "F");
    }

    #[test]
    fn period_names_match_onecall_blocks() {
        let names: Vec<String> = Period::all().iter().map(Period::to_string).collect();
        assert_eq!(names, ["current", "hourly", "daily"]);
    }
}
