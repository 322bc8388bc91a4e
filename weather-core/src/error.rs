use thiserror::Error;

use crate::model::Period;

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

/// Errors produced by geocoding, weather lookups and the conversion tools.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Network, DNS or timeout failure while talking to an upstream API.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered, but not with a usable status.
    #[error("{service} request failed: {status}")]
    UpstreamStatus { service: &'static str, status: String },

    #[error("No location found for '{place}'")]
    NotFound { place: String },

    #[error("Failed to parse {service} response")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid input '{0}': must be a numerical value")]
    InvalidInput(String),

    #[error("Invalid unit '{0}'")]
    InvalidUnit(String),

    #[error("Weather report does not contain {0} data")]
    MissingPeriod(Period),
}

impl WeatherError {
    /// True when the failure happened before any response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_message_carries_status_text() {
        let err = WeatherError::UpstreamStatus {
            service: "OpenWeather",
            status: "500 Internal Server Error".to_string(),
        };
        assert_eq!(err.to_string(), "OpenWeather request failed: 500 Internal Server Error");
        assert!(!err.is_transport());
    }

    #[test]
    fn missing_period_names_the_period() {
        let err = WeatherError::MissingPeriod(Period::Daily);
        assert!(err.to_string().contains("daily"));
    }
}
