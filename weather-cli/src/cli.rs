use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Select};
use weather_core::{Config, ServiceId, UnitSystem, convert, fake_forecast};

use crate::{
    app::{App, WeatherView},
    menu,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Unit system for weather output: "imperial" or "metric".
    #[arg(long, global = true)]
    pub units: Option<UnitSystem>,

    /// Legacy JSON key file with `OpenWeatherMapApiKey` and `GoogleApiKey`.
    #[arg(long, global = true)]
    pub keys: Option<PathBuf>,

    /// Without a subcommand the interactive menu is started.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API keys for Google Geocoding and OpenWeather.
    Configure {
        /// Only configure this service ("google" or "openweather").
        service: Option<String>,
    },

    /// Current conditions for an address.
    Current {
        /// Partial or full address.
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
    },

    /// Hour-by-hour forecast for an address.
    Hourly {
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,

        /// Number of hours to show.
        #[arg(long, default_value_t = 12)]
        hours: usize,
    },

    /// 7-day forecast for an address.
    Forecast {
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
    },

    /// Averages over the coming 7 days for an address.
    Average {
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
    },

    /// Convert a temperature between Celsius and Fahrenheit.
    Convert {
        /// Value to convert, in the unit opposite to `--to`.
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Target unit: C or F.
        #[arg(long)]
        to: String,
    },

    /// Print a forecast with the temperature of your choice.
    Fake {
        #[arg(allow_hyphen_values = true)]
        temperature: String,
    },

    /// Interactive menu.
    Menu,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let app = App::load(self.units, self.keys.as_deref())?;

        match self.command.unwrap_or(Command::Menu) {
            Command::Configure { service } => configure(service.as_deref()),
            Command::Current { address } => {
                app.show(WeatherView::Current, &address.join(" ")).await
            }
            Command::Hourly { address, hours } => {
                app.show(WeatherView::Hourly(hours), &address.join(" ")).await
            }
            Command::Forecast { address } => {
                app.show(WeatherView::Forecast, &address.join(" ")).await
            }
            Command::Average { address } => {
                app.show(WeatherView::Average, &address.join(" ")).await
            }
            Command::Convert { value, to } => {
                println!("{}", convert(&value, &to)?);
                Ok(())
            }
            Command::Fake { temperature } => {
                println!("{}", fake_forecast(&temperature)?);
                Ok(())
            }
            Command::Menu => menu::run(&app).await,
        }
    }
}

/// Services whose key `configure` asks for: the named one, or all of them.
fn services_to_configure(service: Option<&str>) -> anyhow::Result<Vec<ServiceId>> {
    match service {
        Some(name) => Ok(vec![ServiceId::try_from(name)?]),
        None => Ok(ServiceId::all().to_vec()),
    }
}

/// Prompt for API keys and the default unit system, then save the config.
fn configure(service: Option<&str>) -> anyhow::Result<()> {
    let services = services_to_configure(service)?;
    let mut config = Config::load()?;

    for id in &services {
        let prompt = format!("{id} API key:");
        let mut input = Password::new(&prompt).without_confirmation();
        if config.is_configured(*id) {
            input = input.with_help_message("leave empty to keep the stored key");
        }

        let key = input
            .prompt()
            .with_context(|| format!("Failed to read API key for '{id}'"))?;

        if !key.trim().is_empty() {
            config.set_api_key(*id, key.trim().to_string());
        }
    }

    let units = Select::new(
        "Default unit system:",
        vec![UnitSystem::Imperial, UnitSystem::Metric],
    )
    .prompt()
    .context("Failed to read unit system")?;
    config.units = Some(units);

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configure_defaults_to_every_service() {
        let services = services_to_configure(None).unwrap();
        assert_eq!(services, [ServiceId::Google, ServiceId::OpenWeather]);
    }

    #[test]
    fn configure_accepts_a_single_service_name() {
        let services = services_to_configure(Some("OpenWeather")).unwrap();
        assert_eq!(services, [ServiceId::OpenWeather]);
    }

    #[test]
    fn configure_rejects_unknown_service() {
        let err = services_to_configure(Some("bing")).unwrap_err();
        assert!(err.to_string().contains("Unknown service"));
    }

    #[test]
    fn configure_subcommand_takes_optional_service() {
        let cli = Cli::try_parse_from(["weather", "configure", "google"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Configure { service: Some(ref name) }) if name == "google"
        ));

        let cli = Cli::try_parse_from(["weather", "configure"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Configure { service: None })));
    }
}
