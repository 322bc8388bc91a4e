use std::path::Path;

use anyhow::anyhow;
use weather_core::{Config, Period, UnitSystem, WeatherReport, WeatherService, summary};

/// What to print for a weather lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherView {
    Current,
    Hourly(usize),
    Forecast,
    Average,
}

impl WeatherView {
    pub fn period(&self) -> Period {
        match self {
            WeatherView::Current => Period::Current,
            WeatherView::Hourly(_) => Period::Hourly,
            WeatherView::Forecast | WeatherView::Average => Period::Daily,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WeatherView::Current => "CURRENT WEATHER",
            WeatherView::Hourly(_) => "HOURLY FORECAST",
            WeatherView::Forecast => "WEEKLY FORECAST",
            WeatherView::Average => "AVG WEEKLY WEATHER",
        }
    }

    pub fn render(
        &self,
        report: &WeatherReport,
        units: UnitSystem,
    ) -> weather_core::Result<Vec<String>> {
        match self {
            WeatherView::Current => Ok(vec![summary::format_current(report.current()?, units)]),
            WeatherView::Hourly(hours) => summary::hourly_forecast(report, units, *hours),
            WeatherView::Forecast => summary::weekly_forecast(report, units),
            WeatherView::Average => {
                let avg = summary::weekly_average(report)?;
                Ok(vec![summary::format_average(&avg, units)])
            }
        }
    }
}

/// Settings and the weather service, built once per process.
#[derive(Debug)]
pub struct App {
    pub units: UnitSystem,
    service: anyhow::Result<WeatherService>,
}

impl App {
    pub fn load(units: Option<UnitSystem>, key_file: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = Config::load()?;
        if let Some(path) = key_file {
            config.load_legacy_key_file(path)?;
        }
        config.apply_env();

        let units = units.or(config.units).unwrap_or_default();

        // Missing keys only matter once a weather lookup is requested.
        let service = config
            .api_keys()
            .and_then(|keys| WeatherService::from_keys(&keys).map_err(anyhow::Error::from));

        if let Err(err) = &service {
            tracing::debug!("weather service unavailable: {err:#}");
        }

        Ok(Self { units, service })
    }

    fn service(&self) -> anyhow::Result<&WeatherService> {
        self.service.as_ref().map_err(|err| anyhow!("{err:#}"))
    }

    /// Look up `address` and print `view`.
    pub async fn show(&self, view: WeatherView, address: &str) -> anyhow::Result<()> {
        let (coords, report) = self
            .service()?
            .lookup(address, self.units, view.period())
            .await?;
        tracing::debug!(%coords, "weather report received");

        println!("{}", view.title());
        for line in view.render(&report, self.units)? {
            println!("{line}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_request_the_matching_period() {
        assert_eq!(WeatherView::Current.period(), Period::Current);
        assert_eq!(WeatherView::Hourly(6).period(), Period::Hourly);
        assert_eq!(WeatherView::Forecast.period(), Period::Daily);
        assert_eq!(WeatherView::Average.period(), Period::Daily);
    }

    #[test]
    fn render_reports_missing_block() {
        let err = WeatherView::Current
            .render(&WeatherReport::default(), UnitSystem::Imperial)
            .unwrap_err();
        assert!(err.to_string().contains("current"));
    }
}
