//! Human-readable lines built from a decoded [`WeatherReport`].
//!
//! Everything here is pure. Timestamps are rendered in the local time zone.

use chrono::{DateTime, Datelike, Local, Timelike};

use crate::{
    error::Result,
    model::{
        AverageWeather, CurrentSnapshot, DailySnapshot, HourlySnapshot, UnitSystem,
        WeatherCondition, WeatherReport,
    },
};

/// Days summarized by the weekly views. Index 0 (today) is never included.
pub const FORECAST_DAYS: usize = 7;

fn local_time(ts: i64) -> DateTime<Local> {
    DateTime::from_timestamp(ts, 0)
        .unwrap_or_default()
        .with_timezone(&Local)
}

// Decoding rejects empty condition lists, so this only falls back for hand-built snapshots.
fn description(conditions: &[WeatherCondition]) -> &str {
    conditions.first().map_or("", |c| c.description.as_str())
}

fn day_label(t: &DateTime<Local>) -> String {
    format!("{:<9} {:>2}/{:>2}", t.format("%A").to_string(), t.month(), t.day())
}

pub fn format_current(snapshot: &CurrentSnapshot, units: UnitSystem) -> String {
    format!(
        "Temp: {:.1}{} | Humidity: {}% | {}",
        snapshot.temp,
        units.abbreviation(),
        snapshot.humidity,
        description(&snapshot.weather)
    )
}

pub fn format_hour(snapshot: &HourlySnapshot, units: UnitSystem) -> String {
    let t = local_time(snapshot.dt);
    format!(
        "{} {:02}:00\t{:5.2}{} | Humidity: {}% | {}",
        day_label(&t),
        t.hour(),
        snapshot.temp,
        units.abbreviation(),
        snapshot.humidity,
        description(&snapshot.weather)
    )
}

pub fn format_day(snapshot: &DailySnapshot, units: UnitSystem) -> String {
    let t = local_time(snapshot.dt);
    let unit = units.abbreviation();
    format!(
        "{}\tHigh: {:5.2}{unit} Low: {:5.2}{unit} | Humidity: {}% | {}",
        day_label(&t),
        snapshot.temp.max,
        snapshot.temp.min,
        snapshot.humidity,
        description(&snapshot.weather)
    )
}

/// Means over daily entries 1..=7.
///
/// The sums are always divided by [`FORECAST_DAYS`], even when the report holds fewer
/// than eight days, so a short report understates every field.
pub fn weekly_average(report: &WeatherReport) -> Result<AverageWeather> {
    let days = report.daily()?;
    let window = days.iter().skip(1).take(FORECAST_DAYS);

    let sum = window.fold(AverageWeather::default(), |acc, day| AverageWeather {
        min_temp: acc.min_temp + day.temp.min,
        max_temp: acc.max_temp + day.temp.max,
        pressure: acc.pressure + f64::from(day.pressure),
        humidity: acc.humidity + f64::from(day.humidity),
        uvi: acc.uvi + day.uvi,
    });

    let n = FORECAST_DAYS as f64;
    Ok(AverageWeather {
        min_temp: sum.min_temp / n,
        max_temp: sum.max_temp / n,
        pressure: sum.pressure / n,
        humidity: sum.humidity / n,
        uvi: sum.uvi / n,
    })
}

pub fn format_average(avg: &AverageWeather, units: UnitSystem) -> String {
    let unit = units.abbreviation();
    format!(
        "Min: {:.1}{unit} Max: {:.1}{unit} | Pressure: {:.0} mb | Humidity: {:.0}% | UVI: {:.1}",
        avg.min_temp, avg.max_temp, avg.pressure, avg.humidity, avg.uvi
    )
}

/// Line used by the weekly listing: low before high, one decimal each.
pub fn format_forecast_day(snapshot: &DailySnapshot, units: UnitSystem) -> String {
    let t = local_time(snapshot.dt);
    let unit = units.abbreviation();
    format!(
        "{}  -  Low: {:.1}{unit} High: {:.1}{unit} | Humidity: {}% | {}",
        day_label(&t),
        snapshot.temp.min,
        snapshot.temp.max,
        snapshot.humidity,
        description(&snapshot.weather)
    )
}

/// One line per day for entries 1..=7, in report order.
pub fn weekly_forecast(report: &WeatherReport, units: UnitSystem) -> Result<Vec<String>> {
    Ok(report
        .daily()?
        .iter()
        .skip(1)
        .take(FORECAST_DAYS)
        .map(|day| format_forecast_day(day, units))
        .collect())
}

/// The first `count` hourly lines.
pub fn hourly_forecast(
    report: &WeatherReport,
    units: UnitSystem,
    count: usize,
) -> Result<Vec<String>> {
    Ok(report
        .hourly()?
        .iter()
        .take(count)
        .map(|hour| format_hour(hour, units))
        .collect())
}
