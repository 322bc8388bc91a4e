use std::{fmt, str::FromStr};

use crate::error::{Result, WeatherError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempUnit {
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            TempUnit::Celsius => "C",
            TempUnit::Fahrenheit => "F",
        }
    }

    fn other(&self) -> TempUnit {
        match self {
            TempUnit::Celsius => TempUnit::Fahrenheit,
            TempUnit::Fahrenheit => TempUnit::Celsius,
        }
    }
}

impl fmt::Display for TempUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TempUnit::Celsius => f.write_str("Celsius (C)"),
            TempUnit::Fahrenheit => f.write_str("Fahrenheit (F)"),
        }
    }
}

impl FromStr for TempUnit {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "C" => Ok(TempUnit::Celsius),
            "F" => Ok(TempUnit::Fahrenheit),
            _ => Err(WeatherError::InvalidUnit(s.to_string())),
        }
    }
}

/// Outcome of a temperature conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    /// Input rounded to one decimal place.
    pub input: f64,
    pub from: TempUnit,
    pub result: f64,
    pub to: TempUnit,
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} {} = {:.1} {}",
            self.input,
            self.from.abbreviation(),
            self.result,
            self.to.abbreviation()
        )
    }
}

/// Convert `text` into `unit` ("C" or "F"); the input is read as the other unit.
pub fn convert(text: &str, unit: &str) -> Result<Conversion> {
    let value: f64 = text
        .trim()
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| WeatherError::InvalidInput(text.to_string()))?;

    let to: TempUnit = unit.parse()?;

    // f64::round is half away from zero; adding 0.0 folds -0.0 into 0.0.
    let input = (value * 10.0).round() / 10.0 + 0.0;

    let result = match to {
        TempUnit::Celsius => (input - 32.0) * 5.0 / 9.0,
        TempUnit::Fahrenheit => input * 9.0 / 5.0 + 32.0,
    };

    Ok(Conversion {
        input,
        from: to.other(),
        result,
        to,
    })
}

/// Echo a user-chosen temperature back as a "forecast".
pub fn fake_forecast(text: &str) -> Result<String> {
    let text = text.trim();
    text.parse::<i64>()
        .map_err(|_| WeatherError::InvalidInput(text.to_string()))?;

    Ok(format!("The current temperature is {text} degrees."))
}
