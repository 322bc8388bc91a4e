use std::fmt;

use chrono::Local;
use inquire::{InquireError, Select, Text};
use weather_core::{TempUnit, convert, fake_forecast};

use crate::app::{App, WeatherView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainChoice {
    Weather,
    Conversion,
    FakeForecast,
    Quit,
}

impl fmt::Display for MainChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MainChoice::Weather => "weather",
            MainChoice::Conversion => "conversion tool",
            MainChoice::FakeForecast => "fake forecast generator",
            MainChoice::Quit => "QUIT",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeatherChoice {
    Current,
    Hourly,
    Forecast,
    Average,
    Back,
}

impl WeatherChoice {
    fn view(&self) -> Option<WeatherView> {
        match self {
            WeatherChoice::Current => Some(WeatherView::Current),
            WeatherChoice::Hourly => Some(WeatherView::Hourly(HOURLY_LINES)),
            WeatherChoice::Forecast => Some(WeatherView::Forecast),
            WeatherChoice::Average => Some(WeatherView::Average),
            WeatherChoice::Back => None,
        }
    }
}

impl fmt::Display for WeatherChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeatherChoice::Current => "current weather",
            WeatherChoice::Hourly => "hourly forecast",
            WeatherChoice::Forecast => "7-day forecast",
            WeatherChoice::Average => "weekly averages",
            WeatherChoice::Back => "BACK",
        })
    }
}

const HOURLY_LINES: usize = 12;
const ADDRESS_PROMPT: &str = "Enter the partial/full address of where you want to get the weather:";

/// Escape / Ctrl-C on a prompt behave like choosing the exit entry.
fn cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

fn greeting() {
    println!("Hello! Welcome to weather.");
    println!("Today is {}.", Local::now().format("%A, %B %-d"));
}

pub async fn run(app: &App) -> anyhow::Result<()> {
    greeting();

    loop {
        println!();
        let choice = Select::new(
            "MAIN | Select an option:",
            vec![
                MainChoice::Weather,
                MainChoice::Conversion,
                MainChoice::FakeForecast,
                MainChoice::Quit,
            ],
        )
        .prompt();

        match choice {
            Ok(MainChoice::Weather) => weather_menu(app).await?,
            Ok(MainChoice::Conversion) => conversion()?,
            Ok(MainChoice::FakeForecast) => generator()?,
            Ok(MainChoice::Quit) => break,
            Err(err) if cancelled(&err) => break,
            Err(err) => return Err(err.into()),
        }
    }

    println!("Goodbye..");
    Ok(())
}

async fn weather_menu(app: &App) -> anyhow::Result<()> {
    println!();
    let choice = Select::new(
        "WEATHER | Select an option:",
        vec![
            WeatherChoice::Current,
            WeatherChoice::Hourly,
            WeatherChoice::Forecast,
            WeatherChoice::Average,
            WeatherChoice::Back,
        ],
    )
    .prompt();

    let view = match choice {
        Ok(choice) => match choice.view() {
            Some(view) => view,
            None => return Ok(()),
        },
        Err(err) if cancelled(&err) => return Ok(()),
        Err(err) => return Err(err.into()),
    };

    let address = match Text::new(ADDRESS_PROMPT).prompt() {
        Ok(address) => address,
        Err(err) if cancelled(&err) => return Ok(()),
        Err(err) => return Err(err.into()),
    };

    if let Err(err) = app.show(view, &address).await {
        tracing::debug!("weather lookup failed: {err:?}");
        println!("{err:#}");
    }

    Ok(())
}

fn conversion() -> anyhow::Result<()> {
    let unit = match Select::new(
        "Enter units to convert to:",
        vec![TempUnit::Celsius, TempUnit::Fahrenheit],
    )
    .prompt()
    {
        Ok(unit) => unit,
        Err(err) if cancelled(&err) => return Ok(()),
        Err(err) => return Err(err.into()),
    };

    let value = match Text::new("Enter value to convert:").prompt() {
        Ok(value) => value,
        Err(err) if cancelled(&err) => return Ok(()),
        Err(err) => return Err(err.into()),
    };

    match convert(&value, unit.abbreviation()) {
        Ok(result) => println!("{result}"),
        Err(_) => println!("Invalid input. Must enter numerical value."),
    }

    Ok(())
}

fn generator() -> anyhow::Result<()> {
    let input = match Text::new("Enter your ideal temperature (ex. 68):").prompt() {
        Ok(input) => input,
        Err(err) if cancelled(&err) => return Ok(()),
        Err(err) => return Err(err.into()),
    };

    match fake_forecast(&input) {
        Ok(line) => println!("{line}"),
        Err(_) => println!("Invalid input. Must enter numerical value."),
    }

    Ok(())
}
