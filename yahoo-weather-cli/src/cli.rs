use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use yahoo_weather_core::{Config, Credentials, Unit, Weather, provider_from_config};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "yweather", version, about = "Yahoo Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store Yahoo application credentials.
    Configure,

    /// Show current weather and forecast for a location.
    Show {
        /// Location name, e.g. "Oakland, CA".
        location: String,

        /// Measurement system: imperial (f) or metric (c).
        #[arg(long, default_value = "imperial")]
        unit: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, unit } => show(&location, &unit).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let app_id = Text::new("App ID:").prompt()?;
    let client_id = Text::new("Client ID (consumer key):").prompt()?;
    let client_secret = Password::new("Client secret:").without_confirmation().prompt()?;

    config.set_credentials(Credentials { app_id, client_id, client_secret });
    config.save()?;

    println!("Credentials saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(location: &str, unit: &str) -> anyhow::Result<()> {
    let unit = Unit::try_from(unit)?;
    let config = Config::load()?;
    let mut provider = provider_from_config(&config)?;

    let weather = provider
        .query(location, unit)
        .await
        .with_context(|| format!("Failed to fetch weather for '{location}'"))?;

    print_weather(&weather, unit);
    Ok(())
}

fn print_weather(weather: &Weather, unit: Unit) {
    let degrees = match unit {
        Unit::Imperial => "°F",
        Unit::Metric => "°C",
    };

    if let Some(location) = &weather.location {
        println!("{}, {} ({})", location.city, location.region.trim(), location.country);
    }

    match weather.observation.as_ref().and_then(|o| o.condition.as_ref()) {
        Some(condition) => {
            println!("Now: {}{degrees}, {}", condition.temperature, condition.text);
        }
        None => println!("No current observation available."),
    }

    for forecast in &weather.forecasts {
        let date = forecast
            .date_utc()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| forecast.day.clone());

        println!(
            "{date} ({}): {}..{}{degrees}, {}",
            forecast.day, forecast.low, forecast.high, forecast.text
        );
    }
}
