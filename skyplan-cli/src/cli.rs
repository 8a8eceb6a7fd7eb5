use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::Value as JsonValue;
use std::sync::Arc;

use skyplan_core::config::API_KEY_ENV;
use skyplan_core::{
    Config, CurrentConditions, ForecastBlock, OpenWeatherClient, ToolRegistry, WeatherProvider,
    WeatherTool, provider_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyplan", version, about = "Weather-grounded day planning toolkit")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store the OpenWeather API key used by every other command.
    Configure,

    /// Show the current weather for a city.
    Current {
        /// City name, free-form spelling.
        city: String,
    },

    /// Show the 3-hour forecast strip for a city.
    Forecast {
        /// City name, free-form spelling.
        city: String,

        /// Number of forecast days, clamped to 1..=5.
        #[arg(long, default_value_t = 2, allow_negative_numbers = true)]
        days: i32,
    },

    /// List the capabilities exposed to the agent loop.
    Tools,

    /// Invoke a capability by name with raw JSON arguments.
    Invoke {
        /// Capability name, e.g. "get_weather".
        name: String,

        /// JSON arguments, e.g. '{"city":"Paris"}'.
        #[arg(default_value = "{}")]
        args: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Current { city } => current(&city).await,
            Command::Forecast { city, days } => forecast(&city, days).await,
            Command::Tools => tools(),
            Command::Invoke { name, args } => invoke(&name, &args).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read the API key")?;
    config.set_api_key(api_key);
    config.save()?;
    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

fn provider_with_hint(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    provider_from_config(config).map_err(|err| {
        anyhow!("{err}.\nHint: run `skyplan configure` or set {API_KEY_ENV} first.")
    })
}

async fn current(city: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider = provider_with_hint(&config)?;
    let conditions = provider.current_conditions(city).await?;
    print!("{}", format_current(&conditions));
    Ok(())
}

async fn forecast(city: &str, days: i32) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider = provider_with_hint(&config)?;
    let blocks = provider.forecast_blocks(city, days).await?;
    if blocks.is_empty() {
        println!("No forecast data available for {city}.");
        return Ok(());
    }
    print!("{}", format_forecast(city, &blocks));
    Ok(())
}

/// Build the capability table handed to the agent loop.
///
/// A missing key is not an error at this boundary: the weather capability
/// reports it as a structured payload, so the provider is built even when
/// no key is configured yet.
fn registry(config: &Config) -> ToolRegistry {
    let provider: Arc<dyn WeatherProvider> =
        Arc::new(OpenWeatherClient::new(config.api_key().unwrap_or_default()));
    let mut registry = ToolRegistry::new();
    registry.register(WeatherTool::new(provider));
    registry
}

fn tools() -> anyhow::Result<()> {
    let config = Config::load()?;
    for definition in registry(&config).definitions() {
        println!("{} - {}", definition.name, definition.description);
        println!("  input:  {}", serde_json::to_string(&definition.input_schema)?);
        println!("  output: {}", serde_json::to_string(&definition.output_schema)?);
    }
    Ok(())
}

async fn invoke(name: &str, args: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let args: JsonValue = serde_json::from_str(args)
        .with_context(|| format!("Arguments are not valid JSON: {args}"))?;
    let result = registry(&config).call(name, args).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn format_current(conditions: &CurrentConditions) -> String {
    let mut out = format!(
        "{} {} ({}) in {}\n",
        conditions.sky_kind().emoji(),
        conditions.condition,
        conditions.description,
        conditions.city
    );
    out.push_str(&format!(
        "  temperature {:.1}°C (feels like {:.1}°C)\n",
        conditions.temp_c, conditions.feels_like_c
    ));
    out.push_str(&format!(
        "  wind {:.1} km/h, humidity {}%\n",
        conditions.wind_kmh, conditions.humidity
    ));
    if conditions.rain_mm > 0.0 {
        out.push_str(&format!("  rain {:.1} mm\n", conditions.rain_mm));
    }
    if conditions.snow_mm > 0.0 {
        out.push_str(&format!("  snow {:.1} mm\n", conditions.snow_mm));
    }
    out
}

fn format_forecast(city: &str, blocks: &[ForecastBlock]) -> String {
    let mut out = format!("3-hour forecast for {city}:\n");
    let mut current_date: Option<NaiveDate> = None;
    for block in blocks {
        let (date, label) = match block.timestamp() {
            Some(ts) => (Some(ts.date()), ts.format("%H:%M").to_string()),
            None => (None, block.timestamp_text.clone()),
        };
        if let Some(date) = date {
            if current_date != Some(date) {
                out.push_str(&format!("{date}\n"));
                current_date = Some(date);
            }
        }
        out.push_str(&format!(
            "  {label}  {:>5.1}°C  {} {}\n",
            block.temp_c,
            block.sky_kind().emoji(),
            block.sky
        ));
    }
    out
}
