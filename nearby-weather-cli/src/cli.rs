use std::io::Write;

use anyhow::Context;
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use nearby_weather_core::{
    Config, Coordinate, ObservationSource, WeatherClient, WeatherQueryResult,
};

/// Reading, UK.
const DEFAULT_LATITUDE: f64 = 51.4581857;
const DEFAULT_LONGITUDE: f64 = -0.9676843;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "nearby-weather", version, about = "Current weather at stations near a coordinate")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the cached result right away, then fetch fresh observations.
    Show {
        /// Latitude in decimal degrees.
        #[arg(long, default_value_t = DEFAULT_LATITUDE, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees.
        #[arg(long, default_value_t = DEFAULT_LONGITUDE, allow_negative_numbers = true)]
        lon: f64,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the last successful result without touching the network.
    Cached {
        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Set the API key and cache directory.
    Configure,

    /// Delete the cached response.
    ClearCache,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut out = std::io::stdout();

        match self.command {
            Command::Show { lat, lon, json } => {
                let client = load_client()?;
                let cached_at = client.cache().stored_at();
                show(&client, Coordinate::new(lat, lon), cached_at, json, &mut out).await?;
            }
            Command::Cached { json } => {
                let client = load_client()?;
                let cached_at = client.cache().stored_at();
                show_cached(&client, cached_at, json, &mut out)?;
            }
            Command::Configure => configure()?,
            Command::ClearCache => {
                let client = load_client()?;
                client.cache().clear().context("Failed to clear cache")?;
                writeln!(out, "Cleared {}", client.cache().path().display())?;
            }
        }

        Ok(())
    }
}

fn load_client() -> anyhow::Result<WeatherClient> {
    let config = Config::load()?;
    WeatherClient::from_config(&config)
}

/// Print the cached result (if any) and then the outcome of a fresh fetch.
pub async fn show(
    source: &dyn ObservationSource,
    near: Coordinate,
    cached_at: Option<DateTime<Utc>>,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if let Some(cached) = source.cached_observations() {
        writeln!(out, "{}", cached_heading(cached_at))?;
        write_result(&cached, json, out)?;
        writeln!(out)?;
    }

    writeln!(out, "Fetching stations near {}, {}...", near.latitude, near.longitude)?;
    match source.fetch_observations(near).await {
        Some(fresh) => write_result(&fresh, json, out)?,
        None => writeln!(out, "No fresh data available.")?,
    }

    Ok(())
}

pub fn show_cached(
    source: &dyn ObservationSource,
    cached_at: Option<DateTime<Utc>>,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match source.cached_observations() {
        Some(cached) => {
            writeln!(out, "{}", cached_heading(cached_at))?;
            write_result(&cached, json, out)?;
        }
        None => writeln!(out, "No cached data.")?,
    }

    Ok(())
}

fn cached_heading(cached_at: Option<DateTime<Utc>>) -> String {
    match cached_at {
        Some(at) => format!("Cached ({}):", at.with_timezone(&Local).format("%Y-%m-%d %H:%M")),
        None => "Cached:".to_string(),
    }
}

fn write_result(result: &WeatherQueryResult, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    if json {
        let text = serde_json::to_string_pretty(result).context("Failed to serialize result")?;
        writeln!(out, "{text}")?;
    } else {
        write!(out, "{}", render_table(result))?;
    }
    Ok(())
}

/// One line per station, in API order. Temperatures stay in Kelvin.
pub fn render_table(result: &WeatherQueryResult) -> String {
    if result.is_empty() {
        return "No stations reported near this location.\n".to_string();
    }

    let width = result.iter().map(|o| o.name.chars().count()).max().unwrap_or(0);

    result
        .iter()
        .map(|o| {
            format!(
                "{:<width$}  ↧ {:.1} K  ↥ {:.1} K  {}: {}\n",
                o.name, o.temp_min_kelvin, o.temp_max_kelvin, o.category, o.description
            )
        })
        .collect()
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load()?;

    let api_key = inquire::Text::new("OpenWeatherMap API key:")
        .with_default(config.api_key())
        .prompt()
        .context("Failed to read API key")?;

    let current_root = config.cache_root()?;
    let cache_dir = inquire::Text::new("Cache directory:")
        .with_default(&current_root.display().to_string())
        .prompt()
        .context("Failed to read cache directory")?;

    config.api_key = Some(api_key);
    config.cache_dir = Some(cache_dir.into());
    config.save()?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}
