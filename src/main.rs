//! Zephyr command line.
//!
//! `show` prints a JSON bundle of current conditions, metrics, wind, forecast
//! and moon for one or more locations. `watch` polls current weather on an
//! interval, which builds up the history that statistics are computed from.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::{info, warn};

use zephyr_core::{Config, UnitSystem};
use zephyr_weather::units::{format_speed, format_temperature};
use zephyr_weather::{
    normalize_key, Caches, HistoricalStore, ProviderError, WeatherProvider, WeatherService,
};

/// Serialized fields holding a °C value.
const TEMPERATURE_FIELDS: [&str; 5] = ["temperature", "feelsLike", "dewPoint", "min", "max"];

#[derive(Parser)]
#[command(name = "zephyr", about = "Cached weather lookups with temperature statistics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print weather for the given locations as JSON.
    Show {
        #[arg(required = true)]
        locations: Vec<String>,

        /// Report °F and mph instead of the configured units.
        #[arg(long)]
        imperial: bool,
    },
    /// Poll current weather and log statistics until interrupted.
    Watch {
        /// Locations to poll; defaults to `poll.locations` from the config file.
        locations: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    zephyr_core::init()?;
    let cli = Cli::parse();

    let (config, _) = Config::load_validated()?;
    let provider = WeatherProvider::new(config.api_token()?, &config.provider)?;
    let service = WeatherService::new(
        provider,
        Arc::new(Caches::new()),
        Arc::new(HistoricalStore::new()),
        config.cache.ttl_hours,
    );

    info!(ttl_hours = config.cache.ttl_hours, "Zephyr started");

    match cli.command {
        Command::Show {
            locations,
            imperial,
        } => {
            let units = if imperial {
                UnitSystem::Imperial
            } else {
                config.display.units
            };
            show(&service, &locations, units).await
        }
        Command::Watch { locations } => {
            let locations = if locations.is_empty() {
                config.poll.locations.clone()
            } else {
                locations
            };
            if locations.is_empty() {
                anyhow::bail!("No locations to watch: pass some or set poll.locations");
            }

            let every = Duration::from_secs(u64::from(config.poll.interval_minutes.max(1)) * 60);
            watch(&service, &locations, every).await
        }
    }
}

fn friendly(err: ProviderError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

async fn show(service: &WeatherService, locations: &[String], units: UnitSystem) -> Result<()> {
    let mut reports = Vec::with_capacity(locations.len());

    for location in locations {
        let current = service.current(location).await.map_err(friendly)?;
        let metrics = service.metrics(location).await.map_err(friendly)?;
        let wind = service.wind(location).await.map_err(friendly)?;
        let forecast = service.forecast(location).await.map_err(friendly)?;

        let report = json!({
            "location": normalize_key(location),
            "current": current,
            "metrics": metrics,
            "wind": wind,
            "forecast": forecast.forecast,
        });
        reports.push(formatted(report, units));
    }

    let moon = service.moon().await.map_err(friendly)?;

    let bundle = json!({
        "units": units,
        "locations": reports,
        "moon": moon,
    });
    let rendered = serde_json::to_string_pretty(&bundle).context("Failed to render output")?;
    println!("{rendered}");

    Ok(())
}

/// Replace raw °C and km/h numbers with strings in the requested units.
fn formatted(mut value: Value, units: UnitSystem) -> Value {
    match &mut value {
        Value::Object(fields) => {
            for (name, field) in fields.iter_mut() {
                *field = match field.as_f64() {
                    Some(celsius) if TEMPERATURE_FIELDS.contains(&name.as_str()) => {
                        Value::String(format_temperature(celsius, units))
                    }
                    Some(kmh) if name == "speed" => Value::String(format_speed(kmh, units)),
                    _ => formatted(field.take(), units),
                };
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                *item = formatted(item.take(), units);
            }
        }
        _ => {}
    }
    value
}

async fn watch(service: &WeatherService, locations: &[String], every: Duration) -> Result<()> {
    let mut ticker = tokio::time::interval(every);
    info!(?locations, interval_secs = every.as_secs(), "Watching");

    loop {
        tokio::select! {
            _ = ticker.tick() => poll_once(service, locations).await,
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for shutdown signal")?;
                info!("Shutting down");
                return Ok(());
            }
        }
    }
}

async fn poll_once(service: &WeatherService, locations: &[String]) {
    let stats = service.statistics();

    for location in locations {
        match service.current(location).await {
            Ok(record) => info!(
                location = location.as_str(),
                temperature = record.temperature,
                condition = record.condition.as_str(),
                "Current weather"
            ),
            Err(e) => {
                warn!(location = location.as_str(), error = %e, "{}", e.user_message());
                continue;
            }
        }

        match stats.summarize(&normalize_key(location)) {
            Ok(summary) => {
                info!(
                    location = location.as_str(),
                    count = summary.count,
                    mean = summary.mean,
                    std_dev = summary.std_dev,
                    median = summary.median,
                    anomalies = summary.anomalies.len(),
                    "Temperature statistics"
                );
                for anomaly in &summary.anomalies {
                    warn!(
                        location = location.as_str(),
                        date = %anomaly.date,
                        temperature = anomaly.temperature,
                        "Temperature anomaly"
                    );
                }
            }
            Err(e) => info!(location = location.as_str(), "{}", e.user_message()),
        }
    }
}
