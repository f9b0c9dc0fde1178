//! Weather data for Zephyr
//!
//! Fetches current conditions, metrics, wind, forecasts and moon phases from
//! OpenWeatherMap, caches them per location, and keeps a daily history of
//! current weather for temperature statistics and anomaly detection.

pub mod cache;
pub mod conditions;
pub mod error;
pub mod history;
pub mod location;
pub mod provider;
pub mod service;
pub mod statistics;
pub mod stats;
pub mod types;
pub mod units;

pub use cache::{CacheEntry, Caches, TtlCache};
pub use error::{ProviderError, StatsError};
pub use history::HistoricalStore;
pub use location::normalize_key;
pub use provider::WeatherProvider;
pub use service::WeatherService;
pub use stats::StatisticsService;
pub use types::*;
