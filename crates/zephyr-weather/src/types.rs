use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Dates are presented as e.g. `"Monday, 2024/01/15"`.
pub(crate) mod display_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%A, %Y/%m/%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Geocoded location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Current weather of a location for one calendar day.
///
/// Temperatures are in °C as delivered by the provider; see [`crate::units`]
/// for conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    #[serde(with = "display_date")]
    pub date: NaiveDate,
    pub temperature: f64,
    pub feels_like: f64,
    pub condition: String,
    pub emoji: String,
}

/// Humidity, pressure and similar miscellaneous values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Relative humidity, %
    pub humidity: u8,
    /// Sea-level pressure, hPa
    pub pressure: u32,
    /// °C
    pub dew_point: f64,
    pub uv_index: u8,
    /// km
    pub visibility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub arrow: String,
    pub direction: String,
    /// km/h
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    #[serde(with = "display_date")]
    pub date: NaiveDate,
    pub min: f64,
    pub max: f64,
    pub condition: String,
    pub emoji: String,
    pub feels_like: f64,
    pub wind: Wind,
}

/// Multi-day forecast, today excluded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moon {
    pub icon: String,
    pub phase: String,
    /// Approximate illuminated fraction, %
    pub percentage: u8,
}

/// A temperature reading that deviates from the location's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAnomaly {
    #[serde(with = "display_date")]
    pub date: NaiveDate,
    pub temperature: f64,
}

/// Descriptive statistics over every stored record of one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatResult {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub mode: f64,
    /// Empty when the check ran and found nothing
    pub anomalies: Vec<WeatherAnomaly>,
}
