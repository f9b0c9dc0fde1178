//! OpenWeatherMap client: direct geocoding plus the One Call endpoint.
//!
//! Everything is requested in metric units and converted into the domain
//! types of [`crate::types`]; wire structs never leave this module.

use chrono::{DateTime, NaiveDate};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;
use zephyr_core::ProviderConfig;

use crate::conditions;
use crate::error::ProviderError;
use crate::types::{City, Forecast, ForecastDay, Metrics, Moon, WeatherRecord, Wind};

/// Moon data is the same everywhere; Rome is used as the reference point.
const MOON_REFERENCE: City = City {
    name: String::new(),
    lat: 41.8933203,
    lon: 12.4829321,
};

/// Days of forecast returned, today excluded.
pub const FORECAST_DAYS: usize = 4;

const MS_TO_KMH: f64 = 3.6;

const EXCLUDE_FOR_CURRENT: &str = "minutely,hourly,daily,alerts";
const EXCLUDE_FOR_DAILY: &str = "current,minutely,hourly,alerts";

#[derive(Debug, Deserialize)]
struct ConditionRes {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct CurrentRes {
    dt: i64,
    temp: f64,
    feels_like: f64,
    #[serde(default)]
    humidity: f64,
    #[serde(default)]
    pressure: f64,
    #[serde(default)]
    dew_point: f64,
    #[serde(default)]
    uvi: f64,
    #[serde(default)]
    visibility: f64,
    #[serde(default)]
    wind_speed: f64,
    #[serde(default)]
    wind_deg: f64,
    #[serde(default)]
    weather: Vec<ConditionRes>,
}

#[derive(Debug, Deserialize)]
struct DailyTempRes {
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct DailyFeelsLikeRes {
    day: f64,
}

#[derive(Debug, Deserialize)]
struct DailyRes {
    dt: i64,
    temp: DailyTempRes,
    feels_like: DailyFeelsLikeRes,
    #[serde(default)]
    wind_speed: f64,
    #[serde(default)]
    wind_deg: f64,
    #[serde(default)]
    moon_phase: f64,
    #[serde(default)]
    weather: Vec<ConditionRes>,
}

#[derive(Debug, Deserialize)]
struct OneCallRes {
    current: Option<CurrentRes>,
    #[serde(default)]
    daily: Vec<DailyRes>,
}

/// Async client for the upstream provider.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    api_token: String,
    geocode_url: String,
    onecall_url: String,
}

impl WeatherProvider {
    pub fn new(api_token: &str, config: &ProviderConfig) -> Result<Self, ProviderError> {
        Self::with_endpoints(
            api_token,
            &config.geocode_url,
            &config.onecall_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn with_endpoints(
        api_token: &str,
        geocode_url: &str,
        onecall_url: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_token: api_token.to_string(),
            geocode_url: geocode_url.to_string(),
            onecall_url: onecall_url.to_string(),
        })
    }

    /// Resolve a location name to coordinates.
    #[instrument(skip(self), level = "info")]
    pub async fn geocode(&self, name: &str) -> Result<City, ProviderError> {
        let response = self
            .client
            .get(&self.geocode_url)
            .query(&[("q", name), ("limit", "1"), ("appid", self.api_token.as_str())])
            .send()
            .await?;

        let matches: Vec<City> = self.handle_response(response).await?;
        matches
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::CityNotFound(name.to_string()))
    }

    /// Current conditions, dated with the UTC day of the observation.
    #[instrument(skip(self), level = "info")]
    pub async fn current(&self, city: &City) -> Result<WeatherRecord, ProviderError> {
        let current = self.current_section(city).await?;
        let info = first_condition(&current.weather)?;
        let condition = conditions::condition_label(&info.main, &info.description);
        let emoji = conditions::emoji(&condition, conditions::is_night_icon(&info.icon));

        Ok(WeatherRecord {
            date: utc_day(current.dt)?,
            temperature: current.temp,
            feels_like: current.feels_like,
            condition: info.main.clone(),
            emoji: emoji.to_string(),
        })
    }

    #[instrument(skip(self), level = "info")]
    pub async fn metrics(&self, city: &City) -> Result<Metrics, ProviderError> {
        let current = self.current_section(city).await?;

        Ok(Metrics {
            humidity: current.humidity.round().clamp(0.0, 100.0) as u8,
            pressure: current.pressure.round().max(0.0) as u32,
            dew_point: current.dew_point,
            uv_index: current.uvi.round().clamp(0.0, 255.0) as u8,
            visibility: current.visibility / 1000.0,
        })
    }

    #[instrument(skip(self), level = "info")]
    pub async fn wind(&self, city: &City) -> Result<Wind, ProviderError> {
        let current = self.current_section(city).await?;
        Ok(wind(current.wind_speed, current.wind_deg))
    }

    /// The next [`FORECAST_DAYS`] days.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(&self, city: &City) -> Result<Forecast, ProviderError> {
        let res = self.onecall(city, EXCLUDE_FOR_DAILY).await?;

        let forecast = res
            .daily
            .iter()
            .skip(1)
            .take(FORECAST_DAYS)
            .map(forecast_day)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Forecast { forecast })
    }

    /// Today's moon phase.
    #[instrument(skip(self), level = "info")]
    pub async fn moon(&self) -> Result<Moon, ProviderError> {
        let res = self.onecall(&MOON_REFERENCE, EXCLUDE_FOR_DAILY).await?;
        let today = res
            .daily
            .first()
            .ok_or_else(|| ProviderError::InvalidResponse("missing daily section".into()))?;

        let (icon, phase) = conditions::moon_phase(today.moon_phase);
        Ok(Moon {
            icon: icon.to_string(),
            phase: phase.to_string(),
            percentage: conditions::moon_illumination(today.moon_phase),
        })
    }

    async fn current_section(&self, city: &City) -> Result<CurrentRes, ProviderError> {
        self.onecall(city, EXCLUDE_FOR_CURRENT)
            .await?
            .current
            .ok_or_else(|| ProviderError::InvalidResponse("missing current section".into()))
    }

    async fn onecall(&self, city: &City, exclude: &str) -> Result<OneCallRes, ProviderError> {
        let lat = city.lat.to_string();
        let lon = city.lon.to_string();

        let response = self
            .client
            .get(&self.onecall_url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_token.as_str()),
                ("units", "metric"),
                ("exclude", exclude),
            ])
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        match status.as_u16() {
            401 => Err(ProviderError::Unauthorized),
            429 => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60);
                Err(ProviderError::RateLimited(retry_after))
            }
            code => {
                let text = response.text().await.unwrap_or_default();
                tracing::warn!(status = code, "provider request failed");
                Err(ProviderError::Api {
                    status: code,
                    message: text,
                })
            }
        }
    }
}

fn first_condition(weather: &[ConditionRes]) -> Result<&ConditionRes, ProviderError> {
    weather
        .first()
        .ok_or_else(|| ProviderError::InvalidResponse("missing weather condition".into()))
}

fn utc_day(timestamp: i64) -> Result<NaiveDate, ProviderError> {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| ProviderError::InvalidResponse(format!("bad timestamp {timestamp}")))
}

fn wind(speed_ms: f64, degrees: f64) -> Wind {
    let (direction, arrow) = conditions::cardinal_direction(degrees);
    Wind {
        arrow: arrow.to_string(),
        direction: direction.to_string(),
        speed: speed_ms * MS_TO_KMH,
    }
}

fn forecast_day(daily: &DailyRes) -> Result<ForecastDay, ProviderError> {
    let info = first_condition(&daily.weather)?;
    let condition = conditions::condition_label(&info.main, &info.description);
    let emoji = conditions::emoji(&condition, conditions::is_night_icon(&info.icon));

    Ok(ForecastDay {
        date: utc_day(daily.dt)?,
        min: daily.temp.min,
        max: daily.temp.max,
        condition: info.main.clone(),
        emoji: emoji.to_string(),
        feels_like: daily.feels_like.day,
        wind: wind(daily.wind_speed, daily.wind_deg),
    })
}
