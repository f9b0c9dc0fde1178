//! Weather-specific error types.

use chrono::NaiveDate;
use thiserror::Error;
use zephyr_core::{NetworkError, ReqwestErrorExt};

/// Errors from the upstream weather provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Cannot find this city: {0}")]
    CityNotFound(String),

    #[error("Provider rejected the API token")]
    Unauthorized,

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.into_network_error())
    }
}

impl ProviderError {
    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::CityNotFound(name) => format!("No location named \"{}\" was found.", name),
            Self::Unauthorized => {
                "The weather API token is invalid. Check ZEPHYR_TOKEN.".to_string()
            }
            Self::RateLimited(secs) => format!("Too many requests. Please wait {} seconds.", secs),
            Self::Api { .. } => "The weather provider returned an error.".to_string(),
            Self::InvalidResponse(_) => "The weather provider sent unexpected data.".to_string(),
            Self::Network(e) => e.user_message().to_string(),
        }
    }
}

/// Errors from [`crate::stats::StatisticsService`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Insufficient or outdated data to perform statistical analysis for {0}")]
    InsufficientData(String),

    #[error("Stored record for {date} has an unusable temperature ({temperature})")]
    InvalidRecord { date: NaiveDate, temperature: f64 },
}

impl StatsError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InsufficientData(_) => "Not enough data yet. Check back in a day or two.",
            Self::InvalidRecord { .. } => "Stored weather history is corrupted.",
        }
    }
}
