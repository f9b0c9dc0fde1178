use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable holding the upstream API token.
pub const TOKEN_ENV: &str = "ZEPHYR_TOKEN";
/// Environment variable overriding the cache time-to-live (hours).
pub const CACHE_TTL_ENV: &str = "ZEPHYR_CACHE_TTL";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a single-line summary of all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `config.toml`
    pub config_dir: PathBuf,

    /// Upstream weather provider
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Shared time-to-live for every data cache
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    /// Background polling used by `zephyr watch`
    #[serde(default)]
    pub poll: PollConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OpenWeatherMap API token. Usually supplied through `ZEPHYR_TOKEN`.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Direct geocoding endpoint
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,

    /// One Call endpoint
    #[serde(default = "default_onecall_url")]
    pub onecall_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_geocode_url() -> String {
    "https://api.openweathermap.org/geo/1.0/direct".to_string()
}

fn default_onecall_url() -> String {
    "https://api.openweathermap.org/data/3.0/onecall".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            geocode_url: default_geocode_url(),
            onecall_url: default_onecall_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Hours before a cached entry is treated as stale
    pub ttl_hours: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_hours: 3 }
    }
}

/// Measurement system used when presenting data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub units: UnitSystem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Minutes between two polling rounds
    #[serde(default = "default_poll_interval")]
    pub interval_minutes: u32,

    /// Locations polled when none are given on the command line
    #[serde(default)]
    pub locations: Vec<String>,
}

fn default_poll_interval() -> u32 {
    60
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_poll_interval(),
            locations: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zephyr");

        Self {
            config_dir,
            provider: ProviderConfig::default(),
            cache: CacheConfig::default(),
            display: DisplayConfig::default(),
            poll: PollConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist.
    ///
    /// Environment overrides are applied after the file is read and are never
    /// written back.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            config
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from an explicit file path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails with critical errors; warnings are logged.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Apply `ZEPHYR_TOKEN` and `ZEPHYR_CACHE_TTL` from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
            self.provider.api_token = Some(token.trim().to_string());
        }

        if let Some(raw) = lookup(CACHE_TTL_ENV) {
            let ttl = raw.trim().parse::<u32>().map_err(|e| {
                ConfigError::Invalid(format!(
                    "{CACHE_TTL_ENV}={raw:?} is not a number of hours: {e}"
                ))
            })?;
            self.cache.ttl_hours = ttl;
        }

        Ok(())
    }

    /// The API token, or an error naming the setting that is missing.
    pub fn api_token(&self) -> Result<&str, ConfigError> {
        self.provider
            .api_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingSetting(format!("provider.api_token ({TOKEN_ENV})")))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if let Err(e) = self.api_token() {
            result.add_error("provider.api_token", e.to_string());
        }

        self.validate_url(&self.provider.geocode_url, "provider.geocode_url", &mut result);
        self.validate_url(&self.provider.onecall_url, "provider.onecall_url", &mut result);

        if self.provider.timeout_secs == 0 {
            result.add_error("provider.timeout_secs", "Timeout must be greater than 0");
        }

        if self.cache.ttl_hours == 0 {
            result.add_error("cache.ttl_hours", "Cache TTL must be at least 1 hour");
        } else if self.cache.ttl_hours > 168 {
            result.add_warning(
                "cache.ttl_hours",
                "Cache TTL is more than a week; data will rarely refresh",
            );
        }

        if self.poll.interval_minutes == 0 {
            result.add_warning("poll.interval_minutes", "Polling disabled (0 minutes)");
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to an explicit file path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("zephyr");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    fn configured() -> Config {
        let mut config = Config::default();
        config.provider.api_token = Some("secret".to_string());
        config
    }

    #[test]
    fn test_default_config_only_lacks_token() {
        let result = Config::default().validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "provider.api_token");
    }

    #[test]
    fn test_configured_default_is_valid() {
        let result = configured().validate();
        assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_zero_ttl_is_error() {
        let mut config = configured();
        config.cache.ttl_hours = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "cache.ttl_hours"));
    }

    #[test]
    fn test_long_ttl_is_warning() {
        let mut config = configured();
        config.cache.ttl_hours = 500;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "cache.ttl_hours"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = configured();
        config.provider.onecall_url = "ftp://example.com/onecall".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(|name| match name {
                TOKEN_ENV => Some(" abc123 ".to_string()),
                CACHE_TTL_ENV => Some("6".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.api_token().unwrap(), "abc123");
        assert_eq!(config.cache.ttl_hours, 6);
    }

    #[test]
    fn test_bad_ttl_override_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(|name| (name == CACHE_TTL_ENV).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert_eq!(config.cache.ttl_hours, 3);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = configured();
        config.poll.locations = vec!["Rome".to_string(), "New York".to_string()];
        config.display.units = UnitSystem::Imperial;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.poll.locations, config.poll.locations);
        assert_eq!(loaded.display.units, UnitSystem::Imperial);
        assert_eq!(loaded.cache.ttl_hours, 3);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "config_dir = \"/tmp/zephyr\"\n[cache]\nttl_hours = 12\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.cache.ttl_hours, 12);
        assert_eq!(loaded.provider.timeout_secs, 10);
        assert_eq!(loaded.poll.interval_minutes, 60);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NotFound(_))
        ));
    }
}
