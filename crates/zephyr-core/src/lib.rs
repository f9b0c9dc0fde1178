//! Shared plumbing for Zephyr: configuration, error types and logging setup.

pub mod config;
pub mod error;

pub use config::{
    CacheConfig, Config, DisplayConfig, PollConfig, ProviderConfig, UnitSystem, ValidationResult,
};
pub use error::{ConfigError, NetworkError, ReqwestErrorExt};

use anyhow::Result;

/// Initialize tracing on stderr. `RUST_LOG` wins over the default `info` filter.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::debug!("Zephyr core initialized");
    Ok(())
}
