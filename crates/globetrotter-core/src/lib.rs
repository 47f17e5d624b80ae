pub mod config;
pub mod error;
pub mod preferences;

pub use config::{ApiKeys, Config, GatewayConfig, ValidationResult};
pub use error::{ConfigError, NetworkError, ProviderError, ReqwestErrorExt};
pub use preferences::{Preferences, Section, Theme};

use anyhow::Result;

/// Initialize logging for the dashboard process
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    tracing::info!("GlobeTrotter core initialized");
    Ok(())
}
