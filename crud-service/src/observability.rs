//! Structured logging

use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    error::{Error, Result},
};

/// Build the log filter from `service.log_level`, falling back to `info`
pub fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|err| {
        eprintln!(
            "Invalid log level '{}' ({}), using 'info'",
            config.service.log_level, err
        );
        EnvFilter::new("info")
    })
}

/// Install the global JSON subscriber
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &Config) -> Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(config))
        .try_init()
        .map_err(|err| Error::Tracing(err.to_string()))?;

    tracing::info!(
        service = %config.service.name,
        environment = %config.service.environment,
        "Tracing initialized"
    );

    Ok(())
}
