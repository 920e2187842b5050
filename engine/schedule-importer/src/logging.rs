//! Logging and tracing setup

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging from configuration
///
/// `RUST_LOG`, when set, takes precedence over the configured level.
pub fn initialize_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .with_context(|| format!("Invalid log level: {}", config.level))?,
    };

    let fmt_layer = match config.format.as_str() {
        "json" => fmt::layer().json().with_target(true).with_file(true).with_line_number(true).boxed(),
        "pretty" => fmt::layer().pretty().with_target(false).with_ansi(true).boxed(),
        _ => fmt::layer().with_target(false).with_ansi(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}
