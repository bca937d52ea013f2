use tracing::Span;
use tracing_subscriber::EnvFilter;
use crate::config::LoggingConfig;
use crate::error::{Error, Result};
use crate::types::Symbol;

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::ConfigError(format!("invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| Error::ConfigError(format!("tracing already initialised: {}", e)))
}

pub fn trace_poll_tick(symbol: &Symbol, epoch: u64) -> Span {
    tracing::info_span!(
        "poll_tick",
        symbol = %symbol,
        epoch = epoch,
    )
}

pub fn trace_config_update(symbol: &str, interval_seconds: i64) -> Span {
    tracing::info_span!(
        "config_update",
        symbol = %symbol,
        interval_seconds = interval_seconds,
    )
}
