use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::core::TickTimeouts;
use crate::error::Result;
use crate::types::PollConfig;

pub mod loader;

pub use loader::{AppConfig, KafkaConfig};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite URL, or `memory` for the in-process store.
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: "sqlite:price_poller.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Seeded into an empty config store on first start.
    pub default_symbol: String,
    pub default_interval_seconds: u64,
    pub fetch_timeout_ms: u64,
    pub store_timeout_ms: u64,
}

impl PollerConfig {
    pub fn default_poll_config(&self) -> Result<PollConfig> {
        PollConfig::new(&self.default_symbol, self.default_interval_seconds)
    }

    pub fn timeouts(&self) -> TickTimeouts {
        TickTimeouts {
            fetch: Duration::from_millis(self.fetch_timeout_ms),
            store: Duration::from_millis(self.store_timeout_ms),
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        PollerConfig {
            default_symbol: "AAPL".to_string(),
            default_interval_seconds: 60,
            fetch_timeout_ms: 10_000,
            store_timeout_ms: 5_000,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            json: false,
        }
    }
}
