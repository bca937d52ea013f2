use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Configuration Errors
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("No poll config persisted at startup")]
    StartupConfigMissing,

    #[error("Poll config not found")]
    ConfigNotFound,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Quote Source Errors
    #[error("Quote fetch failed: {0}")]
    Quote(#[from] QuoteError),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    // Persistence Errors
    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Sample not found for symbol {0}")]
    SampleNotFound(String),

    // Event Stream Errors
    #[error("Kafka error: {0}")]
    KafkaError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    // System Errors
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("No tokio runtime available to schedule work")]
    RuntimeUnavailable,

    #[error("Metrics error: {0}")]
    MetricsError(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Per-tick failures reported by a quote source. None of these ever leave
/// the tick that observed them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("quote source unavailable: {0}")]
    Unavailable(String),

    #[error("quote source rate limited the request")]
    RateLimited,

    #[error("malformed quote: {0}")]
    Malformed(String),
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::StoreError(e.to_string())
    }
}

impl From<prometheus::Error> for Error {
    fn from(e: prometheus::Error) -> Self {
        Error::MetricsError(e.to_string())
    }
}
