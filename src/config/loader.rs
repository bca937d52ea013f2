use crate::config::{DatabaseConfig, LoggingConfig, PollerConfig, ServerConfig};
use crate::error::{Error, Result};
use crate::price_infra::QuoteSourceConfig;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use config::builder::DefaultState;
use serde::Deserialize;

pub const ENV_PREFIX: &str = "PRICE_POLLER";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub quote_source: QuoteSourceConfig,
    pub kafka: Option<KafkaConfig>,
    pub poller: PollerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
    #[serde(default = "default_message_timeout_ms")]
    pub message_timeout_ms: u64,
}

fn default_message_timeout_ms() -> u64 {
    5_000
}

impl AppConfig {
    /// Layers `config/default`, `config/{env}` and `PRICE_POLLER__*` variables.
    pub fn load(env: &str) -> Result<Self> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));
        Self::finish(builder)
    }

    /// Same layering with the file contents supplied inline.
    pub fn from_toml(toml: &str) -> Result<Self> {
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__"))
            .build()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        let app: AppConfig = config.try_deserialize()
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        app.validate()?;
        Ok(app)
    }

    fn validate(&self) -> Result<()> {
        self.poller.default_poll_config()
            .map_err(|e| Error::ConfigError(format!("poller default: {}", e)))?;
        if self.poller.fetch_timeout_ms == 0 || self.poller.store_timeout_ms == 0 {
            return Err(Error::ConfigError("poller timeouts must be positive".to_string()));
        }
        Ok(())
    }
}
