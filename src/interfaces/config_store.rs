use async_trait::async_trait;
use crate::error::Result;
use crate::types::PollConfig;

/// Durable single-row home of the poll config.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// `Ok(None)` when nothing has been persisted yet.
    async fn read_config(&self) -> Result<Option<PollConfig>>;
    async fn write_config(&self, config: &PollConfig) -> Result<()>;
}
