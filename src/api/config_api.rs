use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::Instrument;
use crate::core::PollScheduler;
use crate::error::{Error, Result};
use crate::interfaces::ConfigStore;
use crate::observability::tracing::trace_config_update;
use crate::types::PollConfig;

/// Read/update surface over the persisted poll config.
pub struct ConfigApi {
    store: Arc<dyn ConfigStore>,
    scheduler: Arc<PollScheduler>,
    // Keeps the persisted row and the scheduler's binding in the same order
    // when updates race.
    update_lock: Mutex<()>,
}

impl ConfigApi {
    pub fn new(store: Arc<dyn ConfigStore>, scheduler: Arc<PollScheduler>) -> Self {
        ConfigApi {
            store,
            scheduler,
            update_lock: Mutex::new(()),
        }
    }

    pub async fn read_config(&self) -> Result<PollConfig> {
        self.store.read_config().await?.ok_or(Error::ConfigNotFound)
    }

    /// Validates, persists, then rebinds the scheduler. Nothing is written
    /// when validation fails, and the scheduler is left alone when the write
    /// fails.
    pub async fn update_config(&self, symbol: &str, interval_seconds: i64) -> Result<PollConfig> {
        let span = trace_config_update(symbol, interval_seconds);
        async {
            let config = PollConfig::from_request(symbol, interval_seconds)?;

            let _guard = self.update_lock.lock().await;
            self.store.write_config(&config).await?;
            let epoch = self.scheduler.reconfigure(config.clone())?;

            tracing::info!(epoch, "Poll config updated");
            Ok::<_, Error>(config)
        }
        .instrument(span)
        .await
    }
}
