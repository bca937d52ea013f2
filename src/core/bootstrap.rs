use tracing::{error, info, warn};
use crate::core::poll_scheduler::PollScheduler;
use crate::error::{Error, Result};
use crate::interfaces::ConfigStore;
use crate::types::PollConfig;

/// Returns the persisted config, seeding `default` first if the store is empty.
///
/// The store is written only when no row exists; an existing row is never
/// overwritten here, even when it fails validation.
pub async fn load_or_seed(store: &dyn ConfigStore, default: &PollConfig) -> Result<PollConfig> {
    match store.read_config().await? {
        Some(config) => Ok(config),
        None => {
            warn!(
                reason = %Error::StartupConfigMissing,
                symbol = %default.symbol,
                interval_seconds = default.interval_seconds,
                "Seeding default poll config"
            );
            store.write_config(default).await?;
            Ok(default.clone())
        }
    }
}

/// Initialises `scheduler` from the store and returns the config it was
/// started with. A persisted config that no longer validates is replaced by
/// `default` in the store so the scheduler and the store stay in step.
pub async fn bootstrap(
    store: &dyn ConfigStore,
    scheduler: &PollScheduler,
    default: &PollConfig,
) -> Result<PollConfig> {
    let mut config = load_or_seed(store, default).await?;

    if let Err(e) = config.validate() {
        error!(
            error = %e,
            symbol = %config.symbol,
            interval_seconds = config.interval_seconds,
            "Persisted poll config is invalid, replacing it with the default"
        );
        store.write_config(default).await?;
        config = default.clone();
    }

    scheduler.start(config.clone())?;
    info!(symbol = %config.symbol, interval_seconds = config.interval_seconds, "Poll scheduler bootstrapped");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::*;
    use std::sync::Arc;
    use crate::core::TickTimeouts;
    use crate::event_log::LogPublisher;
    use crate::interfaces::config_store::MockConfigStore;
    use crate::price_infra::connectors::MockQuoteSource;
    use crate::storage::InMemoryStore;
    use crate::types::Symbol;

    fn scheduler() -> PollScheduler {
        PollScheduler::new(
            Arc::new(MockQuoteSource::new()),
            Arc::new(InMemoryStore::new()),
            Arc::new(LogPublisher),
            TickTimeouts::default(),
        )
    }

    #[tokio::test]
    async fn seeds_default_when_store_is_empty() {
        let default = PollConfig::new("AAPL", 60).unwrap();
        let mut store = MockConfigStore::new();
        store.expect_read_config().times(1).returning(|| Ok(None));
        store.expect_write_config()
            .with(eq(default.clone()))
            .times(1)
            .returning(|_| Ok(()));

        let config = load_or_seed(&store, &default).await.unwrap();
        assert_eq!(config, default);
    }

    #[tokio::test]
    async fn existing_config_is_not_overwritten() {
        let stored = PollConfig::new("TSLA", 15).unwrap();
        let returned = stored.clone();
        let mut store = MockConfigStore::new();
        store.expect_read_config().times(1).returning(move || Ok(Some(returned.clone())));
        store.expect_write_config().never();

        let default = PollConfig::new("AAPL", 60).unwrap();
        let config = load_or_seed(&store, &default).await.unwrap();
        assert_eq!(config, stored);
    }

    #[tokio::test]
    async fn invalid_persisted_config_is_replaced_with_default() {
        let mut store = MockConfigStore::new();
        store.expect_read_config().times(1).returning(|| {
            Ok(Some(PollConfig {
                symbol: Symbol::parse("TSLA").unwrap(),
                interval_seconds: 0,
            }))
        });
        let default = PollConfig::new("AAPL", 60).unwrap();
        store.expect_write_config()
            .with(eq(default.clone()))
            .times(1)
            .returning(|_| Ok(()));

        let scheduler = scheduler();
        let config = bootstrap(&store, &scheduler, &default).await.unwrap();

        assert_eq!(config, default);
        assert_eq!(scheduler.current_config(), Some(default));
    }

    #[tokio::test]
    async fn valid_persisted_config_is_started_as_is() {
        let stored = PollConfig::new("TSLA", 15).unwrap();
        let returned = stored.clone();
        let mut store = MockConfigStore::new();
        store.expect_read_config().returning(move || Ok(Some(returned.clone())));
        store.expect_write_config().never();

        let scheduler = scheduler();
        let default = PollConfig::new("AAPL", 60).unwrap();
        bootstrap(&store, &scheduler, &default).await.unwrap();

        assert_eq!(scheduler.current_config(), Some(stored));
    }

    #[tokio::test]
    async fn seed_write_failure_is_surfaced() {
        let mut store = MockConfigStore::new();
        store.expect_read_config().returning(|| Ok(None));
        store.expect_write_config()
            .returning(|_| Err(Error::StoreError("read-only".to_string())));

        let default = PollConfig::new("AAPL", 60).unwrap();
        let result = load_or_seed(&store, &default).await;
        assert!(matches!(result, Err(Error::StoreError(_))));
    }
}
