use std::sync::Arc;
use anyhow::Context;
use price_poller::api::{ApiState, ConfigApi, create_router};
use price_poller::config::AppConfig;
use price_poller::core::bootstrap::bootstrap;
use price_poller::core::PollScheduler;
use price_poller::event_log::{KafkaSamplePublisher, LogPublisher};
use price_poller::interfaces::EventPublisher;
use price_poller::observability::metrics::register_metrics;
use price_poller::observability::tracing::init_tracing;
use price_poller::price_infra::connectors::rest::RestQuoteConnector;
use price_poller::storage::Storage;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("PRICE_POLLER_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env).context("loading configuration")?;

    init_tracing(&config.logging)?;
    register_metrics()?;
    tracing::info!(env = %env, "Starting price poller");

    let storage = Storage::open(&config.database).await.context("opening storage")?;

    let source = RestQuoteConnector::new(&config.quote_source)?;
    tracing::info!(source = source.source_id(), "Quote source configured");

    let publisher: Arc<dyn EventPublisher> = match &config.kafka {
        Some(kafka) => {
            tracing::info!(brokers = %kafka.brokers, topic = %kafka.topic, "Publishing samples to Kafka");
            Arc::new(KafkaSamplePublisher::new(kafka)?)
        }
        None => Arc::new(LogPublisher),
    };

    let scheduler = Arc::new(PollScheduler::new(
        Arc::new(source),
        storage.sink.clone(),
        publisher,
        config.poller.timeouts(),
    ));

    let default = config.poller.default_poll_config()?;
    bootstrap(storage.config_store.as_ref(), &scheduler, &default)
        .await
        .context("bootstrapping poll scheduler")?;

    let state = Arc::new(ApiState {
        config_api: ConfigApi::new(storage.config_store.clone(), scheduler.clone()),
        scheduler: scheduler.clone(),
        history: storage.history.clone(),
    });

    let listener = TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.server.bind_addr))?;
    tracing::info!(addr = %config.server.bind_addr, "HTTP API listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
