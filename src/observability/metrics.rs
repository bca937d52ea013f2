use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use crate::error::Result;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Tick metrics
    pub static ref TICKS_TOTAL: IntCounter = IntCounter::new(
        "poll_ticks_total",
        "Total number of poll ticks started"
    ).expect("valid metric definition");

    pub static ref SAMPLES_STORED: IntCounter = IntCounter::new(
        "samples_stored_total",
        "Total number of price samples appended to the sink"
    ).expect("valid metric definition");

    pub static ref FETCH_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("quote_fetch_failures_total", "Quote fetches that produced no sample"),
        &["reason"]
    ).expect("valid metric definition");

    pub static ref STORE_FAILURES: IntCounter = IntCounter::new(
        "sample_store_failures_total",
        "Samples dropped because the sink rejected or timed out the append"
    ).expect("valid metric definition");

    pub static ref STALE_DISCARDS: IntCounter = IntCounter::new(
        "stale_samples_discarded_total",
        "Samples fetched by a cycle that was retired before the fetch returned"
    ).expect("valid metric definition");

    pub static ref PUBLISH_FAILURES: IntCounter = IntCounter::new(
        "sample_publish_failures_total",
        "Samples that could not be handed to the event stream"
    ).expect("valid metric definition");

    // Scheduler metrics
    pub static ref RECONFIGURATIONS: IntCounter = IntCounter::new(
        "poll_reconfigurations_total",
        "Total number of scheduler reconfigurations"
    ).expect("valid metric definition");

    pub static ref CURRENT_EPOCH: IntGauge = IntGauge::new(
        "poll_cycle_epoch",
        "Epoch of the current poll cycle, 0 when idle"
    ).expect("valid metric definition");

    // Latency metrics
    pub static ref TICK_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "poll_tick_latency_seconds",
            "Wall time of one fetch and store"
        ).buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0])
    ).expect("valid metric definition");
}

pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(TICKS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SAMPLES_STORED.clone()))?;
    REGISTRY.register(Box::new(FETCH_FAILURES.clone()))?;
    REGISTRY.register(Box::new(STORE_FAILURES.clone()))?;
    REGISTRY.register(Box::new(STALE_DISCARDS.clone()))?;
    REGISTRY.register(Box::new(PUBLISH_FAILURES.clone()))?;
    REGISTRY.register(Box::new(RECONFIGURATIONS.clone()))?;
    REGISTRY.register(Box::new(CURRENT_EPOCH.clone()))?;
    REGISTRY.register(Box::new(TICK_LATENCY.clone()))?;
    Ok(())
}

/// Renders the registry in the Prometheus text exposition format.
pub fn gather_text() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| crate::error::Error::MetricsError(e.to_string()))
}
