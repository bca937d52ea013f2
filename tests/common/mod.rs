#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use price_poller::core::{PollScheduler, TickTimeouts};
use price_poller::interfaces::EventPublisher;
use price_poller::price_infra::connectors::QuoteSource;
use price_poller::storage::InMemoryStore;
use price_poller::{Price, Quote, QuoteError, Result, Sample, Symbol};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Quote source that answers a fixed price and records every call.
pub struct ScriptedSource {
    price: f64,
    calls: AtomicUsize,
    symbols: Mutex<Vec<Symbol>>,
    failing_calls: Mutex<HashSet<usize>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedSource {
    pub fn new(price: f64) -> Self {
        ScriptedSource {
            price,
            calls: AtomicUsize::new(0),
            symbols: Mutex::new(Vec::new()),
            failing_calls: Mutex::new(HashSet::new()),
            gate: None,
        }
    }

    /// Every fetch waits for one permit of the returned semaphore.
    pub fn gated(price: f64) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let mut source = Self::new(price);
        source.gate = Some(gate.clone());
        (source, gate)
    }

    /// Makes the `n`th call (1-based) report the source as unavailable.
    pub fn fail_call(&self, n: usize) {
        self.failing_calls.lock().insert(n);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn symbols(&self) -> Vec<String> {
        self.symbols.lock().iter().map(|s| s.to_string()).collect()
    }
}

#[async_trait]
impl QuoteSource for ScriptedSource {
    async fn fetch_latest(&self, symbol: &Symbol) -> std::result::Result<Quote, QuoteError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.symbols.lock().push(symbol.clone());

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        if self.failing_calls.lock().contains(&n) {
            return Err(QuoteError::Unavailable("scripted outage".to_string()));
        }

        Ok(Quote {
            price: Price::from_f64(self.price).expect("valid price"),
            observed_at: Utc::now() + ChronoDuration::milliseconds(n as i64),
        })
    }
}

#[derive(Default)]
pub struct CountingPublisher {
    published: AtomicUsize,
}

impl CountingPublisher {
    pub fn count(&self) -> usize {
        self.published.load(Ordering::SeqCst)
    }
}

impl EventPublisher for CountingPublisher {
    fn publish(&self, _sample: &Sample) -> Result<()> {
        self.published.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct Harness {
    pub scheduler: Arc<PollScheduler>,
    pub source: Arc<ScriptedSource>,
    pub store: Arc<InMemoryStore>,
    pub publisher: Arc<CountingPublisher>,
}

impl Harness {
    pub fn new(source: ScriptedSource) -> Self {
        Self::with_timeouts(source, TickTimeouts {
            fetch: Duration::from_secs(3600),
            store: Duration::from_secs(3600),
        })
    }

    pub fn with_timeouts(source: ScriptedSource, timeouts: TickTimeouts) -> Self {
        let source = Arc::new(source);
        let store = Arc::new(InMemoryStore::new());
        let publisher = Arc::new(CountingPublisher::default());
        let scheduler = Arc::new(PollScheduler::new(
            source.clone(),
            store.clone(),
            publisher.clone(),
            timeouts,
        ));
        Harness { scheduler, source, store, publisher }
    }
}

/// Lets spawned tasks run without advancing the paused clock.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

pub async fn advance_secs(secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs)).await;
    settle().await;
}
