use std::sync::Arc;
use std::time::Duration;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Instrument};
use crate::core::state_machine::{Cycle, CycleLedger, SchedulerState};
use crate::error::{Error, QuoteError, Result};
use crate::interfaces::{EventPublisher, SampleSink};
use crate::observability::metrics::{
    CURRENT_EPOCH, FETCH_FAILURES, PUBLISH_FAILURES, RECONFIGURATIONS, SAMPLES_STORED,
    STALE_DISCARDS, STORE_FAILURES, TICKS_TOTAL, TICK_LATENCY,
};
use crate::observability::tracing::trace_poll_tick;
use crate::price_infra::connectors::QuoteSource;
use crate::types::{PollConfig, Sample};

/// Upper bounds on the two collaborator calls a tick awaits.
#[derive(Clone, Copy, Debug)]
pub struct TickTimeouts {
    pub fetch: Duration,
    pub store: Duration,
}

impl Default for TickTimeouts {
    fn default() -> Self {
        TickTimeouts {
            fetch: Duration::from_secs(10),
            store: Duration::from_secs(10),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SchedulerStatus {
    pub state: SchedulerState,
    pub epoch: Option<u64>,
    pub config: Option<PollConfig>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Stored,
    FetchFailed,
    StoreFailed,
    /// The cycle was retired while the fetch was in flight.
    Discarded,
}

/// Runs one recurring fetch-and-store job whose symbol and interval can be
/// swapped at any time.
///
/// Every (re)start creates a new [`Cycle`] with a fresh epoch and retires the
/// previous one. A tick acts only while its epoch is current: it is checked
/// before the fetch and again before the append, so a retired cycle never
/// starts a fetch and never writes a sample it fetched after retirement.
///
/// All methods except [`PollScheduler::shutdown`] return without awaiting
/// collaborators and must be called from within a tokio runtime.
pub struct PollScheduler {
    shared: Arc<Shared>,
}

struct Shared {
    source: Arc<dyn QuoteSource>,
    sink: Arc<dyn SampleSink>,
    publisher: Arc<dyn EventPublisher>,
    timeouts: TickTimeouts,
    ledger: Mutex<CycleLedger>,
}

impl PollScheduler {
    pub fn new(
        source: Arc<dyn QuoteSource>,
        sink: Arc<dyn SampleSink>,
        publisher: Arc<dyn EventPublisher>,
        timeouts: TickTimeouts,
    ) -> Self {
        PollScheduler {
            shared: Arc::new(Shared {
                source,
                sink,
                publisher,
                timeouts,
                ledger: Mutex::new(CycleLedger::new()),
            }),
        }
    }

    /// Binds a new cycle to `config` and returns its epoch. The first tick
    /// fires one full interval from now. Any current cycle is retired.
    pub fn start(&self, config: PollConfig) -> Result<u64> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| Error::RuntimeUnavailable)?;
        let first_tick = Instant::now()
            .checked_add(config.interval())
            .ok_or_else(|| Error::InvalidConfig(format!(
                "interval of {} seconds is out of range",
                config.interval_seconds
            )))?;

        let mut ledger = self.shared.ledger.lock();
        let cycle = Cycle {
            epoch: ledger.next_epoch(),
            config,
        };
        let token = CancellationToken::new();
        let handle = runtime.spawn(run_cycle(
            Arc::clone(&self.shared),
            cycle.clone(),
            token.clone(),
            first_tick,
        ));
        let retired = ledger.install(cycle.clone(), token, handle);
        drop(ledger);

        CURRENT_EPOCH.set(cycle.epoch as i64);
        match retired {
            Some(old) => info!(
                old_epoch = old.epoch,
                epoch = cycle.epoch,
                symbol = %cycle.config.symbol,
                interval_seconds = cycle.config.interval_seconds,
                "Poll cycle replaced"
            ),
            None => info!(
                epoch = cycle.epoch,
                symbol = %cycle.config.symbol,
                interval_seconds = cycle.config.interval_seconds,
                "Poll cycle started"
            ),
        }

        Ok(cycle.epoch)
    }

    /// Retires the current cycle and starts a new one bound to `config`.
    ///
    /// Always recreates the timer, even when `config` equals the bound one,
    /// so ticks realign to the moment of the call. An invalid `config` leaves
    /// the current cycle running.
    pub fn reconfigure(&self, config: PollConfig) -> Result<u64> {
        let epoch = self.start(config)?;
        RECONFIGURATIONS.inc();
        Ok(epoch)
    }

    /// Retires the current cycle. Calling it while idle does nothing.
    pub fn stop(&self) {
        let retired = self.shared.ledger.lock().retire();
        match retired {
            Some(cycle) => {
                CURRENT_EPOCH.set(0);
                info!(epoch = cycle.epoch, symbol = %cycle.config.symbol, "Poll cycle stopped");
            }
            None => debug!("Stop requested while idle"),
        }
    }

    /// Stops and waits for in-flight ticks of every retired cycle to finish.
    pub async fn shutdown(&self) {
        self.stop();
        let draining = self.shared.ledger.lock().take_draining();
        for handle in draining {
            if let Err(e) = handle.await {
                warn!(error = %e, "Poll cycle task ended abnormally");
            }
        }
        info!("Poll scheduler shut down");
    }

    pub fn state(&self) -> SchedulerState {
        self.shared.ledger.lock().state()
    }

    pub fn current_config(&self) -> Option<PollConfig> {
        self.shared.ledger.lock().current().map(|cycle| cycle.config.clone())
    }

    pub fn status(&self) -> SchedulerStatus {
        let ledger = self.shared.ledger.lock();
        let current = ledger.current();
        SchedulerStatus {
            state: ledger.state(),
            epoch: current.map(|cycle| cycle.epoch),
            config: current.map(|cycle| cycle.config.clone()),
        }
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.shared.ledger.lock().retire();
    }
}

async fn run_cycle(shared: Arc<Shared>, cycle: Cycle, token: CancellationToken, first_tick: Instant) {
    let mut ticker = time::interval_at(first_tick, cycle.config.interval());
    // A slow tick pushes the next one back instead of bursting to catch up.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let admitted = shared.ledger.lock().begin_tick(cycle.epoch);
        if !admitted {
            break;
        }

        shared.tick(&cycle)
            .instrument(trace_poll_tick(&cycle.config.symbol, cycle.epoch))
            .await;

        shared.ledger.lock().end_tick(cycle.epoch);
    }

    debug!(epoch = cycle.epoch, "Poll cycle task exited");
}

impl Shared {
    async fn tick(&self, cycle: &Cycle) -> TickOutcome {
        TICKS_TOTAL.inc();
        let _latency = TICK_LATENCY.start_timer();
        let symbol = &cycle.config.symbol;

        let fetched = time::timeout(self.timeouts.fetch, self.source.fetch_latest(symbol)).await;
        let quote = match fetched {
            Ok(Ok(quote)) => quote,
            Ok(Err(e)) => {
                FETCH_FAILURES.with_label_values(&[failure_label(&e)]).inc();
                warn!(error = %e, "Quote fetch failed, skipping tick");
                return TickOutcome::FetchFailed;
            }
            Err(_) => {
                FETCH_FAILURES.with_label_values(&["timeout"]).inc();
                let e = Error::Timeout { operation: "quote fetch", after: self.timeouts.fetch };
                warn!(error = %e, "Quote fetch failed, skipping tick");
                return TickOutcome::FetchFailed;
            }
        };

        let sample = Sample::from_quote(symbol.clone(), quote);

        let still_current = self.ledger.lock().is_current(cycle.epoch);
        if !still_current {
            STALE_DISCARDS.inc();
            info!(price = %sample.price, "Cycle retired during fetch, discarding sample");
            return TickOutcome::Discarded;
        }

        let stored = time::timeout(self.timeouts.store, self.sink.append(&sample)).await;
        let failure = match stored {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e),
            Err(_) => Some(Error::Timeout { operation: "sample append", after: self.timeouts.store }),
        };
        if let Some(e) = failure {
            STORE_FAILURES.inc();
            warn!(error = %e, price = %sample.price, "Sample append failed, dropping sample");
            return TickOutcome::StoreFailed;
        }

        SAMPLES_STORED.inc();
        debug!(price = %sample.price, observed_at = %sample.observed_at, "Sample stored");

        if let Err(e) = self.publisher.publish(&sample) {
            PUBLISH_FAILURES.inc();
            warn!(error = %e, "Sample publish failed");
        }

        TickOutcome::Stored
    }
}

fn failure_label(error: &QuoteError) -> &'static str {
    match error {
        QuoteError::Unavailable(_) => "unavailable",
        QuoteError::RateLimited => "rate_limited",
        QuoteError::Malformed(_) => "malformed",
    }
}
