use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use crate::types::PollConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    /// No cycle.
    Idle,
    /// Cycle active, timer armed.
    Scheduled,
    /// A fetch/store of the current cycle is in flight.
    Ticking,
}

/// The run token a cycle's timer task carries around.
#[derive(Clone, Debug)]
pub struct Cycle {
    pub epoch: u64,
    pub config: PollConfig,
}

pub(crate) struct CycleSlot {
    cycle: Cycle,
    token: CancellationToken,
    handle: JoinHandle<()>,
    ticking: bool,
}

/// Which cycle is current and whether it has a tick in flight.
///
/// Lives behind the scheduler's single mutex; every transition happens with
/// that lock held and none of these methods await.
pub(crate) struct CycleLedger {
    epoch: u64,
    current: Option<CycleSlot>,
    draining: Vec<JoinHandle<()>>,
}

impl CycleLedger {
    pub fn new() -> Self {
        CycleLedger {
            epoch: 0,
            current: None,
            draining: Vec::new(),
        }
    }

    pub fn state(&self) -> SchedulerState {
        match &self.current {
            None => SchedulerState::Idle,
            Some(slot) if slot.ticking => SchedulerState::Ticking,
            Some(_) => SchedulerState::Scheduled,
        }
    }

    pub fn current(&self) -> Option<&Cycle> {
        self.current.as_ref().map(|slot| &slot.cycle)
    }

    /// Reserves the epoch of the next cycle. Every epoch is handed out once.
    pub fn next_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// `Idle|Scheduled|Ticking --start/reconfigure--> Scheduled`.
    ///
    /// The previous cycle, if any, is cancelled before this returns.
    pub fn install(&mut self, cycle: Cycle, token: CancellationToken, handle: JoinHandle<()>) -> Option<Cycle> {
        let retired = self.retire();
        self.current = Some(CycleSlot {
            cycle,
            token,
            handle,
            ticking: false,
        });
        retired
    }

    /// `Scheduled|Ticking --stop--> Idle`. Returns the retired cycle.
    pub fn retire(&mut self) -> Option<Cycle> {
        self.draining.retain(|handle| !handle.is_finished());
        let slot = self.current.take()?;
        slot.token.cancel();
        self.draining.push(slot.handle);
        Some(slot.cycle)
    }

    /// `Scheduled --timer fires--> Ticking`, only for the current cycle.
    pub fn begin_tick(&mut self, epoch: u64) -> bool {
        match &mut self.current {
            Some(slot) if slot.cycle.epoch == epoch => {
                slot.ticking = true;
                true
            }
            _ => false,
        }
    }

    /// `Ticking --fetch/store completes--> Scheduled`. A retired cycle's tick
    /// finishing late leaves the newer cycle untouched.
    pub fn end_tick(&mut self, epoch: u64) {
        if let Some(slot) = &mut self.current {
            if slot.cycle.epoch == epoch {
                slot.ticking = false;
            }
        }
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.current.as_ref().is_some_and(|slot| slot.cycle.epoch == epoch)
    }

    /// Hands out the timer tasks of retired cycles so they can be awaited.
    pub fn take_draining(&mut self) -> Vec<JoinHandle<()>> {
        std::mem::take(&mut self.draining)
    }
}
