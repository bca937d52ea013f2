pub mod bootstrap;
pub mod poll_scheduler;
pub mod state_machine;

pub use poll_scheduler::{PollScheduler, SchedulerStatus, TickOutcome, TickTimeouts};
pub use state_machine::SchedulerState;
