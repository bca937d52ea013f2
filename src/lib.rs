pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod event_log;
pub mod events;
pub mod interfaces;
pub mod observability;
pub mod price_infra;
pub mod storage;
pub mod types;

pub use crate::core::{PollScheduler, SchedulerState, SchedulerStatus, TickTimeouts};
pub use crate::error::{Error, QuoteError, Result};
pub use crate::types::{PollConfig, Price, Quote, Sample, Symbol};
