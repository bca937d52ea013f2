use crate::error::Result;
use crate::types::Sample;

/// Best-effort republishing of stored samples.
///
/// Implementations must hand the sample off and return without waiting for
/// delivery; an `Err` only means the hand-off itself failed.
#[cfg_attr(test, mockall::automock)]
pub trait EventPublisher: Send + Sync {
    fn publish(&self, sample: &Sample) -> Result<()>;
}
