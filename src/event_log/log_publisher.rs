use crate::error::Result;
use crate::interfaces::EventPublisher;
use crate::types::Sample;

/// Stands in for the event stream when no broker is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogPublisher;

impl EventPublisher for LogPublisher {
    fn publish(&self, sample: &Sample) -> Result<()> {
        tracing::info!(
            symbol = %sample.symbol,
            price = %sample.price,
            observed_at = %sample.observed_at,
            "Sample"
        );
        Ok(())
    }
}
