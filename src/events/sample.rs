use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use crate::types::Sample;

/// Envelope a stored sample travels in on the event stream.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SampleEvent {
    pub event_id: Uuid,
    pub version: u32,
    pub sequence: u64,
    pub emitted_at: DateTime<Utc>,
    pub sample: Sample,
    pub checksum: String,
}

impl SampleEvent {
    pub const VERSION: u32 = 1;

    pub fn new(sample: Sample, sequence: u64) -> Self {
        let mut event = SampleEvent {
            event_id: Uuid::new_v4(),
            version: Self::VERSION,
            sequence,
            emitted_at: Utc::now(),
            sample,
            checksum: String::new(),
        };
        event.checksum = event.calculate_checksum();
        event
    }

    pub fn calculate_checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.event_id.as_bytes());
        hasher.update(self.sequence.to_le_bytes());
        hasher.update(self.sample.symbol.as_str().as_bytes());
        hasher.update(self.sample.price.raw_value().to_le_bytes());
        hasher.update(self.sample.observed_at.timestamp_millis().to_le_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn verify_checksum(&self) -> bool {
        self.checksum == self.calculate_checksum()
    }
}
