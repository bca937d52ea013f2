use async_trait::async_trait;
use parking_lot::Mutex;
use crate::error::Result;
use crate::interfaces::{ConfigStore, SampleHistory, SampleSink};
use crate::types::{PollConfig, Sample, Symbol};

#[derive(Default)]
pub struct InMemoryStore {
    config: Mutex<Option<PollConfig>>,
    samples: Mutex<Vec<Sample>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PollConfig) -> Self {
        InMemoryStore {
            config: Mutex::new(Some(config)),
            samples: Mutex::new(Vec::new()),
        }
    }

    /// Every appended sample, oldest first.
    pub fn samples(&self) -> Vec<Sample> {
        self.samples.lock().clone()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.lock().len()
    }
}

#[async_trait]
impl ConfigStore for InMemoryStore {
    async fn read_config(&self) -> Result<Option<PollConfig>> {
        Ok(self.config.lock().clone())
    }

    async fn write_config(&self, config: &PollConfig) -> Result<()> {
        *self.config.lock() = Some(config.clone());
        Ok(())
    }
}

#[async_trait]
impl SampleSink for InMemoryStore {
    async fn append(&self, sample: &Sample) -> Result<()> {
        self.samples.lock().push(sample.clone());
        Ok(())
    }
}

#[async_trait]
impl SampleHistory for InMemoryStore {
    async fn latest(&self, symbol: &Symbol) -> Result<Option<Sample>> {
        Ok(self.samples.lock()
            .iter()
            .rev()
            .find(|sample| &sample.symbol == symbol)
            .cloned())
    }
}
