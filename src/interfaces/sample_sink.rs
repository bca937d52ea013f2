use async_trait::async_trait;
use crate::error::Result;
use crate::types::{Sample, Symbol};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SampleSink: Send + Sync {
    async fn append(&self, sample: &Sample) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SampleHistory: Send + Sync {
    async fn latest(&self, symbol: &Symbol) -> Result<Option<Sample>>;
}
