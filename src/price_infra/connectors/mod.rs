pub mod rest;

use async_trait::async_trait;
use crate::error::QuoteError;
use crate::types::{Quote, Symbol};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_latest(&self, symbol: &Symbol) -> Result<Quote, QuoteError>;
}
