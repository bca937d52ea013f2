use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::types::price::Price;
use crate::types::symbol::Symbol;

/// Latest price reported by a quote source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: Price,
    pub observed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub symbol: Symbol,
    pub price: Price,
    pub observed_at: DateTime<Utc>,
}

impl Sample {
    /// The sample always carries the symbol the quote was fetched for.
    pub fn from_quote(symbol: Symbol, quote: Quote) -> Self {
        Sample {
            symbol,
            price: quote.price,
            observed_at: quote.observed_at,
        }
    }
}
