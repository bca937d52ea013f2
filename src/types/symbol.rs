use serde::{Deserialize, Serialize};
use std::fmt;
use crate::error::{Error, Result};

const MAX_SYMBOL_LEN: usize = 32;

/// Ticker symbol of the tracked instrument, e.g. `AAPL` or `BRK.B`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(raw: &str) -> Result<Self> {
        let symbol = Symbol(raw.trim().to_string());
        symbol.validate()?;
        Ok(symbol)
    }

    /// Wraps a value read back from storage without re-validating it.
    pub(crate) fn from_stored(raw: String) -> Self {
        Symbol(raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(Error::InvalidConfig("symbol must not be empty".to_string()));
        }
        if self.0.len() > MAX_SYMBOL_LEN {
            return Err(Error::InvalidConfig(format!(
                "symbol longer than {} characters", MAX_SYMBOL_LEN
            )));
        }
        if self.0.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(Error::InvalidConfig(format!("symbol contains whitespace: {:?}", self.0)));
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
