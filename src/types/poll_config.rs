use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::error::{Error, Result};
use crate::types::symbol::Symbol;

/// Longest accepted poll interval: one week.
pub const MAX_INTERVAL_SECONDS: u64 = 7 * 24 * 60 * 60;

/// The single tracked `{symbol, interval}` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    pub symbol: Symbol,
    pub interval_seconds: u64,
}

impl PollConfig {
    pub fn new(symbol: &str, interval_seconds: u64) -> Result<Self> {
        let config = PollConfig {
            symbol: Symbol::parse(symbol)?,
            interval_seconds,
        };
        config.validate()?;
        Ok(config)
    }

    /// Builds a config from untrusted input where the interval may be signed.
    pub fn from_request(symbol: &str, interval_seconds: i64) -> Result<Self> {
        let interval = u64::try_from(interval_seconds).map_err(|_| {
            Error::InvalidConfig(format!("interval must be positive, got {}", interval_seconds))
        })?;
        Self::new(symbol, interval)
    }

    pub fn validate(&self) -> Result<()> {
        self.symbol.validate()?;
        if self.interval_seconds == 0 {
            return Err(Error::InvalidConfig("interval must be positive, got 0".to_string()));
        }
        if self.interval_seconds > MAX_INTERVAL_SECONDS {
            return Err(Error::InvalidConfig(format!(
                "interval must be at most {} seconds, got {}",
                MAX_INTERVAL_SECONDS, self.interval_seconds
            )));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_interval_is_invalid() {
        assert!(matches!(PollConfig::new("AAPL", 0), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn negative_request_interval_is_invalid() {
        assert!(matches!(PollConfig::from_request("AAPL", -5), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn interval_above_one_week_is_invalid() {
        assert!(PollConfig::new("AAPL", MAX_INTERVAL_SECONDS).is_ok());
        assert!(matches!(
            PollConfig::new("AAPL", MAX_INTERVAL_SECONDS + 1),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(PollConfig::from_request("AAPL", i64::MAX), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn empty_symbol_is_invalid() {
        assert!(matches!(PollConfig::new("", 30), Err(Error::InvalidConfig(_))));
    }

    proptest! {
        #[test]
        fn positive_intervals_are_accepted(
            symbol in "[A-Z]{1,5}(\\.[A-Z])?",
            interval in 1u64..=86_400,
        ) {
            let config = PollConfig::new(&symbol, interval).unwrap();
            prop_assert_eq!(config.interval(), Duration::from_secs(interval));
            prop_assert_eq!(config.symbol.as_str(), symbol.as_str());
        }

        #[test]
        fn non_positive_request_intervals_are_rejected(interval in i64::MIN..=0) {
            prop_assert!(PollConfig::from_request("AAPL", interval).is_err());
        }
    }
}
