use serde::{Deserialize, Serialize};
use std::fmt;
use crate::error::{Error, Result};

/// Non-negative fixed-point price with 8 decimal places.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct Price(i64);

impl Price {
    const MULTIPLIER: i64 = 100_000_000;  // 10^8

    pub fn from_raw(raw: i64) -> Result<Self> {
        if raw < 0 {
            return Err(Error::InvalidPrice(format!("negative price: {}", raw)));
        }
        Ok(Price(raw))
    }

    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidPrice(format!("price out of range: {}", value)));
        }
        let scaled = (value * Self::MULTIPLIER as f64).round();
        if scaled > i64::MAX as f64 {
            return Err(Error::InvalidPrice(format!("price out of range: {}", value)));
        }
        Ok(Price(scaled as i64))
    }

    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / Self::MULTIPLIER as f64
    }

    pub fn raw_value(&self) -> i64 {
        self.0
    }

    pub fn zero() -> Self {
        Price(0)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> f64 {
        price.to_f64()
    }
}

impl TryFrom<f64> for Price {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Price::from_f64(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::MULTIPLIER;
        let frac = self.0 % Self::MULTIPLIER;
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:08}", frac);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_negative_and_non_finite() {
        assert!(Price::from_f64(-0.01).is_err());
        assert!(Price::from_f64(f64::NAN).is_err());
        assert!(Price::from_f64(f64::INFINITY).is_err());
        assert!(Price::from_raw(-1).is_err());
    }

    #[test]
    fn displays_trimmed_decimal() {
        assert_eq!(Price::from_f64(100.0).unwrap().to_string(), "100");
        assert_eq!(Price::from_f64(187.25).unwrap().to_string(), "187.25");
        assert_eq!(Price::from_raw(1).unwrap().to_string(), "0.00000001");
    }

    #[test]
    fn serializes_as_number() {
        let price = Price::from_f64(42.5).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "42.5");
        let back: Price = serde_json::from_str("42.5").unwrap();
        assert_eq!(back, price);
        assert!(serde_json::from_str::<Price>("-3").is_err());
    }

    proptest! {
        #[test]
        fn non_negative_inputs_are_accepted(value in 0.0f64..1_000_000_000.0) {
            let price = Price::from_f64(value).unwrap();
            prop_assert!(price.raw_value() >= 0);
            prop_assert!((price.to_f64() - value).abs() < 1e-6);
        }
    }
}
