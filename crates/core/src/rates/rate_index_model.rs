//! Rate index domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{Result, ValidationError};

/// One published value of an interest rate index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateFixing {
    pub fixing_date: NaiveDate,
    /// Annual rate as a fraction.
    pub annual_rate: Decimal,
}

impl RateFixing {
    pub fn new(fixing_date: NaiveDate, annual_rate: Decimal) -> Self {
        Self {
            fixing_date,
            annual_rate,
        }
    }
}

/// A fixing as it appears in an imported file, before parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateFixingImport {
    /// Date in ISO format (YYYY-MM-DD).
    pub date: String,
    /// Either a fraction ("0.0345") or a percentage ("3.45%").
    pub rate: String,
}

impl RateFixingImport {
    pub fn parse(&self) -> Result<RateFixing> {
        let fixing_date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|_| {
            ValidationError::InvalidDate(format!("Invalid date format: {}", self.date))
        })?;

        let raw = self.rate.trim();
        let (digits, is_percent) = match raw.strip_suffix('%') {
            Some(stripped) => (stripped.trim(), true),
            None => (raw, false),
        };
        let value = Decimal::from_str(digits).map_err(|_| {
            ValidationError::InvalidInput(format!("Invalid rate: {}", self.rate))
        })?;
        let annual_rate = if is_percent {
            value / Decimal::ONE_HUNDRED
        } else {
            value
        };

        Ok(RateFixing::new(fixing_date, annual_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn import(date: &str, rate: &str) -> RateFixingImport {
        RateFixingImport {
            date: date.to_string(),
            rate: rate.to_string(),
        }
    }

    #[test]
    fn test_parse_fraction_and_percent() {
        let fraction = import("2024-07-22", "0.0335").parse().unwrap();
        let percent = import("2024-07-22", " 3.35 % ").parse().unwrap();
        assert_eq!(fraction.annual_rate, dec!(0.0335));
        assert_eq!(percent.annual_rate, dec!(0.0335));
        assert_eq!(percent.fixing_date, NaiveDate::from_ymd_opt(2024, 7, 22).unwrap());
    }

    #[test]
    fn test_parse_rejects_bad_fields() {
        assert!(import("22/07/2024", "0.03").parse().is_err());
        assert!(import("2024-07-22", "three").parse().is_err());
    }
}
