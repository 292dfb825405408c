//! Schedule settings model.

use serde::{Deserialize, Serialize};

use crate::constants::{AMOUNT_SCALE, DAY_COUNT_BASIS, RATIO_SCALE};
use crate::errors::{Error, Result};

/// Conventions applied to every schedule a generator produces.
///
/// Loaded from JSON with camelCase keys; missing keys keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleSettings {
    /// Days per year for day-count interest.
    pub day_count_basis: u32,
    /// Decimal places for money amounts.
    pub amount_scale: u32,
    /// Decimal places for principal ratios.
    pub ratio_scale: u32,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            day_count_basis: DAY_COUNT_BASIS,
            amount_scale: AMOUNT_SCALE,
            ratio_scale: RATIO_SCALE,
        }
    }
}

impl ScheduleSettings {
    /// Parses settings from a JSON document and validates them.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: ScheduleSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.day_count_basis == 0 {
            return Err(Error::Config(
                "dayCountBasis must be a positive number of days".to_string(),
            ));
        }
        // Decimal supports at most 28 fractional digits.
        if self.amount_scale > 10 || self.ratio_scale > 10 {
            return Err(Error::Config(
                "amountScale and ratioScale must not exceed 10".to_string(),
            ));
        }
        Ok(())
    }
}
