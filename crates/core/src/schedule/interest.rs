//! Period interest under the day-count and period-count conventions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::settings::ScheduleSettings;
use crate::utils::decimal_utils::round_half_up;

/// How interest accrues over one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterestConvention {
    /// Proportional to elapsed calendar days over the day-count basis.
    DayCount,
    /// A fixed `rate / payments_per_year` share of the balance.
    PeriodCount,
}

/// Computes rounded period interest. Pure; holds only the conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterestCalculator {
    day_count_basis: u32,
    scale: u32,
}

impl Default for InterestCalculator {
    fn default() -> Self {
        Self::from_settings(&ScheduleSettings::default())
    }
}

impl InterestCalculator {
    pub fn from_settings(settings: &ScheduleSettings) -> Self {
        Self {
            day_count_basis: settings.day_count_basis,
            scale: settings.amount_scale,
        }
    }

    /// `round(balance * rate / payments_per_year)`.
    pub fn period_count(
        &self,
        balance: Decimal,
        annual_rate: Decimal,
        payments_per_year: u32,
    ) -> Result<Decimal> {
        check_non_negative("interest base", balance)?;
        check_non_negative("annual rate", annual_rate)?;
        if payments_per_year == 0 {
            return Err(ValidationError::NotPositiveInteger {
                field: "payments per year",
            }
            .into());
        }
        Ok(round_half_up(
            balance * annual_rate / Decimal::from(payments_per_year),
            self.scale,
        ))
    }

    /// `round(balance * rate * days_elapsed / basis)`.
    pub fn day_count(
        &self,
        balance: Decimal,
        annual_rate: Decimal,
        days_elapsed: i64,
    ) -> Result<Decimal> {
        check_non_negative("interest base", balance)?;
        check_non_negative("annual rate", annual_rate)?;
        if days_elapsed < 0 {
            return Err(ValidationError::Negative {
                field: "days elapsed",
            }
            .into());
        }
        Ok(round_half_up(
            balance * annual_rate * Decimal::from(days_elapsed)
                / Decimal::from(self.day_count_basis),
            self.scale,
        ))
    }

    /// Dispatches on the convention; `days_elapsed` is ignored for period-count.
    pub fn accrue(
        &self,
        convention: InterestConvention,
        balance: Decimal,
        annual_rate: Decimal,
        payments_per_year: u32,
        days_elapsed: i64,
    ) -> Result<Decimal> {
        match convention {
            InterestConvention::DayCount => self.day_count(balance, annual_rate, days_elapsed),
            InterestConvention::PeriodCount => {
                self.period_count(balance, annual_rate, payments_per_year)
            }
        }
    }
}

fn check_non_negative(field: &'static str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative { field }.into());
    }
    Ok(())
}
