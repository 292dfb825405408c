//! Schedule domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{MONTHS_PER_YEAR, TOTAL_ROW_LABEL};
use crate::errors::{Error, Result, ValidationError};
use crate::schedule::interest::InterestConvention;

/// Closed set of repayment methods the engine knows how to schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepaymentMethod {
    /// Constant installment, paid at the end of each period.
    EqualInstallment,
    /// Constant installment, collected at the start of each period.
    EqualInstallmentPrepaid,
    EqualPrincipalDayCount,
    EqualPrincipalPeriodCount,
    PrincipalRatioDayCount,
    PrincipalRatioPeriodCount,
}

impl RepaymentMethod {
    pub const ALL: [RepaymentMethod; 6] = [
        RepaymentMethod::EqualInstallment,
        RepaymentMethod::EqualInstallmentPrepaid,
        RepaymentMethod::EqualPrincipalDayCount,
        RepaymentMethod::EqualPrincipalPeriodCount,
        RepaymentMethod::PrincipalRatioDayCount,
        RepaymentMethod::PrincipalRatioPeriodCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RepaymentMethod::EqualInstallment => "EQUAL_INSTALLMENT",
            RepaymentMethod::EqualInstallmentPrepaid => "EQUAL_INSTALLMENT_PREPAID",
            RepaymentMethod::EqualPrincipalDayCount => "EQUAL_PRINCIPAL_DAY_COUNT",
            RepaymentMethod::EqualPrincipalPeriodCount => "EQUAL_PRINCIPAL_PERIOD_COUNT",
            RepaymentMethod::PrincipalRatioDayCount => "PRINCIPAL_RATIO_DAY_COUNT",
            RepaymentMethod::PrincipalRatioPeriodCount => "PRINCIPAL_RATIO_PERIOD_COUNT",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RepaymentMethod::EqualInstallment => "EqualInstallment",
            RepaymentMethod::EqualInstallmentPrepaid => "EqualInstallmentPrepaid",
            RepaymentMethod::EqualPrincipalDayCount => "EqualPrincipalDayCount",
            RepaymentMethod::EqualPrincipalPeriodCount => "EqualPrincipalPeriodCount",
            RepaymentMethod::PrincipalRatioDayCount => "PrincipalRatioDayCount",
            RepaymentMethod::PrincipalRatioPeriodCount => "PrincipalRatioPeriodCount",
        }
    }

    /// Interest convention used by the method's middle periods.
    pub fn interest_convention(&self) -> InterestConvention {
        match self {
            RepaymentMethod::EqualPrincipalDayCount | RepaymentMethod::PrincipalRatioDayCount => {
                InterestConvention::DayCount
            }
            _ => InterestConvention::PeriodCount,
        }
    }

    /// Whether the method reports a principal ratio per period.
    pub fn uses_principal_ratio(&self) -> bool {
        matches!(
            self,
            RepaymentMethod::PrincipalRatioDayCount | RepaymentMethod::PrincipalRatioPeriodCount
        )
    }
}

impl fmt::Display for RepaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepaymentMethod {
    type Err = Error;

    /// Accepts the SCREAMING_SNAKE_CASE identifier or the PascalCase name.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        RepaymentMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == trimmed || method.name() == trimmed)
            .ok_or_else(|| Error::UnsupportedMethod(s.to_string()))
    }
}

/// Scalar inputs describing one lease or loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleParameters {
    pub principal: Decimal,
    /// Annual rate as a fraction (0.06 for 6%).
    pub annual_rate: Decimal,
    pub total_periods: u32,
    pub payments_per_year: u32,
    pub payment_interval_months: u32,
    pub start_date: NaiveDate,
    pub deposit_amount: Option<Decimal>,
    /// Residual purchase price paid at the end of the lease.
    pub nominal_price: Option<Decimal>,
    pub repayment_method: RepaymentMethod,
}

impl ScheduleParameters {
    /// Builds parameters with `payments_per_year` derived from the interval.
    ///
    /// The interval must divide twelve; irregular intervals need the struct
    /// literal with an explicit `payments_per_year`.
    pub fn new(
        principal: Decimal,
        annual_rate: Decimal,
        total_periods: u32,
        payment_interval_months: u32,
        start_date: NaiveDate,
        repayment_method: RepaymentMethod,
    ) -> Result<Self> {
        if payment_interval_months == 0 {
            return Err(ValidationError::NotPositiveInteger {
                field: "payment interval months",
            }
            .into());
        }
        if MONTHS_PER_YEAR % payment_interval_months != 0 {
            return Err(ValidationError::InvalidInput(format!(
                "payment interval of {} months does not divide a year; set payments per year explicitly",
                payment_interval_months
            ))
            .into());
        }
        let params = Self {
            principal,
            annual_rate,
            total_periods,
            payments_per_year: MONTHS_PER_YEAR / payment_interval_months,
            payment_interval_months,
            start_date,
            deposit_amount: None,
            nominal_price: None,
            repayment_method,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_deposit(mut self, deposit_amount: Decimal) -> Self {
        self.deposit_amount = Some(deposit_amount);
        self
    }

    pub fn with_nominal_price(mut self, nominal_price: Decimal) -> Self {
        self.nominal_price = Some(nominal_price);
        self
    }

    /// Checks every field range. Runs before any period is computed.
    pub fn validate(&self) -> Result<()> {
        if self.principal <= Decimal::ZERO {
            return Err(ValidationError::NotPositive { field: "principal" }.into());
        }
        validate_rate("annual rate", self.annual_rate)?;
        if self.total_periods < 1 {
            return Err(ValidationError::NotPositiveInteger {
                field: "total periods",
            }
            .into());
        }
        if self.payments_per_year < 1 {
            return Err(ValidationError::NotPositiveInteger {
                field: "payments per year",
            }
            .into());
        }
        if self.payment_interval_months < 1 {
            return Err(ValidationError::NotPositiveInteger {
                field: "payment interval months",
            }
            .into());
        }
        if matches!(self.deposit_amount, Some(v) if v < Decimal::ZERO) {
            return Err(ValidationError::Negative {
                field: "deposit amount",
            }
            .into());
        }
        if matches!(self.nominal_price, Some(v) if v < Decimal::ZERO) {
            return Err(ValidationError::Negative {
                field: "nominal price",
            }
            .into());
        }

        if MONTHS_PER_YEAR % self.payment_interval_months == 0
            && self.payments_per_year != MONTHS_PER_YEAR / self.payment_interval_months
        {
            warn!(
                "payments per year {} does not match a {}-month interval; period-count interest uses {}",
                self.payments_per_year, self.payment_interval_months, self.payments_per_year
            );
        }
        Ok(())
    }
}

/// Validates a fractional annual rate in `[0, 1]`.
pub(crate) fn validate_rate(field: &'static str, rate: Decimal) -> Result<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(ValidationError::OutOfRange {
            field,
            value: rate,
            min: Decimal::ZERO,
            max: Decimal::ONE,
        }
        .into());
    }
    Ok(())
}

/// One scheduled payment interval in a finished schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    /// 1-based position in the schedule.
    pub index: u32,
    pub payment_date: NaiveDate,
    pub payment: Decimal,
    pub principal_portion: Decimal,
    pub interest_portion: Decimal,
    pub cumulative_principal: Decimal,
    pub remaining_principal_balance: Decimal,
    /// Scheduled payments not yet paid after this period.
    pub remaining_rent_balance: Decimal,
    pub cumulative_paid_rent: Decimal,
    /// Months elapsed since the previous payment.
    pub month_interval: u32,
    pub principal_ratio_percent: Option<Decimal>,
    pub applicable_rate: Option<Decimal>,
}

/// Columns of a schedule table, in the order a sink lays them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleColumn {
    Index,
    PaymentDate,
    Payment,
    PrincipalPortion,
    InterestPortion,
    CumulativePrincipal,
    RemainingPrincipalBalance,
    RemainingRentBalance,
    CumulativePaidRent,
    MonthInterval,
    PrincipalRatioPercent,
    ApplicableRate,
}

impl ScheduleColumn {
    pub const ALL: [ScheduleColumn; 12] = [
        ScheduleColumn::Index,
        ScheduleColumn::PaymentDate,
        ScheduleColumn::Payment,
        ScheduleColumn::PrincipalPortion,
        ScheduleColumn::InterestPortion,
        ScheduleColumn::CumulativePrincipal,
        ScheduleColumn::RemainingPrincipalBalance,
        ScheduleColumn::RemainingRentBalance,
        ScheduleColumn::CumulativePaidRent,
        ScheduleColumn::MonthInterval,
        ScheduleColumn::PrincipalRatioPercent,
        ScheduleColumn::ApplicableRate,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ScheduleColumn::Index => "index",
            ScheduleColumn::PaymentDate => "paymentDate",
            ScheduleColumn::Payment => "payment",
            ScheduleColumn::PrincipalPortion => "principalPortion",
            ScheduleColumn::InterestPortion => "interestPortion",
            ScheduleColumn::CumulativePrincipal => "cumulativePrincipal",
            ScheduleColumn::RemainingPrincipalBalance => "remainingPrincipalBalance",
            ScheduleColumn::RemainingRentBalance => "remainingRentBalance",
            ScheduleColumn::CumulativePaidRent => "cumulativePaidRent",
            ScheduleColumn::MonthInterval => "monthInterval",
            ScheduleColumn::PrincipalRatioPercent => "principalRatioPercent",
            ScheduleColumn::ApplicableRate => "applicableRate",
        }
    }
}

/// Content of one totals-row cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TotalsCell {
    Label(&'static str),
    Placeholder,
    Amount(Decimal),
}

/// Summary row appended after the last period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTotals {
    pub payment: Decimal,
    pub principal_portion: Decimal,
    pub interest_portion: Decimal,
    pub principal_ratio_percent: Option<Decimal>,
}

impl ScheduleTotals {
    pub fn from_periods(periods: &[Period]) -> Self {
        let mut totals = ScheduleTotals {
            payment: Decimal::ZERO,
            principal_portion: Decimal::ZERO,
            interest_portion: Decimal::ZERO,
            principal_ratio_percent: None,
        };
        for period in periods {
            totals.payment += period.payment;
            totals.principal_portion += period.principal_portion;
            totals.interest_portion += period.interest_portion;
            if let Some(ratio) = period.principal_ratio_percent {
                *totals.principal_ratio_percent.get_or_insert(Decimal::ZERO) += ratio;
            }
        }
        totals
    }

    /// The totals-row value for a column: a label for the index column,
    /// sums for amount columns and a placeholder everywhere else.
    pub fn cell(&self, column: ScheduleColumn) -> TotalsCell {
        match column {
            ScheduleColumn::Index => TotalsCell::Label(TOTAL_ROW_LABEL),
            ScheduleColumn::Payment => TotalsCell::Amount(self.payment),
            ScheduleColumn::PrincipalPortion => TotalsCell::Amount(self.principal_portion),
            ScheduleColumn::InterestPortion => TotalsCell::Amount(self.interest_portion),
            ScheduleColumn::PrincipalRatioPercent => match self.principal_ratio_percent {
                Some(ratio) => TotalsCell::Amount(ratio),
                None => TotalsCell::Placeholder,
            },
            _ => TotalsCell::Placeholder,
        }
    }
}

/// A stretch of periods computed from one base principal at one rate.
///
/// A schedule without rate adjustments has exactly one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSegment {
    pub first_period: u32,
    pub last_period: u32,
    /// Principal outstanding when the segment starts.
    pub base_principal: Decimal,
    /// Periods left in the schedule when the segment starts.
    pub base_period_count: u32,
    pub annual_rate: Decimal,
}

/// A finished repayment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub repayment_method: RepaymentMethod,
    pub periods: Vec<Period>,
    pub totals: ScheduleTotals,
    pub segments: Vec<RateSegment>,
}

impl Schedule {
    /// Looks a period up by its 1-based index.
    pub fn period(&self, index: u32) -> Option<&Period> {
        if index == 0 {
            return None;
        }
        self.periods.get(index as usize - 1)
    }

    pub fn last_period(&self) -> Option<&Period> {
        self.periods.last()
    }

    /// Indices of periods whose applicable rate differs from the previous period's.
    pub fn rate_changes(&self) -> Vec<u32> {
        self.periods
            .windows(2)
            .filter(|pair| pair[0].applicable_rate != pair[1].applicable_rate)
            .map(|pair| pair[1].index)
            .collect()
    }
}
