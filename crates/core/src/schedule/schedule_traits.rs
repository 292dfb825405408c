//! Strategy seam shared by every repayment method.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::schedule::interest::InterestCalculator;
use crate::schedule::rate_adjustment::RateAdjustmentSet;
use crate::schedule::schedule_model::{RepaymentMethod, Schedule, ScheduleParameters};

/// Everything a strategy reads besides the segment itself.
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    pub params: &'a ScheduleParameters,
    pub interest: &'a InterestCalculator,
    pub amount_scale: u32,
    pub ratio_scale: u32,
}

/// The stretch of schedule a strategy is asked to derive.
///
/// A segment always runs to the end of the schedule; callers that only need
/// a prefix truncate the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Global index of the segment's first period.
    pub first_index: u32,
    /// Principal outstanding when the segment starts.
    pub base_principal: Decimal,
    /// Periods from `first_index` through the end of the schedule.
    pub period_count: u32,
    pub annual_rate: Decimal,
    /// Start date for the first segment, else the previous payment date.
    pub anchor_date: NaiveDate,
}

impl Segment {
    /// The whole schedule as a single segment at the base rate.
    pub fn opening(params: &ScheduleParameters) -> Self {
        Self {
            first_index: 1,
            base_principal: params.principal,
            period_count: params.total_periods,
            annual_rate: params.annual_rate,
            anchor_date: params.start_date,
        }
    }

    /// Whether the segment starts at the very first period of the schedule.
    pub fn is_opening(&self) -> bool {
        self.first_index == 1
    }
}

/// Pass-one output: what a strategy decides per period.
///
/// Running balances are derived afterwards, once every payment is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installment {
    pub index: u32,
    pub payment_date: NaiveDate,
    pub month_interval: u32,
    pub payment: Decimal,
    pub principal_portion: Decimal,
    pub interest_portion: Decimal,
    pub principal_ratio_percent: Option<Decimal>,
    pub annual_rate: Decimal,
}

/// Position of a period within its segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodPhase {
    First,
    Middle,
    /// Absorbs the rounding residual. A one-period segment is only `Last`.
    Last,
}

impl PeriodPhase {
    /// Phase of the 1-based `position` in a segment of `count` periods.
    pub fn of(position: u32, count: u32) -> Self {
        if position == count {
            PeriodPhase::Last
        } else if position == 1 {
            PeriodPhase::First
        } else {
            PeriodPhase::Middle
        }
    }
}

/// A repayment method: turns a segment into per-period installments.
pub trait RepaymentStrategy: Send + Sync {
    fn method(&self) -> RepaymentMethod;

    /// Derives every period of `segment`, in increasing index order.
    fn installments(&self, ctx: &StrategyContext<'_>, segment: &Segment) -> Result<Vec<Installment>>;

    /// Derives the full schedule at the base rate.
    fn generate(&self, ctx: &StrategyContext<'_>) -> Result<Vec<Installment>> {
        self.installments(ctx, &Segment::opening(ctx.params))
    }
}

/// Entry point external callers use to build schedules.
pub trait ScheduleGeneratorTrait: Send + Sync {
    /// Validates the inputs, then builds the schedule for
    /// `params.repayment_method`, re-basing at every adjustment.
    fn generate(
        &self,
        params: &ScheduleParameters,
        adjustments: Option<&RateAdjustmentSet>,
    ) -> Result<Schedule>;

    /// Like [`ScheduleGeneratorTrait::generate`], with the method given as an
    /// identifier overriding `params.repayment_method`.
    fn generate_for_method(
        &self,
        params: &ScheduleParameters,
        method: &str,
        adjustments: Option<&RateAdjustmentSet>,
    ) -> Result<Schedule>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_phase() {
        assert_eq!(PeriodPhase::of(1, 12), PeriodPhase::First);
        assert_eq!(PeriodPhase::of(6, 12), PeriodPhase::Middle);
        assert_eq!(PeriodPhase::of(12, 12), PeriodPhase::Last);
        assert_eq!(PeriodPhase::of(1, 1), PeriodPhase::Last);
    }
}
