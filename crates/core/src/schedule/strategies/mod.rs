//! The six repayment methods.

mod equal_installment;
mod equal_principal;
mod principal_ratio;

pub use equal_installment::{EqualInstallment, PaymentTiming};
pub use equal_principal::EqualPrincipal;
pub use principal_ratio::PrincipalRatio;

use chrono::NaiveDate;

use crate::errors::Result;
use crate::schedule::schedule_model::RepaymentMethod;
use crate::schedule::schedule_traits::{RepaymentStrategy, Segment, StrategyContext};
use crate::utils::date_utils::{days_between, payment_dates};

/// Picks the strategy implementing `method`.
pub fn strategy_for(method: RepaymentMethod) -> Box<dyn RepaymentStrategy> {
    match method {
        RepaymentMethod::EqualInstallment => Box::new(EqualInstallment::new(PaymentTiming::Arrears)),
        RepaymentMethod::EqualInstallmentPrepaid => {
            Box::new(EqualInstallment::new(PaymentTiming::Advance))
        }
        RepaymentMethod::EqualPrincipalDayCount | RepaymentMethod::EqualPrincipalPeriodCount => {
            Box::new(EqualPrincipal::new(method.interest_convention()))
        }
        RepaymentMethod::PrincipalRatioDayCount | RepaymentMethod::PrincipalRatioPeriodCount => {
            Box::new(PrincipalRatio::new(method.interest_convention()))
        }
    }
}

/// Payment date of each period in the segment, with the calendar days
/// elapsed since the previous payment (or the anchor, for the first one).
pub(crate) fn segment_calendar(
    ctx: &StrategyContext<'_>,
    segment: &Segment,
) -> Result<Vec<(NaiveDate, i64)>> {
    let dates = payment_dates(
        segment.anchor_date,
        ctx.params.payment_interval_months,
        segment.period_count,
    )?;
    let mut previous = segment.anchor_date;
    Ok(dates
        .into_iter()
        .map(|date| {
            let elapsed = days_between(previous, date);
            previous = date;
            (date, elapsed)
        })
        .collect())
}
