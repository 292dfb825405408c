//! Equal principal repayment: a fixed principal slice plus interest on the
//! outstanding balance.

use rust_decimal::Decimal;

use crate::errors::Result;
use crate::schedule::interest::InterestConvention;
use crate::schedule::schedule_model::RepaymentMethod;
use crate::schedule::schedule_traits::{
    Installment, PeriodPhase, RepaymentStrategy, Segment, StrategyContext,
};
use crate::schedule::strategies::segment_calendar;
use crate::utils::decimal_utils::round_half_up;

/// Principal allotted to one period, with the ratio it was derived from.
pub(crate) struct Allotment {
    pub principal: Decimal,
    pub ratio: Option<Decimal>,
}

/// Builds declining-balance installments: `allot` picks each period's
/// principal, interest accrues on the balance entering the period and the
/// payment is their sum.
pub(crate) fn declining_balance_installments<F>(
    ctx: &StrategyContext<'_>,
    segment: &Segment,
    convention: InterestConvention,
    mut allot: F,
) -> Result<Vec<Installment>>
where
    F: FnMut(PeriodPhase, Decimal) -> Allotment,
{
    let params = ctx.params;
    let calendar = segment_calendar(ctx, segment)?;
    let mut rows = Vec::with_capacity(calendar.len());
    let mut repaid = Decimal::ZERO;

    for (offset, (payment_date, elapsed)) in calendar.into_iter().enumerate() {
        let position = offset as u32 + 1;
        let opening = segment.base_principal - repaid;
        let Allotment { principal, ratio } =
            allot(PeriodPhase::of(position, segment.period_count), opening);
        let interest = ctx.interest.accrue(
            convention,
            opening,
            segment.annual_rate,
            params.payments_per_year,
            elapsed,
        )?;
        repaid += principal;

        rows.push(Installment {
            index: segment.first_index + offset as u32,
            payment_date,
            month_interval: params.payment_interval_months,
            payment: principal + interest,
            principal_portion: principal,
            interest_portion: interest,
            principal_ratio_percent: ratio,
            annual_rate: segment.annual_rate,
        });
    }

    Ok(rows)
}

#[derive(Debug, Clone, Copy)]
pub struct EqualPrincipal {
    convention: InterestConvention,
}

impl EqualPrincipal {
    pub fn new(convention: InterestConvention) -> Self {
        Self { convention }
    }
}

impl RepaymentStrategy for EqualPrincipal {
    fn method(&self) -> RepaymentMethod {
        match self.convention {
            InterestConvention::DayCount => RepaymentMethod::EqualPrincipalDayCount,
            InterestConvention::PeriodCount => RepaymentMethod::EqualPrincipalPeriodCount,
        }
    }

    fn installments(&self, ctx: &StrategyContext<'_>, segment: &Segment) -> Result<Vec<Installment>> {
        let slice = round_half_up(
            segment.base_principal / Decimal::from(segment.period_count),
            ctx.amount_scale,
        );
        declining_balance_installments(ctx, segment, self.convention, |phase, opening| {
            // A slice rounded up would overdraw the balance before the end.
            let principal = match phase {
                PeriodPhase::Last => opening,
                PeriodPhase::First | PeriodPhase::Middle => slice.min(opening),
            };
            Allotment {
                principal,
                ratio: None,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::interest::InterestCalculator;
    use crate::schedule::schedule_model::ScheduleParameters;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn run(convention: InterestConvention, params: &ScheduleParameters) -> Vec<Installment> {
        let interest = InterestCalculator::default();
        let ctx = StrategyContext {
            params,
            interest: &interest,
            amount_scale: 2,
            ratio_scale: 2,
        };
        EqualPrincipal::new(convention).generate(&ctx).unwrap()
    }

    fn params(principal: Decimal, periods: u32) -> ScheduleParameters {
        ScheduleParameters::new(
            principal,
            dec!(0.06),
            periods,
            1,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            RepaymentMethod::EqualPrincipalPeriodCount,
        )
        .unwrap()
    }

    #[test]
    fn test_period_count_even_split() {
        let rows = run(InterestConvention::PeriodCount, &params(dec!(120000), 12));

        assert!(rows.iter().all(|r| r.principal_portion == dec!(10000.00)));
        assert_eq!(rows[0].interest_portion, dec!(600.00));
        assert_eq!(rows[0].payment, dec!(10600.00));
        assert_eq!(rows[11].interest_portion, dec!(50.00));
    }

    #[test]
    fn test_last_period_absorbs_rounding() {
        let rows = run(InterestConvention::PeriodCount, &params(dec!(1000), 3));

        assert_eq!(rows[0].principal_portion, dec!(333.33));
        assert_eq!(rows[1].principal_portion, dec!(333.33));
        assert_eq!(rows[2].principal_portion, dec!(333.34));
    }

    #[test]
    fn test_rounded_up_slice_never_overdraws_balance() {
        let rows = run(InterestConvention::PeriodCount, &params(dec!(1.00), 150));

        // round(1.00 / 150) = 0.01 repays everything by period 100
        assert_eq!(rows.len(), 150);
        assert_eq!(rows[99].principal_portion, dec!(0.01));
        assert!(rows[100..].iter().all(|r| r.principal_portion.is_zero()));
        assert!(rows[100..].iter().all(|r| r.interest_portion.is_zero()));

        let principal: Decimal = rows.iter().map(|r| r.principal_portion).sum();
        assert_eq!(principal, dec!(1.00));
    }

    #[test]
    fn test_day_count_uses_calendar_days() {
        let rows = run(InterestConvention::DayCount, &params(dec!(120000), 12));

        // Jan 15 -> Feb 15: 31 days on 120000 at 6%
        assert_eq!(rows[0].interest_portion, dec!(620.00));
        // Feb 15 -> Mar 15 (2024 is a leap year): 29 days on 110000
        assert_eq!(rows[1].interest_portion, dec!(531.67));
    }
}
