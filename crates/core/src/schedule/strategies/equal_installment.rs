//! Annuity repayment: a constant installment split into interest and principal.

use rust_decimal::{Decimal, MathematicalOps};

use crate::errors::{Result, ValidationError};
use crate::schedule::schedule_model::RepaymentMethod;
use crate::schedule::schedule_traits::{
    Installment, PeriodPhase, RepaymentStrategy, Segment, StrategyContext,
};
use crate::schedule::strategies::segment_calendar;
use crate::utils::decimal_utils::round_half_up;

/// When in its period an installment falls due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentTiming {
    /// End of the period (post-paid).
    Arrears,
    /// Start of the period (prepaid). The opening period accrues day-count
    /// interest from the start date to the first payment date.
    Advance,
}

#[derive(Debug, Clone, Copy)]
pub struct EqualInstallment {
    timing: PaymentTiming,
}

impl EqualInstallment {
    pub fn new(timing: PaymentTiming) -> Self {
        Self { timing }
    }

    /// Constant installment amortizing `base` over `count` periods at
    /// `periodic_rate`: `base * i / (1 - (1 + i)^-count)`. A zero rate splits
    /// `base` evenly.
    pub fn installment_amount(
        base: Decimal,
        periodic_rate: Decimal,
        count: u32,
        scale: u32,
    ) -> Result<Decimal> {
        if count == 0 {
            return Err(ValidationError::NotPositiveInteger {
                field: "total periods",
            }
            .into());
        }
        if periodic_rate.is_zero() {
            return Ok(round_half_up(base / Decimal::from(count), scale));
        }

        let growth = (Decimal::ONE + periodic_rate)
            .checked_powu(u64::from(count))
            .ok_or_else(|| {
                ValidationError::InvalidInput(format!(
                    "annuity factor overflows for {} periods at periodic rate {}",
                    count, periodic_rate
                ))
            })?;
        let amount = base * periodic_rate * growth / (growth - Decimal::ONE);
        Ok(round_half_up(amount, scale))
    }
}

impl RepaymentStrategy for EqualInstallment {
    fn method(&self) -> RepaymentMethod {
        match self.timing {
            PaymentTiming::Arrears => RepaymentMethod::EqualInstallment,
            PaymentTiming::Advance => RepaymentMethod::EqualInstallmentPrepaid,
        }
    }

    fn installments(&self, ctx: &StrategyContext<'_>, segment: &Segment) -> Result<Vec<Installment>> {
        let params = ctx.params;
        let periodic_rate = segment.annual_rate / Decimal::from(params.payments_per_year);
        // Only the schedule's opening period is prepaid; a re-based segment
        // starts with interest already running.
        let day_count_opening = self.timing == PaymentTiming::Advance && segment.is_opening();
        let payment = Self::installment_amount(
            segment.base_principal,
            periodic_rate,
            segment.period_count,
            ctx.amount_scale,
        )?;

        let calendar = segment_calendar(ctx, segment)?;
        let mut rows = Vec::with_capacity(calendar.len());
        let mut repaid = Decimal::ZERO;

        for (offset, (payment_date, elapsed)) in calendar.into_iter().enumerate() {
            let position = offset as u32 + 1;
            let opening = segment.base_principal - repaid;

            let interest = if day_count_opening && position == 1 {
                ctx.interest.day_count(opening, segment.annual_rate, elapsed)?
            } else {
                ctx.interest
                    .period_count(opening, segment.annual_rate, params.payments_per_year)?
            };

            let (principal_portion, amount) = match PeriodPhase::of(position, segment.period_count) {
                PeriodPhase::Last => (opening, opening + interest),
                // An installment rounded up can outrun a small balance; stop
                // at zero and leave the residual to the last period.
                PeriodPhase::First | PeriodPhase::Middle if payment - interest > opening => {
                    (opening, opening + interest)
                }
                PeriodPhase::First | PeriodPhase::Middle => (payment - interest, payment),
            };
            repaid += principal_portion;

            rows.push(Installment {
                index: segment.first_index + offset as u32,
                payment_date,
                month_interval: params.payment_interval_months,
                payment: amount,
                principal_portion,
                interest_portion: interest,
                principal_ratio_percent: None,
                annual_rate: segment.annual_rate,
            });
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::interest::InterestCalculator;
    use crate::schedule::schedule_model::ScheduleParameters;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn params(method: RepaymentMethod) -> ScheduleParameters {
        ScheduleParameters::new(
            dec!(120000),
            dec!(0.06),
            12,
            1,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            method,
        )
        .unwrap()
    }

    fn run(strategy: EqualInstallment, params: &ScheduleParameters) -> Vec<Installment> {
        let interest = InterestCalculator::default();
        let ctx = StrategyContext {
            params,
            interest: &interest,
            amount_scale: 2,
            ratio_scale: 2,
        };
        strategy.generate(&ctx).unwrap()
    }

    #[test]
    fn test_installment_amount() {
        let amount =
            EqualInstallment::installment_amount(dec!(120000), dec!(0.005), 12, 2).unwrap();
        assert_eq!(amount, dec!(10327.97));
    }

    #[test]
    fn test_installment_amount_zero_rate() {
        let amount =
            EqualInstallment::installment_amount(dec!(1000), Decimal::ZERO, 3, 2).unwrap();
        assert_eq!(amount, dec!(333.33));
    }

    #[test]
    fn test_arrears_schedule() {
        let params = params(RepaymentMethod::EqualInstallment);
        let rows = run(EqualInstallment::new(PaymentTiming::Arrears), &params);

        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].interest_portion, dec!(600.00));
        assert_eq!(rows[0].principal_portion, dec!(9727.97));
        assert!(rows[..11].iter().all(|r| r.payment == dec!(10327.97)));

        let principal: Decimal = rows.iter().map(|r| r.principal_portion).sum();
        assert_eq!(principal, dec!(120000));
        assert_eq!(rows[11].principal_portion, dec!(10276.61));
        assert_eq!(rows[11].payment, dec!(10327.99));
    }

    #[test]
    fn test_advance_schedule_first_period_accrues_day_count() {
        let params = params(RepaymentMethod::EqualInstallmentPrepaid);
        let rows = run(EqualInstallment::new(PaymentTiming::Advance), &params);

        // Jan 15 -> Feb 15: 31 days on 120000 at 6% over 360
        assert_eq!(
            rows[0].payment_date,
            NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
        );
        assert_eq!(rows[0].interest_portion, dec!(620.00));
        assert_eq!(rows[0].payment, dec!(10327.97));
        assert_eq!(rows[0].principal_portion, dec!(9707.97));
        // 110292.03 * 0.005
        assert_eq!(rows[1].interest_portion, dec!(551.46));
        assert_eq!(rows[1].payment, dec!(10327.97));

        let principal: Decimal = rows.iter().map(|r| r.principal_portion).sum();
        assert_eq!(principal, dec!(120000));
    }

    #[test]
    fn test_rounded_up_installment_stops_at_zero_balance() {
        let mut params = params(RepaymentMethod::EqualInstallment);
        params.principal = dec!(1.00);
        params.annual_rate = Decimal::ZERO;
        params.total_periods = 150;
        let rows = run(EqualInstallment::new(PaymentTiming::Arrears), &params);

        // round(1.00 / 150) = 0.01 repays everything by period 100
        assert_eq!(rows[99].principal_portion, dec!(0.01));
        assert_eq!(rows[100].principal_portion, Decimal::ZERO);
        assert_eq!(rows[100].payment, Decimal::ZERO);
        assert_eq!(rows[149].principal_portion, Decimal::ZERO);

        let principal: Decimal = rows.iter().map(|r| r.principal_portion).sum();
        assert_eq!(principal, dec!(1.00));
    }

    #[test]
    fn test_single_period_pays_everything() {
        let mut params = params(RepaymentMethod::EqualInstallment);
        params.total_periods = 1;
        let rows = run(EqualInstallment::new(PaymentTiming::Arrears), &params);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].principal_portion, dec!(120000));
        assert_eq!(rows[0].interest_portion, dec!(600.00));
        assert_eq!(rows[0].payment, dec!(120600.00));
    }
}
