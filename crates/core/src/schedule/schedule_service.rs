use std::str::FromStr;

use log::debug;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::schedule::interest::InterestCalculator;
use crate::schedule::invariants::verify_schedule;
use crate::schedule::overlay::RateAdjustmentOverlay;
use crate::schedule::rate_adjustment::RateAdjustmentSet;
use crate::schedule::schedule_model::{
    Period, RateSegment, RepaymentMethod, Schedule, ScheduleParameters, ScheduleTotals,
};
use crate::schedule::schedule_traits::{
    Installment, ScheduleGeneratorTrait, Segment, StrategyContext,
};
use crate::schedule::strategies::strategy_for;
use crate::settings::ScheduleSettings;
use crate::utils::decimal_utils::sum;

/// Builds repayment schedules. Holds only conventions, so one generator can
/// serve any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct ScheduleGenerator {
    settings: ScheduleSettings,
    interest: InterestCalculator,
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        let settings = ScheduleSettings::default();
        let interest = InterestCalculator::from_settings(&settings);
        Self { settings, interest }
    }
}

impl ScheduleGenerator {
    pub fn new(settings: ScheduleSettings) -> Result<Self> {
        settings.validate()?;
        let interest = InterestCalculator::from_settings(&settings);
        Ok(Self { settings, interest })
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    fn build(
        &self,
        params: &ScheduleParameters,
        adjustments: Option<&RateAdjustmentSet>,
    ) -> Result<Schedule> {
        params.validate()?;
        if let Some(set) = adjustments {
            set.validate(params.total_periods)?;
        }

        let strategy = strategy_for(params.repayment_method);
        let ctx = StrategyContext {
            params,
            interest: &self.interest,
            amount_scale: self.settings.amount_scale,
            ratio_scale: self.settings.ratio_scale,
        };
        debug!(
            "generating {} schedule: principal {}, {} periods at {}",
            params.repayment_method, params.principal, params.total_periods, params.annual_rate
        );

        let (installments, segments) = match adjustments.filter(|set| !set.is_empty()) {
            Some(set) => RateAdjustmentOverlay::new(strategy.as_ref(), set).generate(&ctx)?,
            None => {
                let opening = Segment::opening(params);
                let segment = RateSegment {
                    first_period: 1,
                    last_period: params.total_periods,
                    base_principal: opening.base_principal,
                    base_period_count: opening.period_count,
                    annual_rate: opening.annual_rate,
                };
                (strategy.installments(&ctx, &opening)?, vec![segment])
            }
        };

        let periods = assemble_periods(params.principal, installments);
        verify_schedule(params, &periods)?;
        let totals = ScheduleTotals::from_periods(&periods);

        Ok(Schedule {
            repayment_method: params.repayment_method,
            periods,
            totals,
            segments,
        })
    }
}

impl ScheduleGeneratorTrait for ScheduleGenerator {
    fn generate(
        &self,
        params: &ScheduleParameters,
        adjustments: Option<&RateAdjustmentSet>,
    ) -> Result<Schedule> {
        self.build(params, adjustments)
    }

    fn generate_for_method(
        &self,
        params: &ScheduleParameters,
        method: &str,
        adjustments: Option<&RateAdjustmentSet>,
    ) -> Result<Schedule> {
        let method = RepaymentMethod::from_str(method)?;
        let params = ScheduleParameters {
            repayment_method: method,
            ..params.clone()
        };
        self.build(&params, adjustments)
    }
}

/// Second pass: derives running balances once every payment is known.
///
/// The remaining rent balance needs the total of all payments, which a
/// variable-payment schedule only has after the first pass.
fn assemble_periods(principal: Decimal, installments: Vec<Installment>) -> Vec<Period> {
    let scheduled_rent = sum(installments.iter().map(|row| row.payment));
    let mut cumulative_principal = Decimal::ZERO;
    let mut cumulative_paid_rent = Decimal::ZERO;

    installments
        .into_iter()
        .map(|row| {
            cumulative_principal += row.principal_portion;
            cumulative_paid_rent += row.payment;
            Period {
                index: row.index,
                payment_date: row.payment_date,
                payment: row.payment,
                principal_portion: row.principal_portion,
                interest_portion: row.interest_portion,
                cumulative_principal,
                remaining_principal_balance: principal - cumulative_principal,
                remaining_rent_balance: scheduled_rent - cumulative_paid_rent,
                cumulative_paid_rent,
                month_interval: row.month_interval,
                principal_ratio_percent: row.principal_ratio_percent,
                applicable_rate: Some(row.annual_rate),
            }
        })
        .collect()
}
