//! Re-bases a repayment strategy at each scheduled rate change.

use log::debug;
use rust_decimal::Decimal;

use crate::constants::FULL_RATIO_PERCENT;
use crate::errors::Result;
use crate::schedule::rate_adjustment::RateAdjustmentSet;
use crate::schedule::schedule_model::RateSegment;
use crate::schedule::schedule_traits::{Installment, RepaymentStrategy, Segment, StrategyContext};
use crate::utils::decimal_utils::{round_half_up, sum};

/// Wraps a strategy so that every rate adjustment restarts it from the
/// balance outstanding at that point.
pub struct RateAdjustmentOverlay<'a> {
    strategy: &'a dyn RepaymentStrategy,
    adjustments: &'a RateAdjustmentSet,
}

impl<'a> RateAdjustmentOverlay<'a> {
    pub fn new(strategy: &'a dyn RepaymentStrategy, adjustments: &'a RateAdjustmentSet) -> Self {
        Self {
            strategy,
            adjustments,
        }
    }

    /// First period of every segment: 1 plus each adjustment period.
    fn segment_starts(&self) -> Vec<u32> {
        let mut starts = vec![1];
        starts.extend(self.adjustments.periods().filter(|&period| period > 1));
        starts
    }

    /// Runs the wrapped strategy segment by segment and stitches the results.
    ///
    /// Returns the installments together with the segments they came from.
    pub fn generate(
        &self,
        ctx: &StrategyContext<'_>,
    ) -> Result<(Vec<Installment>, Vec<RateSegment>)> {
        let params = ctx.params;
        let starts = self.segment_starts();
        let mut rows: Vec<Installment> = Vec::with_capacity(params.total_periods as usize);
        let mut segments = Vec::with_capacity(starts.len());
        let mut balance = params.principal;
        let mut anchor_date = params.start_date;

        for (position, &first_index) in starts.iter().enumerate() {
            let last_index = starts
                .get(position + 1)
                .map(|next| next - 1)
                .unwrap_or(params.total_periods);
            let segment = Segment {
                first_index,
                base_principal: balance,
                period_count: params.total_periods - (first_index - 1),
                annual_rate: self
                    .adjustments
                    .rate_for_period(first_index, params.annual_rate),
                anchor_date,
            };
            debug!(
                "{}: periods {}..={} re-based on {} at rate {}",
                self.strategy.method(),
                first_index,
                last_index,
                segment.base_principal,
                segment.annual_rate
            );

            let mut segment_rows = self.strategy.installments(ctx, &segment)?;
            segment_rows.truncate((last_index - first_index + 1) as usize);
            restate_ratios(&mut segment_rows, balance, params.principal, ctx.ratio_scale);

            balance -= sum(segment_rows.iter().map(|row| row.principal_portion));
            if let Some(last) = segment_rows.last() {
                anchor_date = last.payment_date;
            }
            segments.push(RateSegment {
                first_period: first_index,
                last_period: last_index,
                base_principal: segment.base_principal,
                base_period_count: segment.period_count,
                annual_rate: segment.annual_rate,
            });
            rows.extend(segment_rows);
        }

        for (offset, row) in rows.iter_mut().enumerate() {
            row.index = offset as u32 + 1;
        }
        close_schedule(&mut rows, params.principal);

        Ok((rows, segments))
    }
}

/// Expresses segment-relative ratios as shares of the original principal.
fn restate_ratios(rows: &mut [Installment], base: Decimal, principal: Decimal, scale: u32) {
    if base == principal {
        return;
    }
    for row in rows.iter_mut() {
        if let Some(ratio) = row.principal_ratio_percent {
            row.principal_ratio_percent = Some(round_half_up(ratio * base / principal, scale));
        }
    }
}

/// Forces the schedule's final period to close principal to `principal`
/// and any ratio to 100. Interest is left as computed.
pub(crate) fn close_schedule(rows: &mut [Installment], principal: Decimal) {
    let Some((last, earlier)) = rows.split_last_mut() else {
        return;
    };
    let earlier_principal = sum(earlier.iter().map(|row| row.principal_portion));
    last.principal_portion = principal - earlier_principal;
    last.payment = last.principal_portion + last.interest_portion;

    if last.principal_ratio_percent.is_some() {
        let earlier_ratio = sum(earlier.iter().filter_map(|row| row.principal_ratio_percent));
        last.principal_ratio_percent = Some(Decimal::from(FULL_RATIO_PERCENT) - earlier_ratio);
    }
}
