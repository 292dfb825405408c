//! Principal ratio repayment: each period repays a fixed percentage of the
//! segment's base principal.

use rust_decimal::Decimal;

use crate::constants::FULL_RATIO_PERCENT;
use crate::errors::Result;
use crate::schedule::interest::InterestConvention;
use crate::schedule::schedule_model::RepaymentMethod;
use crate::schedule::schedule_traits::{
    Installment, PeriodPhase, RepaymentStrategy, Segment, StrategyContext,
};
use crate::schedule::strategies::equal_principal::{declining_balance_installments, Allotment};
use crate::utils::decimal_utils::round_half_up;

#[derive(Debug, Clone, Copy)]
pub struct PrincipalRatio {
    convention: InterestConvention,
}

impl PrincipalRatio {
    pub fn new(convention: InterestConvention) -> Self {
        Self { convention }
    }
}

impl RepaymentStrategy for PrincipalRatio {
    fn method(&self) -> RepaymentMethod {
        match self.convention {
            InterestConvention::DayCount => RepaymentMethod::PrincipalRatioDayCount,
            InterestConvention::PeriodCount => RepaymentMethod::PrincipalRatioPeriodCount,
        }
    }

    fn installments(&self, ctx: &StrategyContext<'_>, segment: &Segment) -> Result<Vec<Installment>> {
        let full = Decimal::from(FULL_RATIO_PERCENT);
        let ratio = round_half_up(full / Decimal::from(segment.period_count), ctx.ratio_scale);
        let mut allotted_ratio = Decimal::ZERO;

        declining_balance_installments(ctx, segment, self.convention, |phase, opening| {
            match phase {
                // The ratio closes to 100 and the principal to the base,
                // independently: rounding may leave them a cent apart.
                PeriodPhase::Last => Allotment {
                    principal: opening,
                    ratio: Some(full - allotted_ratio),
                },
                // A ratio rounded up would pass 100 before the end; cap it
                // and the principal at what is still outstanding.
                PeriodPhase::First | PeriodPhase::Middle => {
                    let period_ratio = ratio.min(full - allotted_ratio).max(Decimal::ZERO);
                    allotted_ratio += period_ratio;
                    let principal = round_half_up(
                        segment.base_principal * period_ratio / full,
                        ctx.amount_scale,
                    );
                    Allotment {
                        principal: principal.min(opening),
                        ratio: Some(period_ratio),
                    }
                }
            }
        })
    }
}
