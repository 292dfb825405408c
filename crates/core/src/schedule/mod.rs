//! Schedule module - repayment methods, rate adjustments and the generator.

pub mod interest;
pub mod invariants;
pub mod overlay;
pub mod rate_adjustment;
pub mod schedule_model;
pub mod schedule_service;
pub mod schedule_traits;
pub mod strategies;


pub use interest::{InterestCalculator, InterestConvention};
pub use overlay::RateAdjustmentOverlay;
pub use rate_adjustment::{RateAdjustment, RateAdjustmentSet};
pub use schedule_model::{
    Period, RateSegment, RepaymentMethod, Schedule, ScheduleColumn, ScheduleParameters,
    ScheduleTotals, TotalsCell,
};
pub use schedule_service::ScheduleGenerator;
pub use schedule_traits::{
    Installment, PeriodPhase, RepaymentStrategy, ScheduleGeneratorTrait, Segment, StrategyContext,
};
