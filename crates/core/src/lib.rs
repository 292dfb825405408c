//! Leasebook Core - Lease and loan amortization engine.
//!
//! This crate builds repayment schedules for leasing contracts and loans:
//! six repayment methods, day-count and period-count interest, and mid-term
//! rate adjustments. It performs no I/O of its own; finished schedules are
//! handed to a `ScheduleSink`.

pub mod cashflow;
pub mod constants;
pub mod errors;
pub mod rates;
pub mod schedule;
pub mod settings;
pub mod sink;
pub mod utils;

// Re-export the schedule entry points
pub use schedule::{
    Period, RateAdjustment, RateAdjustmentSet, RepaymentMethod, Schedule, ScheduleGenerator,
    ScheduleGeneratorTrait, ScheduleParameters, ScheduleTotals,
};
pub use settings::ScheduleSettings;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
