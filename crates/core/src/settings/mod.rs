//! Engine settings - rounding and accrual conventions.

mod settings_model;

pub use settings_model::ScheduleSettings;
