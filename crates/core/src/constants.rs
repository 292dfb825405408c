/// Decimal places money amounts are rounded to
pub const AMOUNT_SCALE: u32 = 2;

/// Decimal places principal ratios are rounded to
pub const RATIO_SCALE: u32 = 2;

/// Days per year under the day-count interest convention
pub const DAY_COUNT_BASIS: u32 = 360;

/// Months per year, used to derive payments per year from the interval
pub const MONTHS_PER_YEAR: u32 = 12;

/// Sum of all principal ratios in a ratio schedule
pub const FULL_RATIO_PERCENT: i64 = 100;

/// Label written in the period-index column of the totals row
pub const TOTAL_ROW_LABEL: &str = "total";

/// Placeholder for totals-row columns that have no meaningful sum
pub const TOTAL_ROW_PLACEHOLDER: &str = "-";
