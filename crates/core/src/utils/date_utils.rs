//! Calendar helpers for payment dates.

use chrono::{Months, NaiveDate};

use crate::errors::{Result, ValidationError};

/// Adds calendar months to a date, clamping to the last day of the target
/// month (Jan 31 + 1 month is Feb 28, or Feb 29 in a leap year).
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months)).ok_or_else(|| {
        ValidationError::InvalidDate(format!("{} + {} months is out of range", date, months))
            .into()
    })
}

/// Number of calendar days from `start` to `end`. Negative when `end` is earlier.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Generates `count` payment dates, each `interval_months` after the previous
/// one, starting one interval after `anchor`.
///
/// Dates are chained rather than computed from the anchor, so a month-end
/// clamp carries forward (Jan 31, Feb 28, Mar 28, ...).
pub fn payment_dates(anchor: NaiveDate, interval_months: u32, count: u32) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(count as usize);
    let mut current = anchor;
    for _ in 0..count {
        current = add_months(current, interval_months)?;
        dates.push(current);
    }
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(add_months(date(2023, 1, 31), 1).unwrap(), date(2023, 2, 28));
        assert_eq!(add_months(date(2024, 1, 31), 1).unwrap(), date(2024, 2, 29));
        assert_eq!(add_months(date(2024, 11, 15), 3).unwrap(), date(2025, 2, 15));
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(date(2024, 1, 15), date(2024, 2, 15)), 31);
        assert_eq!(days_between(date(2024, 2, 15), date(2024, 3, 15)), 29);
        assert_eq!(days_between(date(2024, 3, 15), date(2024, 2, 15)), -29);
    }

    #[test]
    fn test_payment_dates_chain_from_previous_date() {
        let dates = payment_dates(date(2024, 1, 31), 1, 3).unwrap();
        assert_eq!(dates, vec![date(2024, 2, 29), date(2024, 3, 29), date(2024, 4, 29)]);
    }

    #[test]
    fn test_payment_dates_quarterly() {
        let dates = payment_dates(date(2024, 1, 10), 3, 4).unwrap();
        assert_eq!(dates.last().copied(), Some(date(2025, 1, 10)));
    }
}
