//! Period-indexed interest rate overrides.

use std::collections::BTreeMap;

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::rates::{RateFixing, RateIndexSource};
use crate::schedule::schedule_model::{validate_rate, ScheduleParameters};
use crate::utils::date_utils::payment_dates;

/// A new annual rate taking effect from a given period onwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateAdjustment {
    pub effective_from_period: u32,
    pub new_annual_rate: Decimal,
}

/// Ordered adjustments, at most one per period.
///
/// Serializes as a list of [`RateAdjustment`] sorted by period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RateAdjustment>", into = "Vec<RateAdjustment>")]
pub struct RateAdjustmentSet {
    entries: BTreeMap<u32, Decimal>,
}

impl RateAdjustmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an adjustment; a later insert for the same period overwrites.
    pub fn insert(&mut self, effective_from_period: u32, new_annual_rate: Decimal) {
        self.entries.insert(effective_from_period, new_annual_rate);
    }

    pub fn with(mut self, effective_from_period: u32, new_annual_rate: Decimal) -> Self {
        self.insert(effective_from_period, new_annual_rate);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Adjustments in ascending period order.
    pub fn iter(&self) -> impl Iterator<Item = RateAdjustment> + '_ {
        self.entries
            .iter()
            .map(|(&effective_from_period, &new_annual_rate)| RateAdjustment {
                effective_from_period,
                new_annual_rate,
            })
    }

    /// Periods at which a new rate takes effect, ascending.
    pub fn periods(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    /// Rate in force for `period`: the latest adjustment at or before it,
    /// else `base_rate`.
    pub fn rate_for_period(&self, period: u32, base_rate: Decimal) -> Decimal {
        self.entries
            .range(..=period)
            .next_back()
            .map(|(_, &rate)| rate)
            .unwrap_or(base_rate)
    }

    /// Rejects periods outside `1..=total_periods` and rates outside `[0, 1]`.
    pub fn validate(&self, total_periods: u32) -> Result<()> {
        for adjustment in self.iter() {
            let period = adjustment.effective_from_period;
            if period < 1 || period > total_periods {
                return Err(ValidationError::AdjustmentOutOfRange {
                    period,
                    total_periods,
                }
                .into());
            }
            validate_rate("adjusted annual rate", adjustment.new_annual_rate)?;
        }
        Ok(())
    }

    /// Maps published index fixings onto schedule periods.
    ///
    /// A fixing takes effect from the first period whose payment date falls
    /// strictly after the fixing date. Fixings before the start date, after
    /// the last payment, or equal to the rate already in force are skipped.
    pub fn from_fixings(params: &ScheduleParameters, fixings: &[RateFixing]) -> Result<Self> {
        let dates = payment_dates(
            params.start_date,
            params.payment_interval_months,
            params.total_periods,
        )?;
        let mut ordered: Vec<&RateFixing> = fixings.iter().collect();
        ordered.sort_by_key(|fixing| fixing.fixing_date);

        let mut set = RateAdjustmentSet::new();
        for fixing in ordered {
            validate_rate("index rate", fixing.annual_rate)?;
            if fixing.fixing_date < params.start_date {
                continue;
            }
            let Some(position) = dates.iter().position(|date| *date > fixing.fixing_date) else {
                continue;
            };
            let period = position as u32 + 1;
            if set.rate_for_period(period, params.annual_rate) == fixing.annual_rate {
                continue;
            }
            debug!(
                "index fixing {} on {} takes effect from period {}",
                fixing.annual_rate, fixing.fixing_date, period
            );
            set.insert(period, fixing.annual_rate);
        }
        Ok(set)
    }

    /// Fetches fixings covering the schedule's term from `source` and maps
    /// them with [`RateAdjustmentSet::from_fixings`].
    pub fn from_index(params: &ScheduleParameters, source: &dyn RateIndexSource) -> Result<Self> {
        let dates = payment_dates(
            params.start_date,
            params.payment_interval_months,
            params.total_periods,
        )?;
        let last_date = dates.last().copied().unwrap_or(params.start_date);
        let fixings = source.fixings(params.start_date, last_date)?;
        Self::from_fixings(params, &fixings)
    }
}

impl From<Vec<RateAdjustment>> for RateAdjustmentSet {
    fn from(adjustments: Vec<RateAdjustment>) -> Self {
        let mut set = RateAdjustmentSet::new();
        for adjustment in adjustments {
            set.insert(adjustment.effective_from_period, adjustment.new_annual_rate);
        }
        set
    }
}

impl From<RateAdjustmentSet> for Vec<RateAdjustment> {
    fn from(set: RateAdjustmentSet) -> Self {
        set.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::rates::StaticRateIndex;
    use crate::schedule::schedule_model::RepaymentMethod;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn params() -> ScheduleParameters {
        ScheduleParameters::new(
            dec!(120000),
            dec!(0.05),
            12,
            1,
            date(2024, 1, 15),
            RepaymentMethod::EqualPrincipalPeriodCount,
        )
        .unwrap()
    }

    #[test]
    fn test_rate_lookup_uses_latest_adjustment() {
        let set = RateAdjustmentSet::new().with(7, dec!(0.048)).with(10, dec!(0.045));

        assert_eq!(set.rate_for_period(1, dec!(0.05)), dec!(0.05));
        assert_eq!(set.rate_for_period(6, dec!(0.05)), dec!(0.05));
        assert_eq!(set.rate_for_period(7, dec!(0.05)), dec!(0.048));
        assert_eq!(set.rate_for_period(9, dec!(0.05)), dec!(0.048));
        assert_eq!(set.rate_for_period(12, dec!(0.05)), dec!(0.045));
    }

    #[test]
    fn test_insert_overwrites_and_keeps_order() {
        let mut set = RateAdjustmentSet::new();
        set.insert(9, dec!(0.04));
        set.insert(3, dec!(0.03));
        set.insert(9, dec!(0.045));

        let periods: Vec<u32> = set.periods().collect();
        assert_eq!(periods, vec![3, 9]);
        assert_eq!(set.rate_for_period(9, dec!(0.05)), dec!(0.045));
    }

    #[test]
    fn test_validate_rejects_out_of_range_period() {
        let set = RateAdjustmentSet::new().with(13, dec!(0.04));
        assert!(matches!(
            set.validate(12),
            Err(Error::InvalidArgument(ValidationError::AdjustmentOutOfRange {
                period: 13,
                total_periods: 12
            }))
        ));
        let set = RateAdjustmentSet::new().with(0, dec!(0.04));
        assert!(set.validate(12).is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_rate() {
        let set = RateAdjustmentSet::new().with(4, dec!(1.2));
        assert!(matches!(
            set.validate(12),
            Err(Error::InvalidArgument(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_serializes_as_sorted_list() {
        let set = RateAdjustmentSet::new().with(7, dec!(0.048)).with(2, dec!(0.05));
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json[0]["effectiveFromPeriod"], 2);
        assert_eq!(json[1]["effectiveFromPeriod"], 7);

        let back: RateAdjustmentSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_from_fixings_maps_dates_to_periods() {
        let fixings = vec![
            RateFixing::new(date(2024, 7, 20), dec!(0.048)),
            // Before the start date
            RateFixing::new(date(2023, 12, 20), dec!(0.07)),
            // Same rate as in force
            RateFixing::new(date(2024, 8, 20), dec!(0.048)),
            // Exactly on a payment date: applies from the next one
            RateFixing::new(date(2024, 10, 15), dec!(0.045)),
            // After the last payment
            RateFixing::new(date(2025, 3, 1), dec!(0.04)),
        ];
        let set = RateAdjustmentSet::from_fixings(&params(), &fixings).unwrap();
        let adjustments: Vec<RateAdjustment> = set.iter().collect();

        // Payment dates run 2024-02-15 .. 2025-01-15
        assert_eq!(
            adjustments,
            vec![
                RateAdjustment {
                    effective_from_period: 7,
                    new_annual_rate: dec!(0.048)
                },
                RateAdjustment {
                    effective_from_period: 10,
                    new_annual_rate: dec!(0.045)
                },
            ]
        );
    }

    #[test]
    fn test_from_index_queries_schedule_term() {
        let index = StaticRateIndex::new(
            "LPR-1Y",
            vec![
                RateFixing::new(date(2023, 12, 20), dec!(0.0345)),
                RateFixing::new(date(2024, 2, 20), dec!(0.0345)),
                RateFixing::new(date(2024, 7, 22), dec!(0.0335)),
            ],
        );
        let mut params = params();
        params.annual_rate = dec!(0.0345);

        let set = RateAdjustmentSet::from_index(&params, &index).unwrap();
        let adjustments: Vec<RateAdjustment> = set.iter().collect();
        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].effective_from_period, 7);
        assert_eq!(adjustments[0].new_annual_rate, dec!(0.0335));
    }
}
