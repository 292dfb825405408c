//! Post-generation consistency checks.

use log::error;
use rust_decimal::Decimal;

use crate::constants::FULL_RATIO_PERCENT;
use crate::errors::{Error, Result};
use crate::schedule::schedule_model::{Period, ScheduleParameters};
use crate::utils::date_utils::add_months;
use crate::utils::decimal_utils::sum;

/// Verifies the invariants every finished schedule must satisfy.
///
/// A failure here is a defect in a strategy or the overlay, never bad input.
pub fn verify_schedule(params: &ScheduleParameters, periods: &[Period]) -> Result<()> {
    let Some(last) = periods.last() else {
        return Err(inconsistency("schedule has no periods".to_string()));
    };
    if periods.len() != params.total_periods as usize {
        return Err(inconsistency(format!(
            "expected {} periods, produced {}",
            params.total_periods,
            periods.len()
        )));
    }

    let principal = sum(periods.iter().map(|p| p.principal_portion));
    if principal != params.principal {
        return Err(inconsistency(format!(
            "principal portions sum to {}, expected {}",
            principal, params.principal
        )));
    }

    if !last.remaining_principal_balance.is_zero() {
        return Err(inconsistency(format!(
            "remaining principal after period {} is {}",
            last.index, last.remaining_principal_balance
        )));
    }

    let paid = sum(periods.iter().map(|p| p.payment));
    if last.cumulative_paid_rent != paid {
        return Err(inconsistency(format!(
            "cumulative paid rent {} differs from total payments {}",
            last.cumulative_paid_rent, paid
        )));
    }

    if params.repayment_method.uses_principal_ratio() {
        let ratio = sum(periods.iter().filter_map(|p| p.principal_ratio_percent));
        if ratio != Decimal::from(FULL_RATIO_PERCENT) {
            return Err(inconsistency(format!("principal ratios sum to {}", ratio)));
        }
    }

    let mut expected_date = params.start_date;
    for (offset, period) in periods.iter().enumerate() {
        if period.index != offset as u32 + 1 {
            return Err(inconsistency(format!(
                "period at position {} has index {}",
                offset + 1,
                period.index
            )));
        }
        expected_date = add_months(expected_date, params.payment_interval_months)?;
        if period.payment_date != expected_date {
            return Err(inconsistency(format!(
                "period {} is dated {}, expected {}",
                period.index, period.payment_date, expected_date
            )));
        }
    }

    Ok(())
}

fn inconsistency(message: String) -> Error {
    error!("schedule consistency check failed: {}", message);
    Error::ComputationInconsistency(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::schedule_model::RepaymentMethod;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn params() -> ScheduleParameters {
        ScheduleParameters::new(
            dec!(200),
            dec!(0),
            2,
            1,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            RepaymentMethod::EqualPrincipalPeriodCount,
        )
        .unwrap()
    }

    fn period(index: u32, month: u32, cumulative: Decimal) -> Period {
        Period {
            index,
            payment_date: NaiveDate::from_ymd_opt(2024, month, 15).unwrap(),
            payment: dec!(100),
            principal_portion: dec!(100),
            interest_portion: dec!(0),
            cumulative_principal: cumulative,
            remaining_principal_balance: dec!(200) - cumulative,
            remaining_rent_balance: dec!(200) - cumulative,
            cumulative_paid_rent: cumulative,
            month_interval: 1,
            principal_ratio_percent: None,
            applicable_rate: Some(dec!(0)),
        }
    }

    #[test]
    fn test_consistent_schedule_passes() {
        let periods = vec![period(1, 2, dec!(100)), period(2, 3, dec!(200))];
        assert!(verify_schedule(&params(), &periods).is_ok());
    }

    #[test]
    fn test_principal_mismatch_is_reported() {
        let mut periods = vec![period(1, 2, dec!(100)), period(2, 3, dec!(200))];
        periods[1].principal_portion = dec!(99.99);
        assert!(matches!(
            verify_schedule(&params(), &periods),
            Err(Error::ComputationInconsistency(_))
        ));
    }

    #[test]
    fn test_broken_date_progression_is_reported() {
        let periods = vec![period(1, 2, dec!(100)), period(2, 4, dec!(200))];
        let err = verify_schedule(&params(), &periods).unwrap_err();
        assert!(err.to_string().contains("period 2 is dated"));
    }
}
