//! Decimal rounding and summation helpers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds half away from zero, the way spreadsheet `ROUND` does.
///
/// `Decimal::round_dp` uses banker's rounding, which would drift from the
/// figures a lease document shows (0.125 must become 0.13, not 0.12).
pub fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// Sums an iterator of decimals.
pub fn sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().fold(Decimal::ZERO, |acc, v| acc + v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_half_up_midpoint() {
        assert_eq!(round_half_up(dec!(0.125), 2), dec!(0.13));
        assert_eq!(round_half_up(dec!(0.135), 2), dec!(0.14));
        assert_eq!(round_half_up(dec!(-0.125), 2), dec!(-0.13));
        assert_eq!(round_half_up(dec!(33.333333), 2), dec!(33.33));
    }

    #[test]
    fn test_sum() {
        assert_eq!(sum(vec![dec!(0.1), dec!(0.2), dec!(0.3)]), dec!(0.6));
        assert_eq!(sum(Vec::<Decimal>::new()), Decimal::ZERO);
    }
}
