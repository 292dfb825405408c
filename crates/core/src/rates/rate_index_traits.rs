use chrono::NaiveDate;

use crate::errors::Result;
use crate::rates::RateFixing;

/// Supplies published fixings of an interest rate index.
///
/// Implementations may fetch from a market data feed; the schedule engine
/// only sees the returned values.
pub trait RateIndexSource: Send + Sync {
    /// Identifier of the index, e.g. "LPR-1Y".
    fn index_name(&self) -> &str;

    /// Fixings dated within `from..=to`, in ascending date order.
    fn fixings(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<RateFixing>>;

    /// The latest fixing on or before `date`.
    fn fixing_on(&self, date: NaiveDate) -> Result<Option<RateFixing>>;
}
