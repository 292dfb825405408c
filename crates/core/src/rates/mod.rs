//! Interest rate index fixings and the sources that supply them.

mod rate_index_model;
mod rate_index_traits;
mod static_index;

pub use rate_index_model::{RateFixing, RateFixingImport};
pub use rate_index_traits::RateIndexSource;
pub use static_index::StaticRateIndex;
