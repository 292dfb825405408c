//! In-memory rate index, optionally loaded from CSV.

use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};

use crate::errors::{Error, Result};
use crate::rates::{RateFixing, RateFixingImport, RateIndexSource};

/// A fixed list of fixings held in memory, sorted by date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRateIndex {
    name: String,
    fixings: Vec<RateFixing>,
}

impl StaticRateIndex {
    /// Builds the index; a later fixing for an already-seen date replaces it.
    pub fn new(name: impl Into<String>, fixings: Vec<RateFixing>) -> Self {
        let mut ordered = fixings;
        ordered.sort_by_key(|fixing| fixing.fixing_date);
        let mut deduped: Vec<RateFixing> = Vec::with_capacity(ordered.len());
        for fixing in ordered {
            match deduped.last_mut() {
                Some(last) if last.fixing_date == fixing.fixing_date => *last = fixing,
                _ => deduped.push(fixing),
            }
        }
        Self {
            name: name.into(),
            fixings: deduped,
        }
    }

    /// Reads a headed CSV with `date` and `rate` columns.
    ///
    /// Any unparseable row fails the whole load.
    pub fn from_csv_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let name = name.into();
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut fixings = Vec::new();
        for (line, record) in csv_reader.deserialize::<RateFixingImport>().enumerate() {
            let import = record?;
            let fixing = import.parse().map_err(|err| {
                warn!("rejecting {} fixing on data row {}: {}", name, line + 1, err);
                Error::RateIndex(format!("{} row {}: {}", name, line + 1, err))
            })?;
            fixings.push(fixing);
        }
        debug!("loaded {} fixings for {}", fixings.len(), name);
        Ok(Self::new(name, fixings))
    }

    pub fn all(&self) -> &[RateFixing] {
        &self.fixings
    }
}

impl RateIndexSource for StaticRateIndex {
    fn index_name(&self) -> &str {
        &self.name
    }

    fn fixings(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<RateFixing>> {
        if from > to {
            return Err(Error::RateIndex(format!(
                "empty date range {} .. {} for {}",
                from, to, self.name
            )));
        }
        Ok(self
            .fixings
            .iter()
            .filter(|fixing| fixing.fixing_date >= from && fixing.fixing_date <= to)
            .copied()
            .collect())
    }

    fn fixing_on(&self, date: NaiveDate) -> Result<Option<RateFixing>> {
        Ok(self
            .fixings
            .iter()
            .take_while(|fixing| fixing.fixing_date <= date)
            .last()
            .copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_sorts_and_replaces_duplicates() {
        let index = StaticRateIndex::new(
            "LPR-1Y",
            vec![
                RateFixing::new(date(2024, 7, 22), dec!(0.0335)),
                RateFixing::new(date(2024, 2, 20), dec!(0.0345)),
                RateFixing::new(date(2024, 7, 22), dec!(0.0336)),
            ],
        );
        assert_eq!(index.all().len(), 2);
        assert_eq!(index.all()[0].fixing_date, date(2024, 2, 20));
        assert_eq!(index.all()[1].annual_rate, dec!(0.0336));
    }

    #[test]
    fn test_fixings_in_range_and_fixing_on() {
        let index = StaticRateIndex::new(
            "LPR-1Y",
            vec![
                RateFixing::new(date(2024, 2, 20), dec!(0.0345)),
                RateFixing::new(date(2024, 7, 22), dec!(0.0335)),
                RateFixing::new(date(2024, 10, 21), dec!(0.031)),
            ],
        );

        let in_range = index.fixings(date(2024, 3, 1), date(2024, 10, 21)).unwrap();
        assert_eq!(in_range.len(), 2);

        assert_eq!(index.fixing_on(date(2024, 1, 1)).unwrap(), None);
        assert_eq!(
            index.fixing_on(date(2024, 8, 1)).unwrap().map(|f| f.annual_rate),
            Some(dec!(0.0335))
        );
        assert!(index.fixings(date(2024, 5, 1), date(2024, 4, 1)).is_err());
    }

    #[test]
    fn test_from_csv_reader() {
        let data = "date,rate\n2024-02-20,3.45%\n2024-07-22, 0.0335\n";
        let index = StaticRateIndex::from_csv_reader("LPR-1Y", data.as_bytes()).unwrap();

        assert_eq!(index.index_name(), "LPR-1Y");
        assert_eq!(index.all()[0].annual_rate, dec!(0.0345));
        assert_eq!(index.all()[1].annual_rate, dec!(0.0335));
    }

    #[test]
    fn test_from_csv_reader_rejects_bad_row() {
        let data = "date,rate\n2024-02-20,abc\n";
        let err = StaticRateIndex::from_csv_reader("LPR-1Y", data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::RateIndex(_)));
    }
}
