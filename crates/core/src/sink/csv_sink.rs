//! CSV rendition of a schedule: a header, one row per period, a totals row.

use std::io::Write;

use csv::{Writer, WriterBuilder};

use crate::constants::TOTAL_ROW_PLACEHOLDER;
use crate::errors::{Error, Result};
use crate::schedule::{Period, Schedule, ScheduleColumn, TotalsCell};
use crate::sink::ScheduleSink;

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CsvScheduleSink<W: Write> {
    writer: Writer<W>,
    date_format: String,
}

impl<W: Write> CsvScheduleSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: WriterBuilder::new().has_headers(false).from_writer(inner),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Uses a chrono format string for the payment date column.
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| Error::Sink(err.error().to_string()))
    }

    fn period_cell(&self, period: &Period, column: ScheduleColumn) -> String {
        match column {
            ScheduleColumn::Index => period.index.to_string(),
            ScheduleColumn::PaymentDate => period.payment_date.format(&self.date_format).to_string(),
            ScheduleColumn::Payment => period.payment.to_string(),
            ScheduleColumn::PrincipalPortion => period.principal_portion.to_string(),
            ScheduleColumn::InterestPortion => period.interest_portion.to_string(),
            ScheduleColumn::CumulativePrincipal => period.cumulative_principal.to_string(),
            ScheduleColumn::RemainingPrincipalBalance => {
                period.remaining_principal_balance.to_string()
            }
            ScheduleColumn::RemainingRentBalance => period.remaining_rent_balance.to_string(),
            ScheduleColumn::CumulativePaidRent => period.cumulative_paid_rent.to_string(),
            ScheduleColumn::MonthInterval => period.month_interval.to_string(),
            ScheduleColumn::PrincipalRatioPercent => period
                .principal_ratio_percent
                .map(|ratio| ratio.to_string())
                .unwrap_or_default(),
            ScheduleColumn::ApplicableRate => period
                .applicable_rate
                .map(|rate| rate.to_string())
                .unwrap_or_default(),
        }
    }
}

impl<W: Write> ScheduleSink for CsvScheduleSink<W> {
    fn write_schedule(&mut self, schedule: &Schedule) -> Result<()> {
        self.writer
            .write_record(ScheduleColumn::ALL.iter().map(|column| column.key()))?;

        for period in &schedule.periods {
            let row: Vec<String> = ScheduleColumn::ALL
                .iter()
                .map(|&column| self.period_cell(period, column))
                .collect();
            self.writer.write_record(&row)?;
        }

        let totals: Vec<String> = ScheduleColumn::ALL
            .iter()
            .map(|&column| match schedule.totals.cell(column) {
                TotalsCell::Label(label) => label.to_string(),
                TotalsCell::Placeholder => TOTAL_ROW_PLACEHOLDER.to_string(),
                TotalsCell::Amount(amount) => amount.to_string(),
            })
            .collect();
        self.writer.write_record(&totals)?;
        self.writer.flush()?;
        Ok(())
    }
}
