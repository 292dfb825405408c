//! Cash-flow report models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashFlowKind {
    DepositReceived,
    Installment,
    NominalPrice,
    /// Deposit applied against the closing amounts.
    DepositOffset,
}

/// One dated movement. Positive amounts are received, negative are returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowEntry {
    pub date: NaiveDate,
    pub kind: CashFlowKind,
    pub period_index: Option<u32>,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowReport {
    pub entries: Vec<CashFlowEntry>,
    pub total_installments: Decimal,
    pub gross_inflow: Decimal,
    pub deposit_offset: Decimal,
    pub net_amount: Decimal,
}

impl CashFlowReport {
    pub fn new() -> Self {
        CashFlowReport {
            entries: Vec::new(),
            total_installments: Decimal::ZERO,
            gross_inflow: Decimal::ZERO,
            deposit_offset: Decimal::ZERO,
            net_amount: Decimal::ZERO,
        }
    }

    pub fn add_entry(&mut self, entry: CashFlowEntry) {
        match entry.kind {
            CashFlowKind::Installment => {
                self.total_installments += entry.amount;
                self.gross_inflow += entry.amount;
            }
            CashFlowKind::DepositReceived | CashFlowKind::NominalPrice => {
                self.gross_inflow += entry.amount;
            }
            CashFlowKind::DepositOffset => {
                self.deposit_offset += entry.amount;
            }
        }
        self.net_amount += entry.amount;
        self.entries.push(entry);
    }

    /// Entries of one kind, in report order.
    pub fn entries_of(&self, kind: CashFlowKind) -> impl Iterator<Item = &CashFlowEntry> {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }
}

impl Default for CashFlowReport {
    fn default() -> Self {
        Self::new()
    }
}
