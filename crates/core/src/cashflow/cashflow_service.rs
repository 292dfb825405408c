//! Builds the cash-flow report from a finished schedule.

use log::debug;

use crate::cashflow::{CashFlowEntry, CashFlowKind, CashFlowReport};
use crate::errors::{Error, Result};
use crate::schedule::{Schedule, ScheduleParameters};

/// Lays a schedule out as dated cash flows: the deposit on the start date,
/// each installment on its payment date, then the nominal price and the
/// deposit offset on the last payment date.
///
/// Absent or zero deposit and nominal price produce no entry.
pub fn build_cash_flow_report(
    params: &ScheduleParameters,
    schedule: &Schedule,
) -> Result<CashFlowReport> {
    let last = schedule.last_period().ok_or_else(|| {
        Error::ComputationInconsistency("cannot report cash flows of an empty schedule".to_string())
    })?;
    let deposit = params.deposit_amount.filter(|amount| !amount.is_zero());
    let nominal_price = params.nominal_price.filter(|amount| !amount.is_zero());

    let mut report = CashFlowReport::new();
    if let Some(amount) = deposit {
        report.add_entry(CashFlowEntry {
            date: params.start_date,
            kind: CashFlowKind::DepositReceived,
            period_index: None,
            amount,
        });
    }

    for period in &schedule.periods {
        report.add_entry(CashFlowEntry {
            date: period.payment_date,
            kind: CashFlowKind::Installment,
            period_index: Some(period.index),
            amount: period.payment,
        });
    }

    if let Some(amount) = nominal_price {
        report.add_entry(CashFlowEntry {
            date: last.payment_date,
            kind: CashFlowKind::NominalPrice,
            period_index: Some(last.index),
            amount,
        });
    }
    if let Some(amount) = deposit {
        report.add_entry(CashFlowEntry {
            date: last.payment_date,
            kind: CashFlowKind::DepositOffset,
            period_index: Some(last.index),
            amount: -amount,
        });
    }

    debug!(
        "cash flow report: {} entries, net {}",
        report.entries.len(),
        report.net_amount
    );
    Ok(report)
}
