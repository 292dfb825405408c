//! Cash-flow report - the dated money movements of one lease.

mod cashflow_model;
mod cashflow_service;

pub use cashflow_model::{CashFlowEntry, CashFlowKind, CashFlowReport};
pub use cashflow_service::build_cash_flow_report;
