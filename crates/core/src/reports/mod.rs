//! Trial balance / balance sheet aggregation.
//!
//! The aggregator sums journal lines by account as of a cutoff, applies each
//! account's normal-balance sign, nets contra accounts inside their section,
//! and reports whether the books balance. It never attempts auto-correction.

pub mod service;
pub mod types;

pub use service::ReportService;
pub use types::{
    LineAmount, TrialBalanceReport, TrialBalanceRow, TrialBalanceSection, TrialBalanceSections,
    TrialBalanceTotals,
};
