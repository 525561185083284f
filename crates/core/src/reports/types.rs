//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tirta_shared::types::AccountId;

use crate::account::{AccountType, NormalBalance};

/// A journal line amount as fed into the aggregator.
#[derive(Debug, Clone)]
pub struct LineAmount {
    /// Account the line posted to.
    pub account_id: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// Per-account trial balance row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Normal balance side.
    pub normal_balance: NormalBalance,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Section-signed balance: normal-balance signed, negated for contra
    /// accounts so they net against their section.
    pub balance: Decimal,
}

/// One section of the report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrialBalanceSection {
    /// Section total (plain sum of the section-signed rows).
    pub total: Decimal,
    /// Rows in this section, ordered by account code.
    pub rows: Vec<TrialBalanceRow>,
}

/// The five report sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrialBalanceSections {
    /// Assets, with contra-assets netted in.
    pub assets: TrialBalanceSection,
    /// Liabilities.
    pub liabilities: TrialBalanceSection,
    /// Equity.
    pub equity: TrialBalanceSection,
    /// Revenue, with contra-revenue netted in.
    pub revenue: TrialBalanceSection,
    /// Expenses.
    pub expense: TrialBalanceSection,
}

/// Report totals and the balance check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Net assets.
    pub assets: Decimal,
    /// Total liabilities.
    pub liabilities: Decimal,
    /// Total equity.
    pub equity: Decimal,
    /// Net revenue.
    pub net_revenue: Decimal,
    /// Total expense.
    pub total_expense: Decimal,
    /// Profit or loss (net revenue minus total expense).
    pub profit_loss: Decimal,
    /// Liabilities + equity + profit/loss.
    pub liabilities_plus_equity: Decimal,
    /// Whether assets match liabilities + equity + profit/loss within
    /// tolerance.
    pub balanced: bool,
    /// Numeric difference (assets minus the other side); reported, never
    /// auto-corrected.
    pub difference: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Cutoff date the report was derived for.
    pub as_of: NaiveDate,
    /// Report sections.
    pub sections: TrialBalanceSections,
    /// Totals and balance check.
    pub totals: TrialBalanceTotals,
}
