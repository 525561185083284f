//! Posting domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tirta_shared::types::{AccountId, AssetId, CostCategoryId, CostUnitId};
use uuid::Uuid;

use crate::category::CategoryMapping;

/// Entry type: either Debit or Credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

/// Opaque identifier of the event a journal entry was derived from,
/// rendered as `<kind>:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    /// Source kind (e.g. "depreciation", "manual").
    pub kind: String,
    /// Source entity ID.
    pub id: Uuid,
}

impl SourceRef {
    /// Creates a source reference.
    #[must_use]
    pub fn new(kind: impl Into<String>, id: Uuid) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }

    /// Renders the `<kind>:<id>` tag stored on headers and lines.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}:{}", self.kind, self.id)
    }

    /// Parses a tag back into its parts.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let (kind, id) = tag.split_once(':')?;
        let id = Uuid::parse_str(id).ok()?;
        if kind.is_empty() {
            return None;
        }
        Some(Self {
            kind: kind.to_string(),
            id,
        })
    }
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// A posting request with both category sides already resolved to accounts.
#[derive(Debug, Clone)]
pub struct PostingRequest {
    /// The originating event.
    pub source: SourceRef,
    /// Debit side: category and its mapped account.
    pub debit: CategoryMapping,
    /// Credit side: category and its mapped account.
    pub credit: CategoryMapping,
    /// Amount posted to each side.
    pub amount: Decimal,
    /// Journal date.
    pub date: NaiveDate,
    /// Header description.
    pub description: Option<String>,
    /// Optional cost unit tag for the lines.
    pub cost_unit_id: Option<CostUnitId>,
    /// Optional asset tag for the lines.
    pub asset_id: Option<AssetId>,
}

/// A journal line the repository should create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLine {
    /// Account the line posts to.
    pub account_id: AccountId,
    /// Category tag used for the idempotence check.
    pub cost_category_id: CostCategoryId,
    /// Debit amount (zero on the credit line).
    pub debit: Decimal,
    /// Credit amount (zero on the debit line).
    pub credit: Decimal,
}

/// Outcome of planning a posting.
#[derive(Debug, Clone)]
pub struct PostingPlan {
    /// Lines that still need to be created, in debit-then-credit order.
    pub lines: Vec<PlannedLine>,
    /// True when both sides already existed and nothing is to be done.
    pub already_posted: bool,
}

impl PostingPlan {
    /// Number of lines this plan will create.
    #[must_use]
    pub fn created(&self) -> usize {
        self.lines.len()
    }
}

/// Derived balance view over a journal header's lines.
#[derive(Debug, Clone)]
pub struct JournalTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
    /// Whether the header is balanced (debits == credits).
    pub is_balanced: bool,
}

impl JournalTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_source_ref_tag_roundtrip() {
        let source = SourceRef::new("depreciation", Uuid::new_v4());
        let parsed = SourceRef::parse(&source.tag()).unwrap();
        assert_eq!(parsed, source);
    }

    #[test]
    fn test_source_ref_parse_rejects_garbage() {
        assert!(SourceRef::parse("no-separator").is_none());
        assert!(SourceRef::parse(":missing-kind").is_none());
        assert!(SourceRef::parse("depreciation:not-a-uuid").is_none());
    }

    #[test]
    fn test_journal_totals_balanced() {
        let totals = JournalTotals::new(dec!(1000000), dec!(1000000));
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), dec!(0));
    }

    #[test]
    fn test_journal_totals_unbalanced() {
        let totals = JournalTotals::new(dec!(1000000), dec!(400000));
        assert!(!totals.is_balanced);
        assert_eq!(totals.difference(), dec!(600000));
    }
}
