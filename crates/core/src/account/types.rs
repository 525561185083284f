//! Account domain types.

use serde::{Deserialize, Serialize};
use tirta_shared::types::AccountId;

/// Account type classification.
///
/// Contra types net against their parent category with the opposite sign
/// (e.g. accumulated depreciation against gross asset value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Asset account.
    Asset,
    /// Liability account.
    Liability,
    /// Equity account.
    Equity,
    /// Revenue account.
    Revenue,
    /// Expense account.
    Expense,
    /// Contra-asset account (nets against assets).
    ContraAsset,
    /// Contra-revenue account (nets against revenue).
    ContraRevenue,
}

impl AccountType {
    /// Returns the conventional normal balance for this account type.
    #[must_use]
    pub const fn default_normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense | Self::ContraRevenue => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue | Self::ContraAsset => {
                NormalBalance::Credit
            }
        }
    }

    /// Returns true if this is a contra type.
    #[must_use]
    pub const fn is_contra(self) -> bool {
        matches!(self, Self::ContraAsset | Self::ContraRevenue)
    }

    /// Parses an account type from its wire string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asset" => Some(Self::Asset),
            "liability" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "revenue" => Some(Self::Revenue),
            "expense" => Some(Self::Expense),
            "contra_asset" => Some(Self::ContraAsset),
            "contra_revenue" => Some(Self::ContraRevenue),
            _ => None,
        }
    }

    /// Returns the wire string for this account type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
            Self::ContraAsset => "contra_asset",
            Self::ContraRevenue => "contra_revenue",
        }
    }
}

/// Whether an account's balance is conventionally a net debit or net credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Balance expressed as debits minus credits.
    Debit,
    /// Balance expressed as credits minus debits.
    Credit,
}

impl NormalBalance {
    /// Parses a normal balance from its wire string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "debit" => Some(Self::Debit),
            "credit" => Some(Self::Credit),
            _ => None,
        }
    }

    /// Returns the wire string for this normal balance.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

/// Account metadata as used by validation and aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    /// The account ID.
    pub id: AccountId,
    /// Account code (unique).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Normal balance side.
    pub normal_balance: NormalBalance,
    /// Parent account, if any.
    pub parent_id: Option<AccountId>,
    /// Whether the account is active.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_normal_balance() {
        assert_eq!(
            AccountType::Asset.default_normal_balance(),
            NormalBalance::Debit
        );
        assert_eq!(
            AccountType::Expense.default_normal_balance(),
            NormalBalance::Debit
        );
        assert_eq!(
            AccountType::Liability.default_normal_balance(),
            NormalBalance::Credit
        );
        assert_eq!(
            AccountType::Equity.default_normal_balance(),
            NormalBalance::Credit
        );
        assert_eq!(
            AccountType::Revenue.default_normal_balance(),
            NormalBalance::Credit
        );
        // Contra accounts carry the opposite of what they net against.
        assert_eq!(
            AccountType::ContraAsset.default_normal_balance(),
            NormalBalance::Credit
        );
        assert_eq!(
            AccountType::ContraRevenue.default_normal_balance(),
            NormalBalance::Debit
        );
    }

    #[test]
    fn test_account_type_parse_roundtrip() {
        for t in [
            AccountType::Asset,
            AccountType::Liability,
            AccountType::Equity,
            AccountType::Revenue,
            AccountType::Expense,
            AccountType::ContraAsset,
            AccountType::ContraRevenue,
        ] {
            assert_eq!(AccountType::parse(t.as_str()), Some(t));
        }
        assert_eq!(AccountType::parse("CONTRA_ASSET"), Some(AccountType::ContraAsset));
        assert_eq!(AccountType::parse("unknown"), None);
    }

    #[test]
    fn test_is_contra() {
        assert!(AccountType::ContraAsset.is_contra());
        assert!(AccountType::ContraRevenue.is_contra());
        assert!(!AccountType::Asset.is_contra());
        assert!(!AccountType::Revenue.is_contra());
    }
}
