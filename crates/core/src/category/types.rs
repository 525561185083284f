//! Cost category domain types.

use serde::{Deserialize, Serialize};
use tirta_shared::types::{AccountId, CostCategoryId};

use super::error::CategoryError;

/// Business classification of a cost category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryKind {
    /// Expense (biaya).
    Biaya,
    /// Revenue (pendapatan).
    Pendapatan,
    /// Asset (aset).
    Aset,
}

impl CategoryKind {
    /// Parses a category kind from its wire string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "BIAYA" => Some(Self::Biaya),
            "PENDAPATAN" => Some(Self::Pendapatan),
            "ASET" => Some(Self::Aset),
            _ => None,
        }
    }

    /// Returns the wire string for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Biaya => "BIAYA",
            Self::Pendapatan => "PENDAPATAN",
            Self::Aset => "ASET",
        }
    }
}

/// A cost category with its optional account mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostCategory {
    /// The category ID.
    pub id: CostCategoryId,
    /// Category code.
    pub code: String,
    /// Category name.
    pub name: String,
    /// Business classification.
    pub kind: CategoryKind,
    /// Default account to debit when posting against this category.
    pub debit_account_id: Option<AccountId>,
    /// Default account to credit when posting against this category.
    pub credit_account_id: Option<AccountId>,
}

/// A category resolved to the account one side of a posting will hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMapping {
    /// The cost category.
    pub category_id: CostCategoryId,
    /// The mapped account.
    pub account_id: AccountId,
}

impl CostCategory {
    /// Resolves the debit-side mapping.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotMapped` if no debit account is configured.
    pub fn debit_mapping(&self) -> Result<CategoryMapping, CategoryError> {
        self.debit_account_id
            .map(|account_id| CategoryMapping {
                category_id: self.id,
                account_id,
            })
            .ok_or(CategoryError::NotMapped {
                category_id: self.id,
                side: "debit",
            })
    }

    /// Resolves the credit-side mapping.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotMapped` if no credit account is configured.
    pub fn credit_mapping(&self) -> Result<CategoryMapping, CategoryError> {
        self.credit_account_id
            .map(|account_id| CategoryMapping {
                category_id: self.id,
                account_id,
            })
            .ok_or(CategoryError::NotMapped {
                category_id: self.id,
                side: "credit",
            })
    }

    /// Validates code and name for create/update.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError` if either is empty.
    pub fn validate_fields(code: &str, name: &str) -> Result<(), CategoryError> {
        if code.trim().is_empty() {
            return Err(CategoryError::EmptyCode);
        }
        if name.trim().is_empty() {
            return Err(CategoryError::EmptyName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(debit: Option<AccountId>, credit: Option<AccountId>) -> CostCategory {
        CostCategory {
            id: CostCategoryId::new(),
            code: "B-501".to_string(),
            name: "Beban penyusutan".to_string(),
            kind: CategoryKind::Biaya,
            debit_account_id: debit,
            credit_account_id: credit,
        }
    }

    #[test]
    fn test_kind_parse_roundtrip() {
        for kind in [CategoryKind::Biaya, CategoryKind::Pendapatan, CategoryKind::Aset] {
            assert_eq!(CategoryKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(CategoryKind::parse("biaya"), Some(CategoryKind::Biaya));
        assert_eq!(CategoryKind::parse("other"), None);
    }

    #[test]
    fn test_mapping_resolution() {
        let debit_account = AccountId::new();
        let cat = category(Some(debit_account), None);

        let mapping = cat.debit_mapping().unwrap();
        assert_eq!(mapping.account_id, debit_account);
        assert_eq!(mapping.category_id, cat.id);

        assert!(matches!(
            cat.credit_mapping(),
            Err(CategoryError::NotMapped { side: "credit", .. })
        ));
    }

    #[test]
    fn test_validate_fields() {
        assert!(CostCategory::validate_fields("B-501", "Beban").is_ok());
        assert!(matches!(
            CostCategory::validate_fields("", "Beban"),
            Err(CategoryError::EmptyCode)
        ));
        assert!(matches!(
            CostCategory::validate_fields("B-501", "   "),
            Err(CategoryError::EmptyName)
        ));
    }
}
