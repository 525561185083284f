//! Posting errors.

use rust_decimal::Decimal;
use thiserror::Error;
use tirta_shared::types::CostCategoryId;

/// Errors that can occur while planning a posting.
#[derive(Debug, Error)]
pub enum PostingError {
    /// Posting amount must be positive.
    #[error("Posting amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Debit and credit categories must differ, otherwise the per-category
    /// idempotence check cannot tell the two sides apart.
    #[error("Debit and credit categories must differ ({0})")]
    SameCategory(CostCategoryId),
}

impl PostingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::SameCategory(_) => "SAME_CATEGORY",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        400
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PostingError::NonPositiveAmount(dec!(-1)).error_code(),
            "NON_POSITIVE_AMOUNT"
        );
        assert_eq!(
            PostingError::SameCategory(CostCategoryId::new()).error_code(),
            "SAME_CATEGORY"
        );
    }
}
