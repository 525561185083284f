//! Cost category errors.

use thiserror::Error;
use tirta_shared::types::CostCategoryId;

/// Errors that can occur during cost category operations.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// Category code must not be empty.
    #[error("Category code must not be empty")]
    EmptyCode,

    /// Category name must not be empty.
    #[error("Category name must not be empty")]
    EmptyName,

    /// Unknown category kind string.
    #[error("Unknown category kind: {0}")]
    InvalidKind(String),

    /// Category has no account mapped on the requested side.
    #[error("Category {category_id} has no {side} account mapped")]
    NotMapped {
        /// The category missing a mapping.
        category_id: CostCategoryId,
        /// Which side was requested ("debit" or "credit").
        side: &'static str,
    },
}

impl CategoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyCode => "EMPTY_CODE",
            Self::EmptyName => "EMPTY_NAME",
            Self::InvalidKind(_) => "INVALID_KIND",
            Self::NotMapped { .. } => "CATEGORY_NOT_MAPPED",
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// A missing mapping surfaces as 404: the referenced account mapping is
    /// absent, matching how the posting operation reports it.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::EmptyCode | Self::EmptyName | Self::InvalidKind(_) => 400,
            Self::NotMapped { .. } => 404,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CategoryError::EmptyCode.error_code(), "EMPTY_CODE");
        assert_eq!(
            CategoryError::NotMapped {
                category_id: CostCategoryId::new(),
                side: "debit",
            }
            .error_code(),
            "CATEGORY_NOT_MAPPED"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(CategoryError::InvalidKind(String::new()).http_status_code(), 400);
        assert_eq!(
            CategoryError::NotMapped {
                category_id: CostCategoryId::new(),
                side: "credit",
            }
            .http_status_code(),
            404
        );
    }
}
