//! Account validation and structure errors.

use thiserror::Error;
use tirta_shared::types::AccountId;

/// Errors that can occur during account registry operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Account code must not be empty.
    #[error("Account code must not be empty")]
    EmptyCode,

    /// Account name must not be empty.
    #[error("Account name must not be empty")]
    EmptyName,

    /// Unknown account type string.
    #[error("Unknown account type: {0}")]
    InvalidAccountType(String),

    /// Unknown normal balance string.
    #[error("Unknown normal balance: {0}")]
    InvalidNormalBalance(String),

    /// An account may not be its own parent.
    #[error("Account {0} may not be its own parent")]
    SelfParent(AccountId),

    /// Re-parenting would make the account its own ancestor.
    #[error("Setting parent {parent_id} on account {account_id} would create a cycle")]
    WouldCreateCycle {
        /// The account being re-parented.
        account_id: AccountId,
        /// The proposed parent.
        parent_id: AccountId,
    },

    /// Parent chain exceeded the maximum walk depth (broken hierarchy).
    #[error("Ancestor chain for account {0} exceeds maximum depth")]
    AncestorChainTooDeep(AccountId),

    /// A parent-chain walk revisited an account (corrupt hierarchy).
    #[error("Cycle detected in ancestor chain at account {0}")]
    CycleDetected(AccountId),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyCode => "EMPTY_CODE",
            Self::EmptyName => "EMPTY_NAME",
            Self::InvalidAccountType(_) => "INVALID_ACCOUNT_TYPE",
            Self::InvalidNormalBalance(_) => "INVALID_NORMAL_BALANCE",
            Self::SelfParent(_) => "SELF_PARENT",
            Self::WouldCreateCycle { .. } => "WOULD_CREATE_CYCLE",
            Self::AncestorChainTooDeep(_) => "ANCESTOR_CHAIN_TOO_DEEP",
            Self::CycleDetected(_) => "CYCLE_DETECTED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::EmptyCode
            | Self::EmptyName
            | Self::InvalidAccountType(_)
            | Self::InvalidNormalBalance(_)
            | Self::SelfParent(_)
            | Self::WouldCreateCycle { .. } => 400,
            // A corrupt hierarchy is a storage-level inconsistency.
            Self::AncestorChainTooDeep(_) | Self::CycleDetected(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AccountError::EmptyCode.error_code(), "EMPTY_CODE");
        assert_eq!(
            AccountError::SelfParent(AccountId::new()).error_code(),
            "SELF_PARENT"
        );
        assert_eq!(
            AccountError::CycleDetected(AccountId::new()).error_code(),
            "CYCLE_DETECTED"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(AccountError::EmptyCode.http_status_code(), 400);
        assert_eq!(
            AccountError::WouldCreateCycle {
                account_id: AccountId::new(),
                parent_id: AccountId::new(),
            }
            .http_status_code(),
            400
        );
        assert_eq!(
            AccountError::CycleDetected(AccountId::new()).http_status_code(),
            500
        );
    }
}
