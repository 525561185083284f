//! Depreciation computation errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during schedule generation or simulation.
#[derive(Debug, Error)]
pub enum DepreciationError {
    /// Residual value must not be negative.
    #[error("Residual value must not be negative: {0}")]
    NegativeResidual(Decimal),

    /// Acquisition value must exceed the residual value.
    #[error("Acquisition value {acquisition} must exceed residual value {residual}")]
    ResidualNotBelowAcquisition {
        /// Acquisition value.
        acquisition: Decimal,
        /// Residual value.
        residual: Decimal,
    },

    /// Declining balance requires a depreciation class for the rate lookup.
    #[error("Declining balance requires a depreciation class")]
    MissingDepreciationClass,

    /// Rate override outside (0, 1].
    #[error("Rate override must be between 0 exclusive and 1 inclusive, got {0}")]
    InvalidRateOverride(Decimal),

    /// Simulation window end precedes its start.
    #[error("Simulation window end {to} precedes start {from}")]
    WindowInvalid {
        /// Window start.
        from: NaiveDate,
        /// Window end.
        to: NaiveDate,
    },

    /// Simulation window spans more periods than allowed.
    #[error("Simulation window spans {periods} periods, limit is {limit}")]
    WindowTooLarge {
        /// Periods requested.
        periods: usize,
        /// Maximum allowed for the basis.
        limit: usize,
    },
}

impl DepreciationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeResidual(_) => "NEGATIVE_RESIDUAL",
            Self::ResidualNotBelowAcquisition { .. } => "RESIDUAL_NOT_BELOW_ACQUISITION",
            Self::MissingDepreciationClass => "MISSING_DEPRECIATION_CLASS",
            Self::InvalidRateOverride(_) => "INVALID_RATE_OVERRIDE",
            Self::WindowInvalid { .. } => "WINDOW_INVALID",
            Self::WindowTooLarge { .. } => "WINDOW_TOO_LARGE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        // Every depreciation failure is a bad-input condition.
        400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DepreciationError::MissingDepreciationClass.error_code(),
            "MISSING_DEPRECIATION_CLASS"
        );
        assert_eq!(
            DepreciationError::WindowTooLarge {
                periods: 130,
                limit: 120,
            }
            .error_code(),
            "WINDOW_TOO_LARGE"
        );
    }

    #[test]
    fn test_window_too_large_names_limit() {
        let err = DepreciationError::WindowTooLarge {
            periods: 130,
            limit: 120,
        };
        assert_eq!(
            err.to_string(),
            "Simulation window spans 130 periods, limit is 120"
        );
    }
}
