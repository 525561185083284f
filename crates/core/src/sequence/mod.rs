//! Time-bucketed reference number formatting.
//!
//! Counters themselves live in storage and are incremented atomically by
//! the sequence repository; this module only derives bucket keys and
//! renders allocated values into human-readable references.

use chrono::{Datelike, NaiveDate};

/// Padding width for journal voucher numbers.
pub const VOUCHER_PAD: usize = 5;

/// Padding width for asset numbers.
pub const ASSET_PAD: usize = 4;

/// Derives the counter bucket key for a prefix and date: `<prefix>-<yyyymm>`.
#[must_use]
pub fn bucket_key(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}-{:04}{:02}", date.year(), date.month())
}

/// Renders an allocated counter value: `<prefix>/<yyyy-mm>/<NNNNN>`.
#[must_use]
pub fn format_reference(prefix: &str, date: NaiveDate, value: i64, pad: usize) -> String {
    format!(
        "{prefix}/{:04}-{:02}/{value:0pad$}",
        date.year(),
        date.month()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 15).unwrap()
    }

    #[test]
    fn test_bucket_key() {
        assert_eq!(bucket_key("JV", date(2024, 1)), "JV-202401");
        assert_eq!(bucket_key("AST", date(2026, 12)), "AST-202612");
    }

    #[test]
    fn test_format_voucher_reference() {
        assert_eq!(
            format_reference("JV", date(2024, 1), 1, VOUCHER_PAD),
            "JV/2024-01/00001"
        );
        assert_eq!(
            format_reference("JV", date(2024, 1), 12345, VOUCHER_PAD),
            "JV/2024-01/12345"
        );
    }

    #[test]
    fn test_format_asset_reference() {
        assert_eq!(
            format_reference("AST", date(2025, 7), 42, ASSET_PAD),
            "AST/2025-07/0042"
        );
    }

    #[test]
    fn test_wide_values_are_not_truncated() {
        assert_eq!(
            format_reference("JV", date(2024, 1), 123_456, VOUCHER_PAD),
            "JV/2024-01/123456"
        );
    }

    #[test]
    fn test_buckets_roll_monthly() {
        assert_ne!(bucket_key("JV", date(2024, 1)), bucket_key("JV", date(2024, 2)));
    }
}
