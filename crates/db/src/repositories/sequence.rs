//! Sequence allocator repository.
//!
//! Allocation is a single atomic upsert (`INSERT .. ON CONFLICT .. DO UPDATE
//! .. RETURNING`), never a read-then-write, so concurrent callers on the
//! same bucket cannot lose updates. The methods are generic over
//! `ConnectionTrait` so an allocation can join an enclosing transaction.

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement};

use tirta_core::sequence::{bucket_key, format_reference};

/// Prefix for journal voucher numbers.
pub const VOUCHER_PREFIX: &str = "JV";

/// Prefix for asset numbers.
pub const ASSET_PREFIX: &str = "AST";

/// Repository for monotonically increasing, time-bucketed counters.
pub struct SequenceRepository;

impl SequenceRepository {
    /// Atomically increments the counter for `<prefix>-<yyyymm>` and
    /// returns the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn next_value<C: ConnectionTrait>(
        conn: &C,
        prefix: &str,
        date: NaiveDate,
    ) -> Result<i64, DbErr> {
        let key = bucket_key(prefix, date);
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r"INSERT INTO sequence_counters (key, value, updated_at)
              VALUES ($1, 1, NOW())
              ON CONFLICT (key)
              DO UPDATE SET value = sequence_counters.value + 1, updated_at = NOW()
              RETURNING value",
            [key.into()],
        );

        let row = conn
            .query_one(stmt)
            .await?
            .ok_or_else(|| DbErr::Custom("sequence upsert returned no row".to_string()))?;
        row.try_get("", "value")
    }

    /// Allocates the next value and renders it as a padded reference,
    /// e.g. `JV/2024-01/00001`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn next_reference<C: ConnectionTrait>(
        conn: &C,
        prefix: &str,
        date: NaiveDate,
        pad: usize,
    ) -> Result<String, DbErr> {
        let value = Self::next_value(conn, prefix, date).await?;
        Ok(format_reference(prefix, date, value, pad))
    }
}
