//! Trial balance report repository.
//!
//! Loads journal lines up to a cutoff as a snapshot read (no locking) and
//! hands aggregation to the core report service. Missing parent accounts
//! are resolved recursively so zero-balance ancestors can still be shown
//! with code and name.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QuerySelect, RelationTrait,
};
use tirta_core::account::{AccountMeta, MAX_ANCESTOR_DEPTH};
use tirta_core::reports::{LineAmount, ReportService, TrialBalanceReport};
use tirta_shared::types::AccountId;
use uuid::Uuid;

use crate::entities::{accounts, journal_lines, journals};
use crate::repositories::account::to_meta;

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Trial balance query parameters.
#[derive(Debug, Clone)]
pub struct TrialBalanceQuery {
    /// Cutoff date (inclusive).
    pub as_of: NaiveDate,
    /// Optional cost unit filter.
    pub cost_unit_id: Option<Uuid>,
    /// Optional asset filter.
    pub asset_id: Option<Uuid>,
    /// Include zero-balance rows.
    pub show_zero: bool,
}

#[derive(Debug, FromQueryResult)]
struct LineRow {
    account_id: Uuid,
    debit: Decimal,
    credit: Decimal,
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Derives the trial balance as of a cutoff date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn trial_balance(
        &self,
        query: TrialBalanceQuery,
    ) -> Result<TrialBalanceReport, ReportError> {
        let mut line_query = journal_lines::Entity::find()
            .join(JoinType::InnerJoin, journal_lines::Relation::Journals.def())
            .filter(journals::Column::JournalDate.lte(query.as_of));

        if let Some(cost_unit_id) = query.cost_unit_id {
            line_query = line_query.filter(journal_lines::Column::CostUnitId.eq(cost_unit_id));
        }
        if let Some(asset_id) = query.asset_id {
            line_query = line_query.filter(journal_lines::Column::AssetId.eq(asset_id));
        }

        let rows: Vec<LineRow> = line_query
            .select_only()
            .column(journal_lines::Column::AccountId)
            .column(journal_lines::Column::Debit)
            .column(journal_lines::Column::Credit)
            .into_model::<LineRow>()
            .all(&self.db)
            .await?;

        let referenced: HashSet<Uuid> = rows.iter().map(|r| r.account_id).collect();
        let metas = self.load_with_ancestors(referenced).await?;

        let lines: Vec<LineAmount> = rows
            .iter()
            .map(|r| LineAmount {
                account_id: AccountId::from_uuid(r.account_id),
                debit: r.debit,
                credit: r.credit,
            })
            .collect();

        Ok(ReportService::trial_balance(
            query.as_of,
            &metas,
            &lines,
            query.show_zero,
        ))
    }

    /// Loads the referenced accounts plus every missing ancestor, level by
    /// level, with a depth guard against a corrupt hierarchy.
    async fn load_with_ancestors(
        &self,
        referenced: HashSet<Uuid>,
    ) -> Result<HashMap<AccountId, AccountMeta>, ReportError> {
        let mut metas: HashMap<AccountId, AccountMeta> = HashMap::new();
        let mut frontier: Vec<Uuid> = referenced.into_iter().collect();

        for _ in 0..=MAX_ANCESTOR_DEPTH {
            if frontier.is_empty() {
                break;
            }

            let found = accounts::Entity::find()
                .filter(accounts::Column::Id.is_in(frontier.clone()))
                .all(&self.db)
                .await?;

            let mut next: HashSet<Uuid> = HashSet::new();
            for model in &found {
                let meta = to_meta(model);
                if let Some(parent) = meta.parent_id
                    && !metas.contains_key(&parent)
                {
                    next.insert(parent.into_inner());
                }
                metas.insert(meta.id, meta);
            }

            frontier = next
                .into_iter()
                .filter(|id| !metas.contains_key(&AccountId::from_uuid(*id)))
                .collect();
        }

        Ok(metas)
    }
}
