//! Journal repository: idempotent posting, ledger listing, and unposting.
//!
//! The check-then-create path runs inside a single database transaction;
//! the partial unique index on (source_tag, cost_category_id) is the last
//! line of defense against a concurrent double post, and a violation maps
//! to the same "already posted" success response.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};
use tirta_core::posting::{JournalTotals, PostingPlan, PostingRequest, PostingService, SourceRef};
use tirta_shared::types::{AssetId, CostCategoryId, CostUnitId, PageRequest};
use tracing::info;
use uuid::Uuid;

use crate::entities::{cost_categories, journal_lines, journals};
use crate::repositories::category::to_domain;
use crate::repositories::sequence::{SequenceRepository, VOUCHER_PREFIX};

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// Referenced cost category not found.
    #[error("Cost category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Category exists but has no account mapped on the required side.
    #[error(transparent)]
    Mapping(#[from] tirta_core::category::CategoryError),

    /// Posting request failed validation.
    #[error(transparent)]
    Posting(#[from] tirta_core::posting::PostingError),

    /// Journal header not found.
    #[error("Journal not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for posting a source event.
#[derive(Debug, Clone)]
pub struct PostInput {
    /// The originating event.
    pub source: SourceRef,
    /// Category to debit.
    pub debit_category_id: Uuid,
    /// Category to credit.
    pub credit_category_id: Uuid,
    /// Amount for each side.
    pub amount: Decimal,
    /// Journal date.
    pub date: NaiveDate,
    /// Header description.
    pub description: Option<String>,
    /// Optional cost unit tag.
    pub cost_unit_id: Option<Uuid>,
    /// Optional asset tag.
    pub asset_id: Option<Uuid>,
}

/// Outcome of a posting attempt.
#[derive(Debug, Clone)]
pub struct PostingOutcome {
    /// Header the lines belong to (None when nothing was ever posted and
    /// the operation was a no-op).
    pub journal_id: Option<Uuid>,
    /// Number of lines created by this invocation.
    pub created: usize,
    /// True when the source was already fully posted.
    pub already_posted: bool,
}

/// Filter options for listing journal headers.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Start date (inclusive).
    pub from: Option<NaiveDate>,
    /// End date (inclusive).
    pub to: Option<NaiveDate>,
    /// Free-text match against description, voucher, or reference.
    pub q: Option<String>,
    /// Source filter: a full `<kind>:<id>` tag or a bare kind.
    pub source: Option<String>,
}

/// A journal header with its lines and derived balance.
#[derive(Debug, Clone)]
pub struct JournalWithLines {
    /// The header.
    pub journal: journals::Model,
    /// The lines, in insertion order.
    pub lines: Vec<journal_lines::Model>,
    /// Derived totals; `is_balanced` is computed, not enforced.
    pub totals: JournalTotals,
}

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts a source event: at most one debit and one credit line per
    /// (source, category) pair, ever.
    ///
    /// Posting the same source twice is a success that creates nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if a category or its mapping is missing, the amount
    /// is invalid, or the database operation fails.
    pub async fn post(&self, input: PostInput) -> Result<PostingOutcome, JournalError> {
        let debit_category = self.load_category(input.debit_category_id).await?;
        let credit_category = self.load_category(input.credit_category_id).await?;

        let request = PostingRequest {
            source: input.source.clone(),
            debit: to_domain(&debit_category).debit_mapping()?,
            credit: to_domain(&credit_category).credit_mapping()?,
            amount: input.amount,
            date: input.date,
            description: input.description.clone(),
            cost_unit_id: input.cost_unit_id.map(CostUnitId::from_uuid),
            asset_id: input.asset_id.map(AssetId::from_uuid),
        };
        let tag = request.source.tag();

        let txn = self.db.begin().await?;

        let existing: Vec<journal_lines::Model> = journal_lines::Entity::find()
            .filter(journal_lines::Column::SourceTag.eq(&tag))
            .filter(
                journal_lines::Column::CostCategoryId
                    .is_in([input.debit_category_id, input.credit_category_id]),
            )
            .all(&txn)
            .await?;
        let existing_ids: Vec<CostCategoryId> = existing
            .iter()
            .filter_map(|l| l.cost_category_id.map(CostCategoryId::from_uuid))
            .collect();

        let plan = PostingService::plan(&request, &existing_ids)?;

        if plan.already_posted {
            txn.commit().await?;
            return Ok(PostingOutcome {
                journal_id: existing.first().map(|l| l.journal_id),
                created: 0,
                already_posted: true,
            });
        }

        let header = self.find_or_create_header(&txn, &input, &tag).await?;

        match Self::insert_lines(&txn, header.id, &tag, &input, &plan).await {
            Ok(()) => {
                txn.commit().await?;
                info!(
                    source = %tag,
                    journal_id = %header.id,
                    created = plan.created(),
                    "Posted journal lines"
                );
                Ok(PostingOutcome {
                    journal_id: Some(header.id),
                    created: plan.created(),
                    already_posted: false,
                })
            }
            // A concurrent poster won the race; the unique index turned the
            // duplicate into a constraint violation. Same success response.
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                txn.rollback().await?;
                Ok(PostingOutcome {
                    journal_id: None,
                    created: 0,
                    already_posted: true,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Lists journal headers with lines, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_journals(
        &self,
        filter: JournalFilter,
        page: &PageRequest,
    ) -> Result<(Vec<JournalWithLines>, u64), JournalError> {
        let mut query = journals::Entity::find();

        if let Some(from) = filter.from {
            query = query.filter(journals::Column::JournalDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(journals::Column::JournalDate.lte(to));
        }
        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(journals::Column::Description.contains(q))
                    .add(journals::Column::VoucherNo.contains(q))
                    .add(journals::Column::ReferenceNo.contains(q)),
            );
        }
        if let Some(source) = filter.source.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if source.contains(':') {
                query = query.filter(journals::Column::SourceTag.eq(source));
            } else {
                query = query.filter(journals::Column::SourceTag.starts_with(format!("{source}:")));
            }
        }

        let total = query.clone().count(&self.db).await?;

        let headers = query
            .order_by_desc(journals::Column::JournalDate)
            .order_by_desc(journals::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let ids: Vec<Uuid> = headers.iter().map(|j| j.id).collect();
        let mut lines_by_journal: HashMap<Uuid, Vec<journal_lines::Model>> = HashMap::new();
        if !ids.is_empty() {
            let lines = journal_lines::Entity::find()
                .filter(journal_lines::Column::JournalId.is_in(ids))
                .order_by_asc(journal_lines::Column::CreatedAt)
                .all(&self.db)
                .await?;
            for line in lines {
                lines_by_journal.entry(line.journal_id).or_default().push(line);
            }
        }

        let result = headers
            .into_iter()
            .map(|journal| {
                let lines = lines_by_journal.remove(&journal.id).unwrap_or_default();
                let totals = PostingService::totals(
                    &lines.iter().map(|l| (l.debit, l.credit)).collect::<Vec<_>>(),
                );
                JournalWithLines {
                    journal,
                    lines,
                    totals,
                }
            })
            .collect();

        Ok((result, total))
    }

    /// Finds a journal header with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_journal_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<JournalWithLines>, JournalError> {
        let Some(journal) = journals::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::JournalId.eq(id))
            .order_by_asc(journal_lines::Column::CreatedAt)
            .all(&self.db)
            .await?;
        let totals = PostingService::totals(
            &lines.iter().map(|l| (l.debit, l.credit)).collect::<Vec<_>>(),
        );

        Ok(Some(JournalWithLines {
            journal,
            lines,
            totals,
        }))
    }

    /// Removes all headers (and, via cascade, lines) derived from a source,
    /// restoring a clean slate for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn unpost(&self, source: &SourceRef) -> Result<u64, JournalError> {
        let tag = source.tag();
        let result = journals::Entity::delete_many()
            .filter(journals::Column::SourceTag.eq(&tag))
            .exec(&self.db)
            .await?;

        info!(source = %tag, removed = result.rows_affected, "Unposted journals");
        Ok(result.rows_affected)
    }

    /// Increments a header's print count (voucher reprint bookkeeping).
    ///
    /// # Errors
    ///
    /// Returns `JournalError::NotFound` when the header is absent.
    pub async fn increment_print_count(&self, id: Uuid) -> Result<journals::Model, JournalError> {
        let journal = journals::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(JournalError::NotFound(id))?;

        let print_count = journal.print_count + 1;
        let mut active: journals::ActiveModel = journal.into();
        active.print_count = Set(print_count);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    async fn load_category(&self, id: Uuid) -> Result<cost_categories::Model, JournalError> {
        cost_categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(JournalError::CategoryNotFound(id))
    }

    async fn find_or_create_header(
        &self,
        txn: &DatabaseTransaction,
        input: &PostInput,
        tag: &str,
    ) -> Result<journals::Model, JournalError> {
        let existing = journals::Entity::find()
            .filter(journals::Column::SourceTag.eq(tag))
            .one(txn)
            .await?;
        if let Some(header) = existing {
            return Ok(header);
        }

        let voucher_no = SequenceRepository::next_reference(
            txn,
            VOUCHER_PREFIX,
            input.date,
            tirta_core::sequence::VOUCHER_PAD,
        )
        .await?;

        let now = Utc::now().into();
        let header = journals::ActiveModel {
            id: Set(Uuid::new_v4()),
            journal_date: Set(input.date),
            reference_no: Set(None),
            voucher_no: Set(Some(voucher_no)),
            description: Set(input
                .description
                .clone()
                .unwrap_or_else(|| format!("Posting {tag}"))),
            source_tag: Set(tag.to_string()),
            print_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(header.insert(txn).await?)
    }

    async fn insert_lines(
        txn: &DatabaseTransaction,
        journal_id: Uuid,
        tag: &str,
        input: &PostInput,
        plan: &PostingPlan,
    ) -> Result<(), DbErr> {
        let now = Utc::now().into();
        for line in &plan.lines {
            let model = journal_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                journal_id: Set(journal_id),
                account_id: Set(line.account_id.into_inner()),
                cost_category_id: Set(Some(line.cost_category_id.into_inner())),
                source_tag: Set(Some(tag.to_string())),
                debit: Set(line.debit),
                credit: Set(line.credit),
                cost_unit_id: Set(input.cost_unit_id),
                asset_id: Set(input.asset_id),
                created_at: Set(now),
            };
            model.insert(txn).await?;
        }
        Ok(())
    }
}
