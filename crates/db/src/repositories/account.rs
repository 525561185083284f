//! Account repository for chart of accounts database operations.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use tirta_core::account::{AccountMeta, AccountRegistry, AccountType, NormalBalance};
use tirta_shared::types::AccountId;
use uuid::Uuid;

use crate::entities::{accounts, journal_lines};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account code already exists.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(Uuid),

    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Cannot delete an account that journal lines reference.
    #[error("Cannot delete account: {0} journal lines reference it")]
    HasJournalLines(u64),

    /// Structural validation failed (empty fields, self-parent, cycle).
    #[error(transparent)]
    Hierarchy(#[from] tirta_core::account::AccountError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code (unique).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Normal balance side.
    pub normal_balance: NormalBalance,
    /// Parent account ID for hierarchical structure.
    pub parent_id: Option<Uuid>,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Input for updating an account.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Account code.
    pub code: Option<String>,
    /// Account name.
    pub name: Option<String>,
    /// Account type.
    pub account_type: Option<AccountType>,
    /// Normal balance side.
    pub normal_balance: Option<NormalBalance>,
    /// Parent account ID (outer None = unchanged, inner None = detach).
    pub parent_id: Option<Option<Uuid>>,
    /// Whether the account is active.
    pub is_active: Option<bool>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Free-text match against code or name.
    pub q: Option<String>,
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
}

/// Converts an entity row into the domain metadata the core logic works on.
#[must_use]
pub fn to_meta(model: &accounts::Model) -> AccountMeta {
    AccountMeta {
        id: AccountId::from_uuid(model.id),
        code: model.code.clone(),
        name: model.name.clone(),
        account_type: model.account_type.into(),
        normal_balance: model.normal_balance.into(),
        parent_id: model.parent_id.map(AccountId::from_uuid),
        is_active: model.is_active,
    }
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the code or name is empty, the code is already in
    /// use, or the parent account does not exist.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        AccountRegistry::validate_fields(&input.code, &input.name, None, None)?;

        let existing = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(&input.code))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(AccountError::DuplicateCode(input.code));
        }

        if let Some(parent_id) = input.parent_id {
            let parent = accounts::Entity::find_by_id(parent_id).one(&self.db).await?;
            if parent.is_none() {
                return Err(AccountError::ParentNotFound(parent_id));
            }
        }

        let now = Utc::now().into();
        let code = input.code.clone();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(input.account_type.into()),
            normal_balance: Set(input.normal_balance.into()),
            parent_id: Set(input.parent_id),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match account.insert(&self.db).await {
            Ok(model) => Ok(model),
            // The unique index is the backstop for a concurrent create.
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(AccountError::DuplicateCode(code))
                }
                _ => Err(err.into()),
            },
        }
    }

    /// Lists accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        filter: AccountFilter,
    ) -> Result<Vec<accounts::Model>, AccountError> {
        let mut query = accounts::Entity::find().order_by_asc(accounts::Column::Code);

        if let Some(q) = filter.q.filter(|q| !q.trim().is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(accounts::Column::Code.contains(q.trim()))
                    .add(accounts::Column::Name.contains(q.trim())),
            );
        }
        if let Some(account_type) = filter.account_type {
            query = query.filter(
                accounts::Column::AccountType
                    .eq(crate::entities::sea_orm_active_enums::AccountType::from(account_type)),
            );
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_account_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Finds an account and resolves its full ancestor chain, nearest parent
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or the hierarchy is
    /// corrupt (cycle / runaway chain).
    pub async fn find_with_ancestors(
        &self,
        id: Uuid,
    ) -> Result<(accounts::Model, Vec<AccountMeta>), AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        let map = self.load_meta_map().await?;
        let meta = to_meta(&account);
        let chain = AccountRegistry::ancestor_chain(&meta, |pid| map.get(&pid).cloned())?;

        Ok((account, chain))
    }

    /// Updates an account with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing, the new code collides,
    /// the new parent is absent, or re-parenting would create a cycle.
    pub async fn update_account(
        &self,
        id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        let code = input.code.as_deref().unwrap_or(&account.code);
        let name = input.name.as_deref().unwrap_or(&account.name);
        let account_id = AccountId::from_uuid(id);
        AccountRegistry::validate_fields(
            code,
            name,
            Some(account_id),
            input
                .parent_id
                .flatten()
                .map(AccountId::from_uuid),
        )?;

        if let Some(new_code) = &input.code
            && *new_code != account.code
        {
            let existing = accounts::Entity::find()
                .filter(accounts::Column::Code.eq(new_code))
                .filter(accounts::Column::Id.ne(id))
                .one(&self.db)
                .await?;
            if existing.is_some() {
                return Err(AccountError::DuplicateCode(new_code.clone()));
            }
        }

        if let Some(Some(parent_id)) = input.parent_id {
            let parent = accounts::Entity::find_by_id(parent_id).one(&self.db).await?;
            if parent.is_none() {
                return Err(AccountError::ParentNotFound(parent_id));
            }

            let map = self.load_meta_map().await?;
            AccountRegistry::validate_reparent(
                account_id,
                AccountId::from_uuid(parent_id),
                |pid| map.get(&pid).cloned(),
            )?;
        }

        let now = Utc::now().into();
        let mut active: accounts::ActiveModel = account.into();

        if let Some(code) = input.code {
            active.code = Set(code);
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(account_type) = input.account_type {
            active.account_type = Set(account_type.into());
        }
        if let Some(normal_balance) = input.normal_balance {
            active.normal_balance = Set(normal_balance.into());
        }
        if let Some(parent_id) = input.parent_id {
            active.parent_id = Set(parent_id);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(now);

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an account, detaching its children.
    ///
    /// Deletion is blocked while journal lines reference the account; the
    /// historical ledger keeps its references intact.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::HasJournalLines` when referenced, or
    /// `AccountError::NotFound` when absent.
    pub async fn delete_account(&self, id: Uuid) -> Result<(), AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        let referencing = journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(id))
            .count(&self.db)
            .await?;
        if referencing > 0 {
            return Err(AccountError::HasJournalLines(referencing));
        }

        // Detach children, then delete, atomically.
        let txn = self.db.begin().await?;
        accounts::Entity::update_many()
            .col_expr(accounts::Column::ParentId, sea_orm::sea_query::Expr::value(Option::<Uuid>::None))
            .filter(accounts::Column::ParentId.eq(id))
            .exec(&txn)
            .await?;
        accounts::Entity::delete_by_id(account.id).exec(&txn).await?;
        txn.commit().await?;

        Ok(())
    }

    /// Counts journal lines referencing an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_journal_lines(&self, id: Uuid) -> Result<u64, AccountError> {
        Ok(journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(id))
            .count(&self.db)
            .await?)
    }

    /// Loads the whole chart into a metadata map for hierarchy walks.
    /// Charts of accounts are small; one query keeps the walk synchronous.
    async fn load_meta_map(&self) -> Result<HashMap<AccountId, AccountMeta>, AccountError> {
        let all = accounts::Entity::find().all(&self.db).await?;
        Ok(all
            .iter()
            .map(|m| (AccountId::from_uuid(m.id), to_meta(m)))
            .collect())
    }
}
