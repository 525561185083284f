//! Cost category repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use tirta_core::category::{CategoryKind, CostCategory};
use tirta_shared::types::{AccountId, CostCategoryId};
use uuid::Uuid;

use crate::entities::cost_categories;

/// Error types for cost category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category code already exists.
    #[error("Category code '{0}' already exists")]
    DuplicateCode(String),

    /// Category not found.
    #[error("Cost category not found: {0}")]
    NotFound(Uuid),

    /// Mapped account not found.
    #[error("Mapped account not found: {0}")]
    AccountNotFound(Uuid),

    /// Field validation failed.
    #[error(transparent)]
    Validation(#[from] tirta_core::category::CategoryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a cost category.
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Category code (unique).
    pub code: String,
    /// Category name.
    pub name: String,
    /// Business classification.
    pub kind: CategoryKind,
    /// Default debit account.
    pub debit_account_id: Option<Uuid>,
    /// Default credit account.
    pub credit_account_id: Option<Uuid>,
}

/// Input for updating a cost category.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    /// Category code.
    pub code: Option<String>,
    /// Category name.
    pub name: Option<String>,
    /// Business classification.
    pub kind: Option<CategoryKind>,
    /// Default debit account (outer None = unchanged, inner None = unmap).
    pub debit_account_id: Option<Option<Uuid>>,
    /// Default credit account (outer None = unchanged, inner None = unmap).
    pub credit_account_id: Option<Option<Uuid>>,
}

/// Converts an entity row into the domain type the mapper works on.
#[must_use]
pub fn to_domain(model: &cost_categories::Model) -> CostCategory {
    CostCategory {
        id: CostCategoryId::from_uuid(model.id),
        code: model.code.clone(),
        name: model.name.clone(),
        kind: model.kind.into(),
        debit_account_id: model.debit_account_id.map(AccountId::from_uuid),
        credit_account_id: model.credit_account_id.map(AccountId::from_uuid),
    }
}

/// Cost category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a cost category with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if code/name is empty, the code is in use, or a
    /// mapped account does not exist.
    pub async fn create_category(
        &self,
        input: CreateCategoryInput,
    ) -> Result<cost_categories::Model, CategoryError> {
        CostCategory::validate_fields(&input.code, &input.name)?;

        let existing = cost_categories::Entity::find()
            .filter(cost_categories::Column::Code.eq(&input.code))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CategoryError::DuplicateCode(input.code));
        }

        self.validate_account(input.debit_account_id).await?;
        self.validate_account(input.credit_account_id).await?;

        let now = Utc::now().into();
        let code = input.code.clone();
        let category = cost_categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(input.code),
            name: Set(input.name),
            kind: Set(input.kind.into()),
            debit_account_id: Set(input.debit_account_id),
            credit_account_id: Set(input.credit_account_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match category.insert(&self.db).await {
            Ok(model) => Ok(model),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(CategoryError::DuplicateCode(code))
                }
                _ => Err(err.into()),
            },
        }
    }

    /// Lists categories ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_categories(&self) -> Result<Vec<cost_categories::Model>, CategoryError> {
        Ok(cost_categories::Entity::find()
            .order_by_asc(cost_categories::Column::Code)
            .all(&self.db)
            .await?)
    }

    /// Finds a category by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_category_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<cost_categories::Model>, CategoryError> {
        Ok(cost_categories::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Updates a cost category.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is missing, the new code collides,
    /// or a newly mapped account does not exist.
    pub async fn update_category(
        &self,
        id: Uuid,
        input: UpdateCategoryInput,
    ) -> Result<cost_categories::Model, CategoryError> {
        let category = cost_categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))?;

        let code = input.code.as_deref().unwrap_or(&category.code);
        let name = input.name.as_deref().unwrap_or(&category.name);
        CostCategory::validate_fields(code, name)?;

        if let Some(new_code) = &input.code
            && *new_code != category.code
        {
            let existing = cost_categories::Entity::find()
                .filter(cost_categories::Column::Code.eq(new_code))
                .filter(cost_categories::Column::Id.ne(id))
                .one(&self.db)
                .await?;
            if existing.is_some() {
                return Err(CategoryError::DuplicateCode(new_code.clone()));
            }
        }

        if let Some(Some(account_id)) = input.debit_account_id {
            self.validate_account(Some(account_id)).await?;
        }
        if let Some(Some(account_id)) = input.credit_account_id {
            self.validate_account(Some(account_id)).await?;
        }

        let now = Utc::now().into();
        let mut active: cost_categories::ActiveModel = category.into();

        if let Some(code) = input.code {
            active.code = Set(code);
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(kind) = input.kind {
            active.kind = Set(kind.into());
        }
        if let Some(debit_account_id) = input.debit_account_id {
            active.debit_account_id = Set(debit_account_id);
        }
        if let Some(credit_account_id) = input.credit_account_id {
            active.credit_account_id = Set(credit_account_id);
        }
        active.updated_at = Set(now);

        Ok(active.update(&self.db).await?)
    }

    async fn validate_account(&self, account_id: Option<Uuid>) -> Result<(), CategoryError> {
        if let Some(id) = account_id {
            let account = crate::entities::accounts::Entity::find_by_id(id)
                .one(&self.db)
                .await?;
            if account.is_none() {
                return Err(CategoryError::AccountNotFound(id));
            }
        }
        Ok(())
    }
}
