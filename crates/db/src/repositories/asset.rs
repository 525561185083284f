//! Asset repository: asset master rows plus their depreciation schedules.
//!
//! Schedule regeneration is destructive by design: all prior rows for the
//! asset are deleted and the recomputed series inserted inside one database
//! transaction, so readers never observe a partially rewritten schedule.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tirta_core::depreciation::{
    AssetCategory, DepreciationBasis, DepreciationClass, DepreciationMethod, DepreciationParams,
    ScheduleGenerator, ScheduleRow, ScheduleSummary, SimulationRequest, simulate,
};
use uuid::Uuid;

use crate::entities::{assets, depreciation_entries};
use crate::repositories::sequence::{ASSET_PREFIX, SequenceRepository};

/// Error types for asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Asset not found.
    #[error("Asset not found: {0}")]
    NotFound(Uuid),

    /// Depreciation computation rejected the parameters.
    #[error(transparent)]
    Depreciation(#[from] tirta_core::depreciation::DepreciationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering an asset.
#[derive(Debug, Clone)]
pub struct CreateAssetInput {
    /// Asset name.
    pub name: String,
    /// Asset category.
    pub category: AssetCategory,
    /// Acquisition value.
    pub acquisition_value: rust_decimal::Decimal,
    /// Residual value.
    pub residual_value: rust_decimal::Decimal,
    /// Useful life in years.
    pub useful_life_years: i32,
    /// Depreciation method.
    pub method: DepreciationMethod,
    /// Declining-balance rate class.
    pub class: Option<DepreciationClass>,
    /// Period basis.
    pub basis: DepreciationBasis,
    /// Declared depreciation start date.
    pub depreciation_start_date: Option<NaiveDate>,
    /// Commissioning date.
    pub commissioned_date: Option<NaiveDate>,
    /// Registration year.
    pub registered_year: i32,
}

/// Input for updating depreciation parameters; every change triggers a full
/// schedule regeneration.
#[derive(Debug, Clone, Default)]
pub struct UpdateDepreciationInput {
    /// Acquisition value.
    pub acquisition_value: Option<rust_decimal::Decimal>,
    /// Residual value.
    pub residual_value: Option<rust_decimal::Decimal>,
    /// Useful life in years.
    pub useful_life_years: Option<i32>,
    /// Depreciation method.
    pub method: Option<DepreciationMethod>,
    /// Rate class (outer None = unchanged, inner None = clear).
    pub class: Option<Option<DepreciationClass>>,
    /// Period basis.
    pub basis: Option<DepreciationBasis>,
    /// Start date (outer None = unchanged, inner None = clear).
    pub depreciation_start_date: Option<Option<NaiveDate>>,
    /// Commissioning date (outer None = unchanged, inner None = clear).
    pub commissioned_date: Option<Option<NaiveDate>>,
}

/// Converts an asset row into the parameters the generator consumes.
#[must_use]
pub fn to_params(model: &assets::Model) -> DepreciationParams {
    DepreciationParams {
        category: model.category.into(),
        acquisition_value: model.acquisition_value,
        residual_value: model.residual_value,
        useful_life_years: model.useful_life_years,
        method: model.depreciation_method.into(),
        class: model.depreciation_class.map(Into::into),
        basis: model.depreciation_basis.into(),
        start_date: model.depreciation_start_date,
        commissioned_date: model.commissioned_date,
        registered_year: model.registered_year,
    }
}

/// Asset repository.
#[derive(Debug, Clone)]
pub struct AssetRepository {
    db: DatabaseConnection,
}

impl AssetRepository {
    /// Creates a new asset repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers an asset, allocates its asset number, and writes its
    /// initial depreciation schedule in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the depreciation parameters are invalid or the
    /// database operation fails.
    pub async fn create_asset(
        &self,
        input: CreateAssetInput,
    ) -> Result<assets::Model, AssetError> {
        let now = Utc::now();
        let today = now.date_naive();

        let params = DepreciationParams {
            category: input.category,
            acquisition_value: input.acquisition_value,
            residual_value: input.residual_value,
            useful_life_years: input.useful_life_years,
            method: input.method,
            class: input.class,
            basis: input.basis,
            start_date: input.depreciation_start_date,
            commissioned_date: input.commissioned_date,
            registered_year: input.registered_year,
        };
        // Validate and compute before any write.
        let rows = ScheduleGenerator::generate(&params)?;

        let txn = self.db.begin().await?;

        let asset_number = SequenceRepository::next_reference(
            &txn,
            ASSET_PREFIX,
            today,
            tirta_core::sequence::ASSET_PAD,
        )
        .await?;

        let asset = assets::ActiveModel {
            id: Set(Uuid::new_v4()),
            asset_number: Set(asset_number),
            name: Set(input.name),
            category: Set(input.category.into()),
            acquisition_value: Set(input.acquisition_value),
            residual_value: Set(input.residual_value),
            useful_life_years: Set(input.useful_life_years),
            depreciation_method: Set(input.method.into()),
            depreciation_class: Set(input.class.map(Into::into)),
            depreciation_basis: Set(input.basis.into()),
            depreciation_start_date: Set(input.depreciation_start_date),
            commissioned_date: Set(input.commissioned_date),
            registered_year: Set(input.registered_year),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let asset = asset.insert(&txn).await?;

        Self::insert_rows(&txn, asset.id, &rows).await?;
        txn.commit().await?;

        Ok(asset)
    }

    /// Finds an asset by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_asset_by_id(&self, id: Uuid) -> Result<Option<assets::Model>, AssetError> {
        Ok(assets::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Loads an asset with its schedule rows and summary.
    ///
    /// # Errors
    ///
    /// Returns `AssetError::NotFound` when the asset is absent.
    pub async fn get_depreciation(
        &self,
        id: Uuid,
    ) -> Result<(assets::Model, Vec<depreciation_entries::Model>, ScheduleSummary), AssetError>
    {
        let asset = assets::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AssetError::NotFound(id))?;

        let entries = depreciation_entries::Entity::find()
            .filter(depreciation_entries::Column::AssetId.eq(id))
            .order_by_asc(depreciation_entries::Column::Period)
            .all(&self.db)
            .await?;

        let params = to_params(&asset);
        let rows: Vec<ScheduleRow> = entries.iter().map(to_schedule_row).collect();
        let summary = ScheduleGenerator::summarize(&params, &rows);

        Ok((asset, entries, summary))
    }

    /// Finds a single schedule entry by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_schedule_entry(
        &self,
        entry_id: Uuid,
    ) -> Result<Option<depreciation_entries::Model>, AssetError> {
        Ok(depreciation_entries::Entity::find_by_id(entry_id)
            .one(&self.db)
            .await?)
    }

    /// Updates depreciation parameters and regenerates the schedule.
    ///
    /// The delete-all/insert-all runs in one transaction; regeneration for
    /// different assets may proceed in parallel, while the same asset is
    /// last-writer-wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset is absent, the new parameters are
    /// invalid, or the database operation fails.
    pub async fn update_depreciation(
        &self,
        id: Uuid,
        input: UpdateDepreciationInput,
    ) -> Result<(assets::Model, Vec<depreciation_entries::Model>), AssetError> {
        let asset = assets::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AssetError::NotFound(id))?;

        let mut params = to_params(&asset);
        if let Some(value) = input.acquisition_value {
            params.acquisition_value = value;
        }
        if let Some(value) = input.residual_value {
            params.residual_value = value;
        }
        if let Some(value) = input.useful_life_years {
            params.useful_life_years = value;
        }
        if let Some(method) = input.method {
            params.method = method;
        }
        if let Some(class) = input.class {
            params.class = class;
        }
        if let Some(basis) = input.basis {
            params.basis = basis;
        }
        if let Some(start) = input.depreciation_start_date {
            params.start_date = start;
        }
        if let Some(commissioned) = input.commissioned_date {
            params.commissioned_date = commissioned;
        }

        // Validate and compute the new series before touching storage.
        let rows = ScheduleGenerator::generate(&params)?;

        let txn = self.db.begin().await?;

        let mut active: assets::ActiveModel = asset.into();
        active.acquisition_value = Set(params.acquisition_value);
        active.residual_value = Set(params.residual_value);
        active.useful_life_years = Set(params.useful_life_years);
        active.depreciation_method = Set(params.method.into());
        active.depreciation_class = Set(params.class.map(Into::into));
        active.depreciation_basis = Set(params.basis.into());
        active.depreciation_start_date = Set(params.start_date);
        active.commissioned_date = Set(params.commissioned_date);
        active.updated_at = Set(Utc::now().into());
        let asset = active.update(&txn).await?;

        depreciation_entries::Entity::delete_many()
            .filter(depreciation_entries::Column::AssetId.eq(id))
            .exec(&txn)
            .await?;
        Self::insert_rows(&txn, id, &rows).await?;

        txn.commit().await?;

        let entries = depreciation_entries::Entity::find()
            .filter(depreciation_entries::Column::AssetId.eq(id))
            .order_by_asc(depreciation_entries::Column::Period)
            .all(&self.db)
            .await?;

        Ok((asset, entries))
    }

    /// Runs a bounded simulation over the asset's parameters without
    /// persisting anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset is absent or the window/overrides are
    /// invalid.
    pub async fn simulate_depreciation(
        &self,
        id: Uuid,
        request: &SimulationRequest,
    ) -> Result<Vec<ScheduleRow>, AssetError> {
        let asset = assets::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AssetError::NotFound(id))?;

        Ok(simulate(&to_params(&asset), request)?)
    }

    async fn insert_rows(
        txn: &DatabaseTransaction,
        asset_id: Uuid,
        rows: &[ScheduleRow],
    ) -> Result<(), DbErr> {
        if rows.is_empty() {
            return Ok(());
        }

        let now = Utc::now().into();
        let models: Vec<depreciation_entries::ActiveModel> = rows
            .iter()
            .map(|row| depreciation_entries::ActiveModel {
                id: Set(Uuid::new_v4()),
                asset_id: Set(asset_id),
                period: Set(row.period),
                method: Set(row.method.into()),
                annual_rate: Set(row.annual_rate),
                opening_value: Set(row.opening_value),
                expense: Set(row.expense),
                accumulated: Set(row.accumulated),
                closing_value: Set(row.closing_value),
                created_at: Set(now),
            })
            .collect();

        depreciation_entries::Entity::insert_many(models)
            .exec(txn)
            .await?;
        Ok(())
    }
}

/// Converts a persisted entry back into the computation row shape.
#[must_use]
pub fn to_schedule_row(model: &depreciation_entries::Model) -> ScheduleRow {
    ScheduleRow {
        period: model.period,
        method: model.method.into(),
        annual_rate: model.annual_rate,
        opening_value: model.opening_value,
        expense: model.expense,
        accumulated: model.accumulated,
        closing_value: model.closing_value,
    }
}
