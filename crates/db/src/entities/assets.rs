//! `SeaORM` Entity for the assets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{
    AssetCategory, DepreciationBasis, DepreciationClass, DepreciationMethod,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub asset_number: String,
    pub name: String,
    pub category: AssetCategory,
    pub acquisition_value: Decimal,
    pub residual_value: Decimal,
    pub useful_life_years: i32,
    pub depreciation_method: DepreciationMethod,
    pub depreciation_class: Option<DepreciationClass>,
    pub depreciation_basis: DepreciationBasis,
    pub depreciation_start_date: Option<Date>,
    pub commissioned_date: Option<Date>,
    pub registered_year: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::depreciation_entries::Entity")]
    DepreciationEntries,
}

impl Related<super::depreciation_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DepreciationEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
