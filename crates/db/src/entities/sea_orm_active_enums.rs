//! `SeaORM` active enums mirroring the Postgres enum types.
//!
//! Conversions to and from the `tirta-core` domain enums live here so
//! repositories never match on storage strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account type (`account_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Asset account.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Liability account.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Equity account.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Revenue account.
    #[sea_orm(string_value = "revenue")]
    Revenue,
    /// Expense account.
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Contra-asset account.
    #[sea_orm(string_value = "contra_asset")]
    ContraAsset,
    /// Contra-revenue account.
    #[sea_orm(string_value = "contra_revenue")]
    ContraRevenue,
}

/// Normal balance side (`normal_balance`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "normal_balance")]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debit-normal.
    #[sea_orm(string_value = "debit")]
    Debit,
    /// Credit-normal.
    #[sea_orm(string_value = "credit")]
    Credit,
}

/// Cost category kind (`category_kind`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "category_kind")]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryKind {
    /// Expense (biaya).
    #[sea_orm(string_value = "BIAYA")]
    Biaya,
    /// Revenue (pendapatan).
    #[sea_orm(string_value = "PENDAPATAN")]
    Pendapatan,
    /// Asset (aset).
    #[sea_orm(string_value = "ASET")]
    Aset,
}

/// Asset category (`asset_category`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "asset_category")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetCategory {
    /// Land (non-depreciable).
    #[sea_orm(string_value = "LAND")]
    Land,
    /// Buildings.
    #[sea_orm(string_value = "BUILDING")]
    Building,
    /// Pipelines.
    #[sea_orm(string_value = "PIPELINE")]
    Pipeline,
    /// Machinery.
    #[sea_orm(string_value = "MACHINERY")]
    Machinery,
    /// Vehicles.
    #[sea_orm(string_value = "VEHICLE")]
    Vehicle,
    /// Office equipment.
    #[sea_orm(string_value = "OFFICE_EQUIPMENT")]
    OfficeEquipment,
}

/// Depreciation method (`depreciation_method`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "depreciation_method")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepreciationMethod {
    /// Straight line.
    #[sea_orm(string_value = "STRAIGHT_LINE")]
    StraightLine,
    /// Declining balance.
    #[sea_orm(string_value = "DECLINING_BALANCE")]
    DecliningBalance,
}

/// Depreciation basis (`depreciation_basis`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "depreciation_basis")]
#[serde(rename_all = "UPPERCASE")]
pub enum DepreciationBasis {
    /// Monthly periods.
    #[sea_orm(string_value = "MONTHLY")]
    Monthly,
    /// Yearly periods.
    #[sea_orm(string_value = "YEARLY")]
    Yearly,
}

/// Declining-balance rate class (`depreciation_class`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "depreciation_class")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepreciationClass {
    /// 50% band.
    #[sea_orm(string_value = "GROUP_1")]
    Group1,
    /// 25% band.
    #[sea_orm(string_value = "GROUP_2")]
    Group2,
    /// 12.5% band.
    #[sea_orm(string_value = "GROUP_3")]
    Group3,
    /// 10% band.
    #[sea_orm(string_value = "GROUP_4")]
    Group4,
    /// 5% band (permanent buildings).
    #[sea_orm(string_value = "BUILDING_PERMANENT")]
    BuildingPermanent,
}

// ============================================================================
// Conversions to/from domain enums
// ============================================================================

impl From<AccountType> for tirta_core::account::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
            AccountType::ContraAsset => Self::ContraAsset,
            AccountType::ContraRevenue => Self::ContraRevenue,
        }
    }
}

impl From<tirta_core::account::AccountType> for AccountType {
    fn from(value: tirta_core::account::AccountType) -> Self {
        use tirta_core::account::AccountType as Domain;
        match value {
            Domain::Asset => Self::Asset,
            Domain::Liability => Self::Liability,
            Domain::Equity => Self::Equity,
            Domain::Revenue => Self::Revenue,
            Domain::Expense => Self::Expense,
            Domain::ContraAsset => Self::ContraAsset,
            Domain::ContraRevenue => Self::ContraRevenue,
        }
    }
}

impl From<NormalBalance> for tirta_core::account::NormalBalance {
    fn from(value: NormalBalance) -> Self {
        match value {
            NormalBalance::Debit => Self::Debit,
            NormalBalance::Credit => Self::Credit,
        }
    }
}

impl From<tirta_core::account::NormalBalance> for NormalBalance {
    fn from(value: tirta_core::account::NormalBalance) -> Self {
        use tirta_core::account::NormalBalance as Domain;
        match value {
            Domain::Debit => Self::Debit,
            Domain::Credit => Self::Credit,
        }
    }
}

impl From<CategoryKind> for tirta_core::category::CategoryKind {
    fn from(value: CategoryKind) -> Self {
        match value {
            CategoryKind::Biaya => Self::Biaya,
            CategoryKind::Pendapatan => Self::Pendapatan,
            CategoryKind::Aset => Self::Aset,
        }
    }
}

impl From<tirta_core::category::CategoryKind> for CategoryKind {
    fn from(value: tirta_core::category::CategoryKind) -> Self {
        use tirta_core::category::CategoryKind as Domain;
        match value {
            Domain::Biaya => Self::Biaya,
            Domain::Pendapatan => Self::Pendapatan,
            Domain::Aset => Self::Aset,
        }
    }
}

impl From<AssetCategory> for tirta_core::depreciation::AssetCategory {
    fn from(value: AssetCategory) -> Self {
        match value {
            AssetCategory::Land => Self::Land,
            AssetCategory::Building => Self::Building,
            AssetCategory::Pipeline => Self::Pipeline,
            AssetCategory::Machinery => Self::Machinery,
            AssetCategory::Vehicle => Self::Vehicle,
            AssetCategory::OfficeEquipment => Self::OfficeEquipment,
        }
    }
}

impl From<tirta_core::depreciation::AssetCategory> for AssetCategory {
    fn from(value: tirta_core::depreciation::AssetCategory) -> Self {
        use tirta_core::depreciation::AssetCategory as Domain;
        match value {
            Domain::Land => Self::Land,
            Domain::Building => Self::Building,
            Domain::Pipeline => Self::Pipeline,
            Domain::Machinery => Self::Machinery,
            Domain::Vehicle => Self::Vehicle,
            Domain::OfficeEquipment => Self::OfficeEquipment,
        }
    }
}

impl From<DepreciationMethod> for tirta_core::depreciation::DepreciationMethod {
    fn from(value: DepreciationMethod) -> Self {
        match value {
            DepreciationMethod::StraightLine => Self::StraightLine,
            DepreciationMethod::DecliningBalance => Self::DecliningBalance,
        }
    }
}

impl From<tirta_core::depreciation::DepreciationMethod> for DepreciationMethod {
    fn from(value: tirta_core::depreciation::DepreciationMethod) -> Self {
        use tirta_core::depreciation::DepreciationMethod as Domain;
        match value {
            Domain::StraightLine => Self::StraightLine,
            Domain::DecliningBalance => Self::DecliningBalance,
        }
    }
}

impl From<DepreciationBasis> for tirta_core::depreciation::DepreciationBasis {
    fn from(value: DepreciationBasis) -> Self {
        match value {
            DepreciationBasis::Monthly => Self::Monthly,
            DepreciationBasis::Yearly => Self::Yearly,
        }
    }
}

impl From<tirta_core::depreciation::DepreciationBasis> for DepreciationBasis {
    fn from(value: tirta_core::depreciation::DepreciationBasis) -> Self {
        use tirta_core::depreciation::DepreciationBasis as Domain;
        match value {
            Domain::Monthly => Self::Monthly,
            Domain::Yearly => Self::Yearly,
        }
    }
}

impl From<DepreciationClass> for tirta_core::depreciation::DepreciationClass {
    fn from(value: DepreciationClass) -> Self {
        match value {
            DepreciationClass::Group1 => Self::Group1,
            DepreciationClass::Group2 => Self::Group2,
            DepreciationClass::Group3 => Self::Group3,
            DepreciationClass::Group4 => Self::Group4,
            DepreciationClass::BuildingPermanent => Self::BuildingPermanent,
        }
    }
}

impl From<tirta_core::depreciation::DepreciationClass> for DepreciationClass {
    fn from(value: tirta_core::depreciation::DepreciationClass) -> Self {
        use tirta_core::depreciation::DepreciationClass as Domain;
        match value {
            Domain::Group1 => Self::Group1,
            Domain::Group2 => Self::Group2,
            Domain::Group3 => Self::Group3,
            Domain::Group4 => Self::Group4,
            Domain::BuildingPermanent => Self::BuildingPermanent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_account_type_roundtrip() {
        for value in AccountType::iter() {
            let domain: tirta_core::account::AccountType = value.into();
            assert_eq!(AccountType::from(domain), value);
        }
    }

    #[test]
    fn test_depreciation_enums_roundtrip() {
        for value in AssetCategory::iter() {
            let domain: tirta_core::depreciation::AssetCategory = value.into();
            assert_eq!(AssetCategory::from(domain), value);
        }
        for value in DepreciationClass::iter() {
            let domain: tirta_core::depreciation::DepreciationClass = value.into();
            assert_eq!(DepreciationClass::from(domain), value);
        }
        for value in DepreciationMethod::iter() {
            let domain: tirta_core::depreciation::DepreciationMethod = value.into();
            assert_eq!(DepreciationMethod::from(domain), value);
        }
    }

    #[test]
    fn test_category_kind_roundtrip() {
        for value in CategoryKind::iter() {
            let domain: tirta_core::category::CategoryKind = value.into();
            assert_eq!(CategoryKind::from(domain), value);
        }
    }
}
