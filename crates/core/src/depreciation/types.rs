//! Depreciation domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Depreciation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepreciationMethod {
    /// Constant expense per period over the useful life.
    StraightLine,
    /// Fixed percentage of the current book value per period.
    DecliningBalance,
}

impl DepreciationMethod {
    /// Parses a method from its wire string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "STRAIGHT_LINE" => Some(Self::StraightLine),
            "DECLINING_BALANCE" => Some(Self::DecliningBalance),
            _ => None,
        }
    }

    /// Returns the wire string for this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StraightLine => "STRAIGHT_LINE",
            Self::DecliningBalance => "DECLINING_BALANCE",
        }
    }
}

/// Period basis for a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DepreciationBasis {
    /// One period per month; annual figures are sliced by 12.
    Monthly,
    /// One period per year.
    Yearly,
}

impl DepreciationBasis {
    /// Parses a basis from its wire string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "MONTHLY" => Some(Self::Monthly),
            "YEARLY" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Returns the wire string for this basis.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// Number of periods in one year on this basis.
    #[must_use]
    pub const fn periods_per_year(self) -> u32 {
        match self {
            Self::Monthly => 12,
            Self::Yearly => 1,
        }
    }
}

/// Asset category. LAND is explicitly non-depreciable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetCategory {
    /// Land.
    Land,
    /// Buildings.
    Building,
    /// Transmission and distribution pipelines.
    Pipeline,
    /// Pumps, treatment installations, and other machinery.
    Machinery,
    /// Vehicles.
    Vehicle,
    /// Office equipment and furniture.
    OfficeEquipment,
}

impl AssetCategory {
    /// Returns true if assets in this category depreciate.
    #[must_use]
    pub const fn is_depreciable(self) -> bool {
        !matches!(self, Self::Land)
    }

    /// Parses a category from its wire string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LAND" => Some(Self::Land),
            "BUILDING" => Some(Self::Building),
            "PIPELINE" => Some(Self::Pipeline),
            "MACHINERY" => Some(Self::Machinery),
            "VEHICLE" => Some(Self::Vehicle),
            "OFFICE_EQUIPMENT" => Some(Self::OfficeEquipment),
            _ => None,
        }
    }

    /// Returns the wire string for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Land => "LAND",
            Self::Building => "BUILDING",
            Self::Pipeline => "PIPELINE",
            Self::Machinery => "MACHINERY",
            Self::Vehicle => "VEHICLE",
            Self::OfficeEquipment => "OFFICE_EQUIPMENT",
        }
    }
}

/// Rate lookup class for the declining-balance method.
///
/// Groups follow the reducing-balance bands commonly used for utility
/// assets: short-lived equipment at the top, permanent structures at the
/// bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepreciationClass {
    /// Useful life up to 4 years - 50%.
    Group1,
    /// Useful life 4-8 years - 25%.
    Group2,
    /// Useful life 8-16 years - 12.5%.
    Group3,
    /// Useful life 16-20 years - 10%.
    Group4,
    /// Permanent buildings - 5%.
    BuildingPermanent,
}

impl DepreciationClass {
    /// Annual declining-balance rate for this class.
    #[must_use]
    pub fn annual_rate(self) -> Decimal {
        match self {
            Self::Group1 => Decimal::new(50, 2),
            Self::Group2 => Decimal::new(25, 2),
            Self::Group3 => Decimal::new(125, 3),
            Self::Group4 => Decimal::new(10, 2),
            Self::BuildingPermanent => Decimal::new(5, 2),
        }
    }

    /// Parses a class from its wire string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GROUP_1" => Some(Self::Group1),
            "GROUP_2" => Some(Self::Group2),
            "GROUP_3" => Some(Self::Group3),
            "GROUP_4" => Some(Self::Group4),
            "BUILDING_PERMANENT" => Some(Self::BuildingPermanent),
            _ => None,
        }
    }

    /// Returns the wire string for this class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Group1 => "GROUP_1",
            Self::Group2 => "GROUP_2",
            Self::Group3 => "GROUP_3",
            Self::Group4 => "GROUP_4",
            Self::BuildingPermanent => "BUILDING_PERMANENT",
        }
    }
}

/// Asset parameters driving schedule generation.
#[derive(Debug, Clone)]
pub struct DepreciationParams {
    /// Asset category.
    pub category: AssetCategory,
    /// Acquisition value.
    pub acquisition_value: Decimal,
    /// Residual (salvage) value the book value never drops below.
    pub residual_value: Decimal,
    /// Useful life in years.
    pub useful_life_years: i32,
    /// Depreciation method.
    pub method: DepreciationMethod,
    /// Rate lookup class (required for declining balance).
    pub class: Option<DepreciationClass>,
    /// Period basis.
    pub basis: DepreciationBasis,
    /// Declared depreciation start date.
    pub start_date: Option<NaiveDate>,
    /// Commissioning date, used when no start date is declared.
    pub commissioned_date: Option<NaiveDate>,
    /// Registration year, the last-resort anchor.
    pub registered_year: i32,
}

/// One computed depreciation period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// First day of the period.
    pub period: NaiveDate,
    /// Method in effect when the row was computed.
    pub method: DepreciationMethod,
    /// Annual rate in effect.
    pub annual_rate: Decimal,
    /// Book value at the start of the period.
    pub opening_value: Decimal,
    /// Depreciation expense for the period.
    pub expense: Decimal,
    /// Accumulated depreciation through this period.
    pub accumulated: Decimal,
    /// Book value at the end of the period.
    pub closing_value: Decimal,
}

/// Aggregate view over a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Number of periods in the schedule.
    pub periods: usize,
    /// Total depreciation expense across all periods.
    pub total_expense: Decimal,
    /// Book value after the final period (acquisition value for an empty
    /// schedule).
    pub ending_book_value: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(DepreciationClass::Group1, dec!(0.50))]
    #[case(DepreciationClass::Group2, dec!(0.25))]
    #[case(DepreciationClass::Group3, dec!(0.125))]
    #[case(DepreciationClass::Group4, dec!(0.10))]
    #[case(DepreciationClass::BuildingPermanent, dec!(0.05))]
    fn test_class_rates(#[case] class: DepreciationClass, #[case] rate: Decimal) {
        assert_eq!(class.annual_rate(), rate);
        assert_eq!(DepreciationClass::parse(class.as_str()), Some(class));
    }

    #[rstest]
    #[case("STRAIGHT_LINE", Some(DepreciationMethod::StraightLine))]
    #[case("declining_balance", Some(DepreciationMethod::DecliningBalance))]
    #[case("DOUBLE_DECLINING", None)]
    fn test_method_parse(#[case] input: &str, #[case] expected: Option<DepreciationMethod>) {
        assert_eq!(DepreciationMethod::parse(input), expected);
    }

    #[rstest]
    #[case(DepreciationBasis::Monthly, 12)]
    #[case(DepreciationBasis::Yearly, 1)]
    fn test_periods_per_year(#[case] basis: DepreciationBasis, #[case] periods: u32) {
        assert_eq!(basis.periods_per_year(), periods);
        assert_eq!(DepreciationBasis::parse(basis.as_str()), Some(basis));
    }

    #[test]
    fn test_only_land_is_non_depreciable() {
        for category in [
            AssetCategory::Building,
            AssetCategory::Pipeline,
            AssetCategory::Machinery,
            AssetCategory::Vehicle,
            AssetCategory::OfficeEquipment,
        ] {
            assert!(category.is_depreciable());
            assert_eq!(AssetCategory::parse(category.as_str()), Some(category));
        }
        assert!(!AssetCategory::Land.is_depreciable());
    }
}
