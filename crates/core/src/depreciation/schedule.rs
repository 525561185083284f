//! Depreciation schedule generation.
//!
//! The generator computes the full periodic schedule for an asset from its
//! parameters. Regeneration always starts from scratch; parameter changes
//! (method, rate, dates) invalidate the entire series' shape, so there is no
//! incremental update path.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use super::error::DepreciationError;
use super::types::{
    DepreciationBasis, DepreciationMethod, DepreciationParams, ScheduleRow, ScheduleSummary,
};

/// Absolute tolerance for "book value has reached the residual floor".
fn epsilon() -> Decimal {
    Decimal::new(1, 4)
}

/// Depreciation schedule generator.
///
/// Pure computation, no persistence. The repository layer wraps the
/// delete-and-insert of regenerated rows in a storage transaction.
pub struct ScheduleGenerator;

impl ScheduleGenerator {
    /// Computes the full schedule for an asset.
    ///
    /// Returns an empty schedule for non-depreciable categories (LAND),
    /// non-positive useful life, or non-positive acquisition value.
    ///
    /// # Errors
    ///
    /// Returns `DepreciationError` when the monetary preconditions fail
    /// (negative residual, residual not below acquisition) or declining
    /// balance lacks a rate class. These are never silently clamped.
    pub fn generate(params: &DepreciationParams) -> Result<Vec<ScheduleRow>, DepreciationError> {
        if !params.category.is_depreciable()
            || params.useful_life_years <= 0
            || params.acquisition_value <= Decimal::ZERO
        {
            return Ok(Vec::new());
        }

        Self::validate_values(params)?;

        let annual_rate = Self::annual_rate(params)?;
        let flat_expense = Self::straight_line_expense(params);
        let anchor = Self::anchor_date(params);
        let cap = Self::period_cap(params);

        Ok(Self::build(params, annual_rate, flat_expense, anchor, cap))
    }

    /// Summarizes a schedule.
    #[must_use]
    pub fn summarize(params: &DepreciationParams, rows: &[ScheduleRow]) -> ScheduleSummary {
        let total_expense: Decimal = rows.iter().map(|r| r.expense).sum();
        ScheduleSummary {
            periods: rows.len(),
            total_expense,
            ending_book_value: rows
                .last()
                .map_or(params.acquisition_value, |r| r.closing_value),
        }
    }

    /// Validates the monetary preconditions for a depreciable asset.
    pub(crate) fn validate_values(params: &DepreciationParams) -> Result<(), DepreciationError> {
        if params.residual_value < Decimal::ZERO {
            return Err(DepreciationError::NegativeResidual(params.residual_value));
        }
        if params.acquisition_value <= params.residual_value {
            return Err(DepreciationError::ResidualNotBelowAcquisition {
                acquisition: params.acquisition_value,
                residual: params.residual_value,
            });
        }
        Ok(())
    }

    /// Resolves the annual rate for the configured method.
    pub(crate) fn annual_rate(params: &DepreciationParams) -> Result<Decimal, DepreciationError> {
        match params.method {
            DepreciationMethod::StraightLine => {
                Ok((Decimal::ONE / Decimal::from(params.useful_life_years)).round_dp(6))
            }
            DepreciationMethod::DecliningBalance => params
                .class
                .map(super::types::DepreciationClass::annual_rate)
                .ok_or(DepreciationError::MissingDepreciationClass),
        }
    }

    /// Flat straight-line expense per period: the depreciable base divided
    /// evenly over the life, not recomputed from the declining balance.
    pub(crate) fn straight_line_expense(params: &DepreciationParams) -> Decimal {
        let periods =
            Decimal::from(params.useful_life_years) * Decimal::from(params.basis.periods_per_year());
        ((params.acquisition_value - params.residual_value) / periods).round_dp(2)
    }

    /// Maximum number of periods the schedule may span.
    pub(crate) fn period_cap(params: &DepreciationParams) -> usize {
        let years = usize::try_from(params.useful_life_years).unwrap_or(0);
        years * params.basis.periods_per_year() as usize
    }

    /// Anchor for period 1: declared start date, else commissioning date,
    /// else January 1 of the registration year; normalized to the first of
    /// its period.
    pub(crate) fn anchor_date(params: &DepreciationParams) -> NaiveDate {
        let date = params
            .start_date
            .or(params.commissioned_date)
            .or_else(|| NaiveDate::from_ymd_opt(params.registered_year, 1, 1))
            .unwrap_or_default();
        date.with_day(1).unwrap_or(date)
    }

    /// Runs the per-period computation.
    ///
    /// All money values are rounded to 2 decimals after each period's
    /// expense computation; unrounded fractional cents are never carried
    /// forward.
    pub(crate) fn build(
        params: &DepreciationParams,
        annual_rate: Decimal,
        flat_expense: Decimal,
        anchor: NaiveDate,
        max_periods: usize,
    ) -> Vec<ScheduleRow> {
        let residual = params.residual_value.round_dp(2);
        let per_period_rate = annual_rate / Decimal::from(params.basis.periods_per_year());

        let mut rows = Vec::new();
        let mut opening = params.acquisition_value.round_dp(2);
        let mut accumulated = Decimal::ZERO;

        for index in 0..max_periods {
            if (opening - residual).abs() <= epsilon() {
                break;
            }

            let raw = match params.method {
                DepreciationMethod::StraightLine => {
                    if index + 1 == max_periods {
                        // Final period absorbs the rounding remainder and
                        // lands exactly on the residual floor.
                        (opening - residual).round_dp(2)
                    } else {
                        flat_expense
                    }
                }
                DepreciationMethod::DecliningBalance => (opening * per_period_rate).round_dp(2),
            };

            let expense = if opening - raw < residual {
                (opening - residual).round_dp(2)
            } else {
                raw
            };

            accumulated += expense;
            let closing = opening - expense;

            rows.push(ScheduleRow {
                period: Self::period_start(anchor, index, params.basis),
                method: params.method,
                annual_rate,
                opening_value: opening,
                expense,
                accumulated,
                closing_value: closing,
            });

            if (closing - residual).abs() <= epsilon() {
                break;
            }
            opening = closing;
        }

        rows
    }

    /// First day of period `index` (0-based) from the anchor.
    fn period_start(anchor: NaiveDate, index: usize, basis: DepreciationBasis) -> NaiveDate {
        let step = match basis {
            DepreciationBasis::Monthly => 1,
            DepreciationBasis::Yearly => 12,
        };
        let months0 = u32::try_from(index).unwrap_or(u32::MAX / 13) * step + anchor.month0();
        let year = anchor.year() + i32::try_from(months0 / 12).unwrap_or(0);
        NaiveDate::from_ymd_opt(year, months0 % 12 + 1, 1).unwrap_or(anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depreciation::types::{AssetCategory, DepreciationClass};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn straight_line_params(
        acquisition: Decimal,
        residual: Decimal,
        life: i32,
    ) -> DepreciationParams {
        DepreciationParams {
            category: AssetCategory::Machinery,
            acquisition_value: acquisition,
            residual_value: residual,
            useful_life_years: life,
            method: DepreciationMethod::StraightLine,
            class: None,
            basis: DepreciationBasis::Yearly,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            commissioned_date: None,
            registered_year: 2024,
        }
    }

    fn declining_params(
        acquisition: Decimal,
        residual: Decimal,
        life: i32,
        class: DepreciationClass,
    ) -> DepreciationParams {
        DepreciationParams {
            method: DepreciationMethod::DecliningBalance,
            class: Some(class),
            ..straight_line_params(acquisition, residual, life)
        }
    }

    #[test]
    fn test_straight_line_reference_scenario() {
        // 120,000,000 over 10 years, no residual, anchored 2024-01.
        let params = straight_line_params(dec!(120000000), dec!(0), 10);
        let rows = ScheduleGenerator::generate(&params).unwrap();

        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].expense, dec!(12000000.00));
        assert_eq!(rows[0].period, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(rows[1].accumulated, dec!(24000000.00));
        assert_eq!(rows[1].period, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(rows[9].closing_value, dec!(0.00));
        assert_eq!(rows[9].period, NaiveDate::from_ymd_opt(2033, 1, 1).unwrap());
    }

    #[test]
    fn test_straight_line_monthly_basis() {
        let mut params = straight_line_params(dec!(1200), dec!(0), 1);
        params.basis = DepreciationBasis::Monthly;
        let rows = ScheduleGenerator::generate(&params).unwrap();

        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].expense, dec!(100.00));
        assert_eq!(rows[1].period, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(rows[11].period, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(rows[11].closing_value, dec!(0.00));
    }

    #[test]
    fn test_straight_line_final_period_clip() {
        // 100.00 over 3 years: 33.33 + 33.33 + 33.34.
        let params = straight_line_params(dec!(100), dec!(0), 3);
        let rows = ScheduleGenerator::generate(&params).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].expense, dec!(33.33));
        assert_eq!(rows[1].expense, dec!(33.33));
        assert_eq!(rows[2].expense, dec!(33.34));
        assert_eq!(rows[2].closing_value, dec!(0.00));
    }

    #[test]
    fn test_land_is_not_depreciated() {
        let mut params = straight_line_params(dec!(500000000), dec!(0), 10);
        params.category = AssetCategory::Land;
        assert!(ScheduleGenerator::generate(&params).unwrap().is_empty());
    }

    #[test]
    fn test_zero_life_yields_empty_schedule() {
        let params = straight_line_params(dec!(1000), dec!(0), 0);
        assert!(ScheduleGenerator::generate(&params).unwrap().is_empty());
    }

    #[test]
    fn test_non_positive_acquisition_yields_empty_schedule() {
        let params = straight_line_params(dec!(0), dec!(0), 5);
        assert!(ScheduleGenerator::generate(&params).unwrap().is_empty());
    }

    #[test]
    fn test_residual_at_or_above_acquisition_rejected() {
        let params = straight_line_params(dec!(1000), dec!(1000), 5);
        assert!(matches!(
            ScheduleGenerator::generate(&params),
            Err(DepreciationError::ResidualNotBelowAcquisition { .. })
        ));
    }

    #[test]
    fn test_negative_residual_rejected() {
        let params = straight_line_params(dec!(1000), dec!(-1), 5);
        assert!(matches!(
            ScheduleGenerator::generate(&params),
            Err(DepreciationError::NegativeResidual(_))
        ));
    }

    #[test]
    fn test_declining_balance_requires_class() {
        let mut params = straight_line_params(dec!(1000), dec!(0), 5);
        params.method = DepreciationMethod::DecliningBalance;
        assert!(matches!(
            ScheduleGenerator::generate(&params),
            Err(DepreciationError::MissingDepreciationClass)
        ));
    }

    #[test]
    fn test_declining_balance_expense_follows_book_value() {
        let params = declining_params(dec!(10000), dec!(1000), 8, DepreciationClass::Group2);
        let rows = ScheduleGenerator::generate(&params).unwrap();

        // 25% of the declining book value, clipped at the residual floor.
        assert_eq!(rows[0].expense, dec!(2500.00));
        assert_eq!(rows[0].closing_value, dec!(7500.00));
        assert_eq!(rows[1].expense, dec!(1875.00));
        assert_eq!(rows[1].closing_value, dec!(5625.00));
        for row in &rows {
            assert!(row.closing_value >= dec!(1000));
        }
    }

    #[test]
    fn test_declining_balance_stops_at_residual() {
        let params = declining_params(dec!(2000), dec!(1900), 8, DepreciationClass::Group1);
        let rows = ScheduleGenerator::generate(&params).unwrap();

        // 50% of 2000 = 1000 would cross the floor; clipped to 100.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].expense, dec!(100.00));
        assert_eq!(rows[0].closing_value, dec!(1900.00));
    }

    #[test]
    fn test_anchor_falls_back_to_commissioned_then_registration_year() {
        let mut params = straight_line_params(dec!(1000), dec!(0), 2);
        params.start_date = None;
        params.commissioned_date = NaiveDate::from_ymd_opt(2022, 7, 15);
        let rows = ScheduleGenerator::generate(&params).unwrap();
        assert_eq!(rows[0].period, NaiveDate::from_ymd_opt(2022, 7, 1).unwrap());

        params.commissioned_date = None;
        params.registered_year = 2021;
        let rows = ScheduleGenerator::generate(&params).unwrap();
        assert_eq!(rows[0].period, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
    }

    #[test]
    fn test_regeneration_is_deterministic() {
        let params = declining_params(dec!(87654.32), dec!(1234.56), 16, DepreciationClass::Group3);
        let first = ScheduleGenerator::generate(&params).unwrap();
        let second = ScheduleGenerator::generate(&params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary() {
        let params = straight_line_params(dec!(120000000), dec!(0), 10);
        let rows = ScheduleGenerator::generate(&params).unwrap();
        let summary = ScheduleGenerator::summarize(&params, &rows);

        assert_eq!(summary.periods, 10);
        assert_eq!(summary.total_expense, dec!(120000000.00));
        assert_eq!(summary.ending_book_value, dec!(0.00));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Straight-line schedules depreciate exactly the depreciable base:
        /// total expense equals acquisition minus residual within a cent.
        #[test]
        fn prop_straight_line_total_expense(
            acquisition_cents in 1_000i64..2_000_000_000,
            residual_ratio in 0u32..90,
            life in 1i32..40,
        ) {
            let acquisition = Decimal::new(acquisition_cents, 2);
            let residual = (acquisition * Decimal::from(residual_ratio)
                / Decimal::ONE_HUNDRED).round_dp(2);
            prop_assume!(acquisition > residual);

            let params = straight_line_params(acquisition, residual, life);
            let rows = ScheduleGenerator::generate(&params).unwrap();
            let total: Decimal = rows.iter().map(|r| r.expense).sum();

            let target = acquisition - residual;
            prop_assert!((total - target).abs() <= dec!(0.01),
                "total {total} vs target {target}");
        }

        /// The closing value never drops below the residual under either
        /// method, and accumulation is consistent row to row.
        #[test]
        fn prop_closing_never_below_residual(
            acquisition_cents in 1_000i64..2_000_000_000,
            residual_ratio in 0u32..90,
            life in 1i32..40,
            class_idx in 0usize..5,
            monthly in proptest::bool::ANY,
        ) {
            let classes = [
                DepreciationClass::Group1,
                DepreciationClass::Group2,
                DepreciationClass::Group3,
                DepreciationClass::Group4,
                DepreciationClass::BuildingPermanent,
            ];
            let acquisition = Decimal::new(acquisition_cents, 2);
            let residual = (acquisition * Decimal::from(residual_ratio)
                / Decimal::ONE_HUNDRED).round_dp(2);
            prop_assume!(acquisition > residual);

            let mut params = declining_params(acquisition, residual, life, classes[class_idx]);
            if monthly {
                params.basis = DepreciationBasis::Monthly;
            }
            let rows = ScheduleGenerator::generate(&params).unwrap();

            let mut accumulated = Decimal::ZERO;
            for row in &rows {
                prop_assert!(row.closing_value >= residual);
                prop_assert_eq!(row.closing_value, row.opening_value - row.expense);
                accumulated += row.expense;
                prop_assert_eq!(row.accumulated, accumulated);
            }
        }
    }
}
