//! Bounded, non-persisting depreciation simulation.
//!
//! Runs the same per-period computation as the schedule generator over an
//! explicit date window with optional overrides, without touching storage.
//! The window is capped so a single request can never produce unbounded
//! output.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use super::error::DepreciationError;
use super::schedule::ScheduleGenerator;
use super::types::{DepreciationBasis, DepreciationMethod, DepreciationParams, ScheduleRow};

/// Maximum simulation window on a monthly basis.
pub const MAX_MONTHLY_PERIODS: usize = 120;

/// Maximum simulation window on a yearly basis.
pub const MAX_YEARLY_PERIODS: usize = 50;

/// A simulation request: a date window plus parameter overrides.
#[derive(Debug, Clone)]
pub struct SimulationRequest {
    /// Window start (anchor of the first simulated period).
    pub from: NaiveDate,
    /// Window end (inclusive).
    pub to: NaiveDate,
    /// Period basis for the simulation.
    pub basis: DepreciationBasis,
    /// Optional method override.
    pub method: Option<DepreciationMethod>,
    /// Optional annual-rate override, in (0, 1].
    pub rate_override: Option<Decimal>,
}

/// Simulates depreciation over the requested window.
///
/// Returns the same row shape as the persisted schedule; nothing is stored.
/// Empty-schedule conditions (LAND, non-positive life or acquisition value)
/// yield an empty preview, mirroring regeneration.
///
/// # Errors
///
/// Returns `DepreciationError` when the window is inverted or exceeds the
/// basis limit (120 monthly / 50 yearly periods), when the rate override is
/// out of range, or when the effective parameters fail the monetary
/// preconditions.
pub fn simulate(
    params: &DepreciationParams,
    request: &SimulationRequest,
) -> Result<Vec<ScheduleRow>, DepreciationError> {
    if request.to < request.from {
        return Err(DepreciationError::WindowInvalid {
            from: request.from,
            to: request.to,
        });
    }

    let limit = match request.basis {
        DepreciationBasis::Monthly => MAX_MONTHLY_PERIODS,
        DepreciationBasis::Yearly => MAX_YEARLY_PERIODS,
    };
    let window = window_periods(request);
    if window > limit {
        return Err(DepreciationError::WindowTooLarge {
            periods: window,
            limit,
        });
    }

    if let Some(rate) = request.rate_override
        && (rate <= Decimal::ZERO || rate > Decimal::ONE)
    {
        return Err(DepreciationError::InvalidRateOverride(rate));
    }

    let mut effective = params.clone();
    effective.basis = request.basis;
    effective.start_date = Some(request.from);
    if let Some(method) = request.method {
        effective.method = method;
    }

    if !effective.category.is_depreciable()
        || effective.useful_life_years <= 0
        || effective.acquisition_value <= Decimal::ZERO
    {
        return Ok(Vec::new());
    }

    ScheduleGenerator::validate_values(&effective)?;

    let annual_rate = match request.rate_override {
        Some(rate) => rate,
        None => ScheduleGenerator::annual_rate(&effective)?,
    };
    let flat_expense = match request.rate_override {
        // An overridden rate redefines the straight-line slice as a share
        // of the depreciable base.
        Some(rate) => ((effective.acquisition_value - effective.residual_value) * rate
            / Decimal::from(effective.basis.periods_per_year()))
        .round_dp(2),
        None => ScheduleGenerator::straight_line_expense(&effective),
    };

    let anchor = ScheduleGenerator::anchor_date(&effective);
    let cap = window.min(ScheduleGenerator::period_cap(&effective));

    Ok(ScheduleGenerator::build(
        &effective,
        annual_rate,
        flat_expense,
        anchor,
        cap,
    ))
}

/// Number of periods the window spans on the requested basis, inclusive.
fn window_periods(request: &SimulationRequest) -> usize {
    match request.basis {
        DepreciationBasis::Monthly => {
            let months = (request.to.year() - request.from.year()) * 12
                + (i32::try_from(request.to.month()).unwrap_or(0)
                    - i32::try_from(request.from.month()).unwrap_or(0));
            usize::try_from(months).unwrap_or(0) + 1
        }
        DepreciationBasis::Yearly => {
            usize::try_from(request.to.year() - request.from.year()).unwrap_or(0) + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depreciation::types::AssetCategory;
    use rust_decimal_macros::dec;

    fn params() -> DepreciationParams {
        DepreciationParams {
            category: AssetCategory::Vehicle,
            acquisition_value: dec!(240000000),
            residual_value: dec!(0),
            useful_life_years: 10,
            method: DepreciationMethod::StraightLine,
            class: None,
            basis: DepreciationBasis::Yearly,
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            commissioned_date: None,
            registered_year: 2020,
        }
    }

    fn request(from: (i32, u32), to: (i32, u32), basis: DepreciationBasis) -> SimulationRequest {
        SimulationRequest {
            from: NaiveDate::from_ymd_opt(from.0, from.1, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(to.0, to.1, 1).unwrap(),
            basis,
            method: None,
            rate_override: None,
        }
    }

    #[test]
    fn test_simulation_window_monthly() {
        let req = request((2024, 1), (2024, 12), DepreciationBasis::Monthly);
        let rows = simulate(&params(), &req).unwrap();

        assert_eq!(rows.len(), 12);
        // 240M / 10y / 12 = 2M per month.
        assert_eq!(rows[0].expense, dec!(2000000.00));
        assert_eq!(rows[0].period, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(rows[11].period, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
    }

    #[test]
    fn test_simulation_is_not_truncated_by_short_life() {
        // Window of 15 years but only 10 years of life to depreciate.
        let req = request((2020, 1), (2034, 1), DepreciationBasis::Yearly);
        let rows = simulate(&params(), &req).unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[9].closing_value, dec!(0.00));
    }

    #[test]
    fn test_simulation_window_cap_monthly() {
        let req = request((2024, 1), (2034, 2), DepreciationBasis::Monthly);
        let err = simulate(&params(), &req).unwrap_err();
        assert!(matches!(
            err,
            DepreciationError::WindowTooLarge { periods: 122, limit: 120 }
        ));
    }

    #[test]
    fn test_simulation_window_cap_yearly() {
        let req = request((2000, 1), (2050, 1), DepreciationBasis::Yearly);
        let err = simulate(&params(), &req).unwrap_err();
        assert!(matches!(
            err,
            DepreciationError::WindowTooLarge { periods: 51, limit: 50 }
        ));
    }

    #[test]
    fn test_simulation_inverted_window() {
        let req = request((2024, 6), (2024, 1), DepreciationBasis::Monthly);
        assert!(matches!(
            simulate(&params(), &req),
            Err(DepreciationError::WindowInvalid { .. })
        ));
    }

    #[test]
    fn test_simulation_method_and_rate_override() {
        let mut req = request((2024, 1), (2026, 1), DepreciationBasis::Yearly);
        req.method = Some(DepreciationMethod::DecliningBalance);
        req.rate_override = Some(dec!(0.20));

        let rows = simulate(&params(), &req).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].expense, dec!(48000000.00));
        assert_eq!(rows[0].annual_rate, dec!(0.20));
        assert_eq!(rows[1].expense, dec!(38400000.00));
    }

    #[test]
    fn test_simulation_rejects_out_of_range_rate() {
        let mut req = request((2024, 1), (2025, 1), DepreciationBasis::Yearly);
        req.rate_override = Some(dec!(1.5));
        assert!(matches!(
            simulate(&params(), &req),
            Err(DepreciationError::InvalidRateOverride(_))
        ));
    }

    #[test]
    fn test_simulation_of_land_is_empty() {
        let mut p = params();
        p.category = AssetCategory::Land;
        let req = request((2024, 1), (2025, 1), DepreciationBasis::Yearly);
        assert!(simulate(&p, &req).unwrap().is_empty());
    }

    #[test]
    fn test_simulation_matches_persisted_schedule_shape() {
        // A simulation over the full life with no overrides reproduces the
        // generator's rows exactly.
        let p = params();
        let req = request((2020, 1), (2029, 1), DepreciationBasis::Yearly);
        let simulated = simulate(&p, &req).unwrap();
        let generated = ScheduleGenerator::generate(&p).unwrap();
        assert_eq!(simulated, generated);
    }
}
