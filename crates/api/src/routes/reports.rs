//! Trial balance / balance sheet route.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::{AuthUser, require_role}};
use tirta_core::reports::{TrialBalanceReport, TrialBalanceRow, TrialBalanceSection};
use tirta_db::repositories::report::{ReportError, ReportRepository, TrialBalanceQuery};
use tirta_shared::UserRole;

/// Creates the report routes (auth middleware is applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/trial-balance", get(trial_balance))
}

/// Query parameters for the trial balance.
#[derive(Debug, Deserialize)]
pub struct TrialBalanceParams {
    /// Cutoff date (inclusive). Defaults to today when neither `as_of` nor
    /// `period` is given.
    pub as_of: Option<NaiveDate>,
    /// Alternative cutoff: a `yyyy-mm` period whose last day is used.
    pub period: Option<String>,
    /// Optional cost unit filter.
    pub unit_id: Option<Uuid>,
    /// Optional asset filter.
    pub asset_id: Option<Uuid>,
    /// Include zero-balance rows.
    pub show_zero: Option<bool>,
}

fn row_json(row: &TrialBalanceRow) -> serde_json::Value {
    json!({
        "account_id": row.account_id,
        "code": row.code,
        "name": row.name,
        "type": row.account_type.as_str(),
        "normal_balance": row.normal_balance.as_str(),
        "total_debit": row.total_debit,
        "total_credit": row.total_credit,
        "balance": row.balance
    })
}

fn section_json(section: &TrialBalanceSection) -> serde_json::Value {
    json!({
        "total": section.total,
        "rows": section.rows.iter().map(row_json).collect::<Vec<_>>()
    })
}

fn report_json(report: &TrialBalanceReport) -> serde_json::Value {
    json!({
        "as_of": report.as_of,
        "sections": {
            "assets": section_json(&report.sections.assets),
            "liabilities": section_json(&report.sections.liabilities),
            "equity": section_json(&report.sections.equity),
            "revenue": section_json(&report.sections.revenue),
            "expense": section_json(&report.sections.expense)
        },
        "totals": {
            "assets": report.totals.assets,
            "liabilities": report.totals.liabilities,
            "equity": report.totals.equity,
            "net_revenue": report.totals.net_revenue,
            "total_expense": report.totals.total_expense,
            "profit_loss": report.totals.profit_loss,
            "liabilities_plus_equity": report.totals.liabilities_plus_equity,
            "balanced": report.totals.balanced,
            "difference": report.totals.difference
        }
    })
}

/// Parses a `yyyy-mm` period string into the last day of that month.
fn period_end(period: &str) -> Option<NaiveDate> {
    let (year, month) = period.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)?
    };
    next_month.pred_opt()
}

fn report_error_response(e: &ReportError) -> Response {
    error!(error = %e, "Trial balance failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}

/// GET `/trial-balance` - Trial balance / balance sheet as of a cutoff
/// (ADMIN or PIMPINAN).
async fn trial_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<TrialBalanceParams>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::Admin, UserRole::Pimpinan]) {
        return response;
    }

    let as_of = match (&params.as_of, params.period.as_deref()) {
        (Some(as_of), _) => *as_of,
        (None, Some(period)) => match period_end(period) {
            Some(date) => date,
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_period",
                        "message": format!("Period must be yyyy-mm, got '{period}'")
                    })),
                )
                    .into_response();
            }
        },
        (None, None) => chrono::Utc::now().date_naive(),
    };

    let repo = ReportRepository::new((*state.db).clone());
    let query = TrialBalanceQuery {
        as_of,
        cost_unit_id: params.unit_id,
        asset_id: params.asset_id,
        show_zero: params.show_zero.unwrap_or(false),
    };

    match repo.trial_balance(query).await {
        Ok(report) => (StatusCode::OK, Json(report_json(&report))).into_response(),
        Err(e) => report_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_end() {
        assert_eq!(
            period_end("2024-01"),
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );
        assert_eq!(
            period_end("2024-02"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            period_end("2024-12"),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
        assert_eq!(period_end("2024"), None);
        assert_eq!(period_end("2024-13"), None);
    }
}
