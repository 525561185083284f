//! Asset depreciation routes: schedule read, parameter update with
//! regeneration, bounded simulation, and idempotent posting of a schedule
//! entry.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::{AuthUser, require_role}};
use tirta_core::depreciation::{
    DepreciationBasis, DepreciationClass, DepreciationMethod, ScheduleRow, ScheduleSummary,
    SimulationRequest,
};
use tirta_core::posting::SourceRef;
use tirta_db::entities::{assets, depreciation_entries};
use tirta_db::repositories::asset::{
    AssetError, AssetRepository, CreateAssetInput, UpdateDepreciationInput, to_params,
    to_schedule_row,
};
use tirta_db::repositories::journal::{JournalRepository, PostInput};
use tirta_shared::UserRole;

use super::ledger::journal_error_response;

/// Creates the asset and depreciation routes (auth middleware is applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/assets", post(create_asset))
        .route("/assets/{id}/depreciation", get(get_depreciation))
        .route("/assets/{id}/depreciation", put(update_depreciation))
        .route("/assets/{id}/depreciation/simulate", post(simulate_depreciation))
        .route("/depreciation/{entry_id}/posting", post(post_schedule_entry))
}

/// Request body for registering an asset.
#[derive(Debug, Deserialize)]
pub struct CreateAssetRequest {
    /// Asset name.
    pub name: String,
    /// Asset category.
    pub category: String,
    /// Acquisition value.
    pub acquisition_value: Decimal,
    /// Residual value (default 0).
    pub residual_value: Option<Decimal>,
    /// Useful life in years.
    pub useful_life_years: i32,
    /// Depreciation method.
    pub method: String,
    /// Declining-balance rate class.
    pub class: Option<String>,
    /// Period basis (default YEARLY).
    pub basis: Option<String>,
    /// Depreciation start date.
    pub start_date: Option<NaiveDate>,
    /// Commissioning date.
    pub commissioned_date: Option<NaiveDate>,
    /// Registration year.
    pub registered_year: i32,
}

/// Request body for updating depreciation parameters.
#[derive(Debug, Deserialize)]
pub struct UpdateDepreciationRequest {
    /// Acquisition value.
    pub acquisition_value: Option<Decimal>,
    /// Residual value.
    pub residual_value: Option<Decimal>,
    /// Useful life in years.
    pub useful_life_years: Option<i32>,
    /// Depreciation method.
    pub method: Option<String>,
    /// Declining-balance rate class.
    pub class: Option<String>,
    /// Period basis.
    pub basis: Option<String>,
    /// Depreciation start date.
    pub start_date: Option<NaiveDate>,
    /// Commissioning date.
    pub commissioned_date: Option<NaiveDate>,
}

/// Request body for a simulation.
#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    /// Window start.
    pub from: NaiveDate,
    /// Window end (inclusive).
    pub to: NaiveDate,
    /// Period basis.
    pub basis: String,
    /// Optional method override.
    pub method: Option<String>,
    /// Optional annual-rate override.
    pub rate_override: Option<Decimal>,
}

/// Request body for posting a schedule entry.
#[derive(Debug, Deserialize)]
pub struct PostScheduleEntryRequest {
    /// Category to debit (depreciation expense).
    pub debit_category_id: Uuid,
    /// Category to credit (accumulated depreciation).
    pub credit_category_id: Uuid,
    /// Optional header description.
    pub description: Option<String>,
    /// Optional cost unit tag.
    pub cost_unit_id: Option<Uuid>,
}

fn asset_json(asset: &assets::Model) -> serde_json::Value {
    let params = to_params(asset);
    json!({
        "id": asset.id,
        "asset_number": asset.asset_number,
        "name": asset.name,
        "category": params.category.as_str(),
        "acquisition_value": asset.acquisition_value,
        "residual_value": asset.residual_value,
        "useful_life_years": asset.useful_life_years,
        "method": params.method.as_str(),
        "class": params.class.map(DepreciationClass::as_str),
        "basis": params.basis.as_str(),
        "start_date": asset.depreciation_start_date,
        "commissioned_date": asset.commissioned_date,
        "registered_year": asset.registered_year
    })
}

fn entry_json(entry: &depreciation_entries::Model) -> serde_json::Value {
    row_json(&to_schedule_row(entry), Some(entry.id))
}

fn row_json(row: &ScheduleRow, id: Option<Uuid>) -> serde_json::Value {
    json!({
        "id": id,
        "period": row.period,
        "method": row.method.as_str(),
        "annual_rate": row.annual_rate,
        "opening_value": row.opening_value,
        "expense": row.expense,
        "accumulated": row.accumulated,
        "closing_value": row.closing_value
    })
}

fn summary_json(summary: &ScheduleSummary) -> serde_json::Value {
    json!({
        "periods": summary.periods,
        "total_expense": summary.total_expense,
        "ending_book_value": summary.ending_book_value
    })
}

fn asset_error_response(e: &AssetError) -> Response {
    match e {
        AssetError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Asset not found"
            })),
        )
            .into_response(),
        AssetError::Depreciation(inner) => (
            StatusCode::from_u16(inner.http_status_code())
                .unwrap_or(StatusCode::BAD_REQUEST),
            Json(json!({ "error": inner.error_code(), "message": inner.to_string() })),
        )
            .into_response(),
        AssetError::Database(_) => {
            error!(error = %e, "Asset operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

/// POST `/assets` - Register an asset; allocates its asset number and
/// writes the initial schedule (ADMIN or PIMPINAN).
async fn create_asset(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAssetRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::Admin, UserRole::Pimpinan]) {
        return response;
    }

    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "empty_name",
                "message": "Asset name must not be empty"
            })),
        )
            .into_response();
    }

    let Some(category) = tirta_core::depreciation::AssetCategory::parse(&payload.category) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_category",
                "message": format!("Unknown asset category: {}", payload.category)
            })),
        )
            .into_response();
    };
    let Some(method) = DepreciationMethod::parse(&payload.method) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_method",
                "message": format!("Unknown method: {}", payload.method)
            })),
        )
            .into_response();
    };
    let class = match parse_opt(payload.class.as_deref(), DepreciationClass::parse, "class") {
        Ok(v) => v,
        Err(response) => return response,
    };
    let basis = match parse_opt(payload.basis.as_deref(), DepreciationBasis::parse, "basis") {
        Ok(v) => v,
        Err(response) => return response,
    };

    let repo = AssetRepository::new((*state.db).clone());
    let input = CreateAssetInput {
        name: payload.name,
        category,
        acquisition_value: payload.acquisition_value,
        residual_value: payload.residual_value.unwrap_or_default(),
        useful_life_years: payload.useful_life_years,
        method,
        class,
        basis: basis.unwrap_or(DepreciationBasis::Yearly),
        depreciation_start_date: payload.start_date,
        commissioned_date: payload.commissioned_date,
        registered_year: payload.registered_year,
    };

    match repo.create_asset(input).await {
        Ok(asset) => {
            info!(asset_id = %asset.id, asset_number = %asset.asset_number, "Asset registered");
            (StatusCode::CREATED, Json(asset_json(&asset))).into_response()
        }
        Err(e) => asset_error_response(&e),
    }
}

/// GET `/assets/{id}/depreciation` - Asset with its schedule and summary.
async fn get_depreciation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AssetRepository::new((*state.db).clone());

    match repo.get_depreciation(id).await {
        Ok((asset, entries, summary)) => {
            let rows: Vec<serde_json::Value> = entries.iter().map(entry_json).collect();
            (
                StatusCode::OK,
                Json(json!({
                    "asset": asset_json(&asset),
                    "rows": rows,
                    "summary": summary_json(&summary)
                })),
            )
                .into_response()
        }
        Err(e) => asset_error_response(&e),
    }
}

/// PUT `/assets/{id}/depreciation` - Update parameters and regenerate the
/// schedule (ADMIN or PIMPINAN).
async fn update_depreciation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDepreciationRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::Admin, UserRole::Pimpinan]) {
        return response;
    }

    let method = match parse_opt(payload.method.as_deref(), DepreciationMethod::parse, "method") {
        Ok(v) => v,
        Err(response) => return response,
    };
    let class = match parse_opt(payload.class.as_deref(), DepreciationClass::parse, "class") {
        Ok(v) => v,
        Err(response) => return response,
    };
    let basis = match parse_opt(payload.basis.as_deref(), DepreciationBasis::parse, "basis") {
        Ok(v) => v,
        Err(response) => return response,
    };

    let repo = AssetRepository::new((*state.db).clone());
    let input = UpdateDepreciationInput {
        acquisition_value: payload.acquisition_value,
        residual_value: payload.residual_value,
        useful_life_years: payload.useful_life_years,
        method,
        class: class.map(Some),
        basis,
        depreciation_start_date: payload.start_date.map(Some),
        commissioned_date: payload.commissioned_date.map(Some),
    };

    match repo.update_depreciation(id, input).await {
        Ok((asset, entries)) => {
            info!(asset_id = %id, rows = entries.len(), "Depreciation schedule regenerated");
            let params = to_params(&asset);
            let rows: Vec<ScheduleRow> = entries.iter().map(to_schedule_row).collect();
            let summary =
                tirta_core::depreciation::ScheduleGenerator::summarize(&params, &rows);
            let rows: Vec<serde_json::Value> = entries.iter().map(entry_json).collect();
            (
                StatusCode::OK,
                Json(json!({
                    "asset": asset_json(&asset),
                    "rows": rows,
                    "summary": summary_json(&summary)
                })),
            )
                .into_response()
        }
        Err(e) => asset_error_response(&e),
    }
}

/// POST `/assets/{id}/depreciation/simulate` - Preview rows, nothing saved.
async fn simulate_depreciation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SimulateRequest>,
) -> impl IntoResponse {
    let Some(basis) = DepreciationBasis::parse(&payload.basis) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_basis",
                "message": format!("Unknown basis: {}", payload.basis)
            })),
        )
            .into_response();
    };
    let method = match parse_opt(payload.method.as_deref(), DepreciationMethod::parse, "method") {
        Ok(v) => v,
        Err(response) => return response,
    };

    let request = SimulationRequest {
        from: payload.from,
        to: payload.to,
        basis,
        method,
        rate_override: payload.rate_override,
    };

    let repo = AssetRepository::new((*state.db).clone());
    match repo.simulate_depreciation(id, &request).await {
        Ok(rows) => {
            let rows: Vec<serde_json::Value> =
                rows.iter().map(|row| row_json(row, None)).collect();
            (StatusCode::OK, Json(json!({ "rows": rows }))).into_response()
        }
        Err(e) => asset_error_response(&e),
    }
}

/// POST `/depreciation/{entry_id}/posting` - Idempotently post a schedule
/// entry to the ledger (ADMIN or PIMPINAN).
async fn post_schedule_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(entry_id): Path<Uuid>,
    Json(payload): Json<PostScheduleEntryRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::Admin, UserRole::Pimpinan]) {
        return response;
    }

    let asset_repo = AssetRepository::new((*state.db).clone());
    let entry = match asset_repo.find_schedule_entry(entry_id).await {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "not_found",
                    "message": "Depreciation schedule entry not found"
                })),
            )
                .into_response();
        }
        Err(e) => return asset_error_response(&e),
    };

    let journal_repo = JournalRepository::new((*state.db).clone());
    let input = PostInput {
        source: SourceRef::new("depreciation", entry.id),
        debit_category_id: payload.debit_category_id,
        credit_category_id: payload.credit_category_id,
        amount: entry.expense,
        date: entry.period,
        description: payload.description,
        cost_unit_id: payload.cost_unit_id,
        asset_id: Some(entry.asset_id),
    };

    match journal_repo.post(input).await {
        Ok(outcome) if outcome.already_posted => (
            StatusCode::OK,
            Json(json!({ "message": "already posted" })),
        )
            .into_response(),
        Ok(outcome) => {
            info!(entry_id = %entry_id, created = outcome.created, "Depreciation posted");
            (
                StatusCode::CREATED,
                Json(json!({
                    "created": outcome.created,
                    "journal_id": outcome.journal_id
                })),
            )
                .into_response()
        }
        Err(e) => journal_error_response(&e),
    }
}

fn parse_opt<T>(
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
    field: &str,
) -> Result<Option<T>, Response> {
    match value {
        None => Ok(None),
        Some(s) => parse(s).map(Some).ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("invalid_{field}"),
                    "message": format!("Unknown {field}: {s}")
                })),
            )
                .into_response()
        }),
    }
}
