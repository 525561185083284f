//! General ledger routes: journal listing, manual posting, unposting, and
//! voucher print bookkeeping.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::{AuthUser, require_role}};
use tirta_core::posting::SourceRef;
use tirta_db::repositories::journal::{
    JournalError, JournalFilter, JournalRepository, JournalWithLines, PostInput,
};
use tirta_shared::UserRole;
use tirta_shared::types::{PageRequest, PageResponse};

/// Creates the ledger routes (auth middleware is applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ledger", get(list_journals))
        .route("/ledger", post(post_manual))
        .route("/ledger/unpost", delete(unpost))
        .route("/ledger/{id}/print", post(print_journal))
}

/// Query parameters for listing journals.
#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    /// Start date (inclusive).
    pub from: Option<NaiveDate>,
    /// End date (inclusive).
    pub to: Option<NaiveDate>,
    /// Free-text match against description, voucher, or reference.
    pub q: Option<String>,
    /// Source filter: `<kind>:<id>` or a bare kind.
    pub source: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for a manual cost transaction posting.
#[derive(Debug, Deserialize)]
pub struct ManualPostRequest {
    /// Source entity ID; one manual transaction per ID.
    pub source_id: Uuid,
    /// Category to debit.
    pub debit_category_id: Uuid,
    /// Category to credit.
    pub credit_category_id: Uuid,
    /// Amount for each side.
    pub amount: Decimal,
    /// Journal date.
    pub date: NaiveDate,
    /// Header description.
    pub description: Option<String>,
    /// Optional cost unit tag.
    pub cost_unit_id: Option<Uuid>,
    /// Optional asset tag.
    pub asset_id: Option<Uuid>,
}

/// Query parameters for unposting.
#[derive(Debug, Deserialize)]
pub struct UnpostQuery {
    /// Source kind.
    #[serde(rename = "type")]
    pub source_kind: String,
    /// Source entity ID.
    pub id: Uuid,
}

fn journal_json(item: &JournalWithLines) -> serde_json::Value {
    let lines: Vec<serde_json::Value> = item
        .lines
        .iter()
        .map(|line| {
            json!({
                "id": line.id,
                "account_id": line.account_id,
                "cost_category_id": line.cost_category_id,
                "debit": line.debit,
                "credit": line.credit,
                "cost_unit_id": line.cost_unit_id,
                "asset_id": line.asset_id
            })
        })
        .collect();

    json!({
        "id": item.journal.id,
        "date": item.journal.journal_date,
        "reference_no": item.journal.reference_no,
        "voucher_no": item.journal.voucher_no,
        "description": item.journal.description,
        "source": item.journal.source_tag,
        "print_count": item.journal.print_count,
        "lines": lines,
        "totals": {
            "debit": item.totals.debit,
            "credit": item.totals.credit,
            "balanced": item.totals.is_balanced
        }
    })
}

pub(crate) fn journal_error_response(e: &JournalError) -> Response {
    match e {
        JournalError::CategoryNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "category_not_found",
                "message": format!("Cost category not found: {id}")
            })),
        )
            .into_response(),
        JournalError::Mapping(inner) => (
            StatusCode::from_u16(inner.http_status_code())
                .unwrap_or(StatusCode::NOT_FOUND),
            Json(json!({ "error": inner.error_code(), "message": inner.to_string() })),
        )
            .into_response(),
        JournalError::Posting(inner) => (
            StatusCode::from_u16(inner.http_status_code())
                .unwrap_or(StatusCode::BAD_REQUEST),
            Json(json!({ "error": inner.error_code(), "message": inner.to_string() })),
        )
            .into_response(),
        JournalError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Journal not found"
            })),
        )
            .into_response(),
        JournalError::Database(_) => {
            error!(error = %e, "Journal operation failed");
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

/// GET `/ledger` - Paginated journal headers with lines (ADMIN or
/// PIMPINAN).
async fn list_journals(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LedgerQuery>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::Admin, UserRole::Pimpinan]) {
        return response;
    }

    let page = PageRequest {
        page: query.page.unwrap_or(1).max(1),
        per_page: query.per_page.unwrap_or(20).clamp(1, 100),
    };
    let filter = JournalFilter {
        from: query.from,
        to: query.to,
        q: query.q,
        source: query.source,
    };

    let repo = JournalRepository::new((*state.db).clone());
    match repo.list_journals(filter, &page).await {
        Ok((journals, total)) => {
            let items: Vec<serde_json::Value> = journals.iter().map(journal_json).collect();
            let response = PageResponse::new(items, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => journal_error_response(&e),
    }
}

/// POST `/ledger` - Manual cost transaction posting (ADMIN or PIMPINAN).
///
/// Runs through the same idempotent posting service as depreciation:
/// posting the same source twice is a success that creates nothing.
async fn post_manual(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ManualPostRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::Admin, UserRole::Pimpinan]) {
        return response;
    }

    let repo = JournalRepository::new((*state.db).clone());
    let input = PostInput {
        source: SourceRef::new("manual", payload.source_id),
        debit_category_id: payload.debit_category_id,
        credit_category_id: payload.credit_category_id,
        amount: payload.amount,
        date: payload.date,
        description: payload.description,
        cost_unit_id: payload.cost_unit_id,
        asset_id: payload.asset_id,
    };

    match repo.post(input).await {
        Ok(outcome) if outcome.already_posted => (
            StatusCode::OK,
            Json(json!({ "message": "already posted" })),
        )
            .into_response(),
        Ok(outcome) => {
            info!(source_id = %payload.source_id, created = outcome.created, "Manual posting");
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

/// DELETE `/ledger/unpost?type=&id=` - Remove headers derived from a source
/// (ADMIN or PIMPINAN).
async fn unpost(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<UnpostQuery>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::Admin, UserRole::Pimpinan]) {
        return response;
    }

    if query.source_kind.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_source",
                "message": "Source type must not be empty"
            })),
        )
            .into_response();
    }

    let repo = JournalRepository::new((*state.db).clone());
    let source = SourceRef::new(query.source_kind.trim(), query.id);

    match repo.unpost(&source).await {
        Ok(removed) => (StatusCode::OK, Json(json!({ "removed": removed }))).into_response(),
        Err(e) => journal_error_response(&e),
    }
}

/// POST `/ledger/{id}/print` - Increment a voucher's print count (ADMIN or
/// PIMPINAN).
async fn print_journal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::Admin, UserRole::Pimpinan]) {
        return response;
    }

    let repo = JournalRepository::new((*state.db).clone());
    match repo.increment_print_count(id).await {
        Ok(journal) => (
            StatusCode::OK,
            Json(json!({
                "id": journal.id,
                "voucher_no": journal.voucher_no,
                "print_count": journal.print_count
            })),
        )
            .into_response(),
        Err(e) => journal_error_response(&e),
    }
}
