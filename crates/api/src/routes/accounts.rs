//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::{AuthUser, require_role}};
use tirta_core::account::{AccountMeta, AccountRegistry};
use tirta_db::entities::accounts;
use tirta_db::repositories::account::{
    AccountError, AccountFilter, AccountRepository, CreateAccountInput, UpdateAccountInput,
};
use tirta_shared::UserRole;

/// Creates the account routes (auth middleware is applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts", post(create_account))
        .route("/accounts/{id}", get(get_account))
        .route("/accounts/{id}", patch(update_account))
        .route("/accounts/{id}", delete(delete_account))
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Free-text match against code or name.
    pub q: Option<String>,
    /// Filter by account type.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    /// Filter by active status.
    pub active: Option<bool>,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account code (unique).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: String,
    /// Normal balance side; defaults to the type's convention.
    pub normal_balance: Option<String>,
    /// Parent account ID.
    pub parent_id: Option<Uuid>,
    /// Whether the account is active (default: true).
    pub is_active: Option<bool>,
}

/// Request body for updating an account.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// Account code.
    pub code: Option<String>,
    /// Account name.
    pub name: Option<String>,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    /// Normal balance side.
    pub normal_balance: Option<String>,
    /// Parent account ID.
    pub parent_id: Option<Uuid>,
    /// Whether the account is active.
    pub is_active: Option<bool>,
}

fn account_json(account: &accounts::Model) -> serde_json::Value {
    json!({
        "id": account.id,
        "code": account.code,
        "name": account.name,
        "type": tirta_core::account::AccountType::from(account.account_type).as_str(),
        "normal_balance": tirta_core::account::NormalBalance::from(account.normal_balance).as_str(),
        "parent_id": account.parent_id,
        "is_active": account.is_active,
        "created_at": account.created_at,
        "updated_at": account.updated_at
    })
}

fn ancestor_json(meta: &AccountMeta) -> serde_json::Value {
    json!({
        "id": meta.id,
        "code": meta.code,
        "name": meta.name,
        "type": meta.account_type.as_str()
    })
}

fn account_error_response(e: &AccountError) -> Response {
    match e {
        AccountError::DuplicateCode(code) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_code",
                "message": format!("Account code '{code}' already exists")
            })),
        )
            .into_response(),
        AccountError::ParentNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "parent_not_found",
                "message": format!("Parent account not found: {id}")
            })),
        )
            .into_response(),
        AccountError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Account not found"
            })),
        )
            .into_response(),
        AccountError::HasJournalLines(count) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "has_journal_lines",
                "message": format!("Cannot delete account: {count} journal lines reference it")
            })),
        )
            .into_response(),
        AccountError::Hierarchy(inner) => (
            StatusCode::from_u16(inner.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(json!({
                "error": inner.error_code(),
                "message": inner.to_string()
            })),
        )
            .into_response(),
        AccountError::Database(_) => {
            error!(error = %e, "Account operation failed");
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

/// GET `/accounts` - List accounts.
async fn list_accounts(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListAccountsQuery>,
) -> impl IntoResponse {
    let account_type = match query.account_type.as_deref() {
        Some(s) => match tirta_core::account::AccountType::parse(s) {
            Some(t) => Some(t),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_account_type",
                        "message": format!("Unknown account type: {s}")
                    })),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let repo = AccountRepository::new((*state.db).clone());
    let filter = AccountFilter {
        q: query.q,
        account_type,
        is_active: query.active,
    };

    match repo.list_accounts(filter).await {
        Ok(accounts) => {
            let items: Vec<serde_json::Value> = accounts.iter().map(account_json).collect();
            (StatusCode::OK, Json(json!({ "accounts": items }))).into_response()
        }
        Err(e) => account_error_response(&e),
    }
}

/// POST `/accounts` - Create an account (ADMIN only).
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::Admin]) {
        return response;
    }

    let normal_balance = payload
        .normal_balance
        .clone()
        .unwrap_or_else(|| default_normal_for(&payload.account_type));
    let (account_type, normal_balance) =
        match AccountRegistry::parse_classification(&payload.account_type, &normal_balance) {
            Ok(parsed) => parsed,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": e.error_code(), "message": e.to_string() })),
                )
                    .into_response();
            }
        };

    let repo = AccountRepository::new((*state.db).clone());
    let input = CreateAccountInput {
        code: payload.code,
        name: payload.name,
        account_type,
        normal_balance,
        parent_id: payload.parent_id,
        is_active: payload.is_active.unwrap_or(true),
    };

    match repo.create_account(input).await {
        Ok(account) => {
            info!(account_id = %account.id, code = %account.code, "Account created");
            (StatusCode::CREATED, Json(account_json(&account))).into_response()
        }
        Err(e) => account_error_response(&e),
    }
}

/// GET `/accounts/{id}` - Get an account with its ancestor chain.
async fn get_account(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());

    match repo.find_with_ancestors(id).await {
        Ok((account, ancestors)) => {
            let mut body = account_json(&account);
            if let Some(map) = body.as_object_mut() {
                map.insert(
                    "ancestors".to_string(),
                    serde_json::Value::Array(ancestors.iter().map(ancestor_json).collect()),
                );
            }
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => account_error_response(&e),
    }
}

/// PATCH `/accounts/{id}` - Update an account (ADMIN only).
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::Admin]) {
        return response;
    }

    let account_type = match payload.account_type.as_deref() {
        Some(s) => match tirta_core::account::AccountType::parse(s) {
            Some(t) => Some(t),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_account_type",
                        "message": format!("Unknown account type: {s}")
                    })),
                )
                    .into_response();
            }
        },
        None => None,
    };
    let normal_balance = match payload.normal_balance.as_deref() {
        Some(s) => match tirta_core::account::NormalBalance::parse(s) {
            Some(n) => Some(n),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_normal_balance",
                        "message": format!("Unknown normal balance: {s}")
                    })),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let repo = AccountRepository::new((*state.db).clone());
    let input = UpdateAccountInput {
        code: payload.code,
        name: payload.name,
        account_type,
        normal_balance,
        parent_id: payload.parent_id.map(Some),
        is_active: payload.is_active,
    };

    match repo.update_account(id, input).await {
        Ok(account) => {
            info!(account_id = %id, "Account updated");
            (StatusCode::OK, Json(account_json(&account))).into_response()
        }
        Err(e) => account_error_response(&e),
    }
}

/// DELETE `/accounts/{id}` - Delete an account, detaching children
/// (ADMIN only).
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::Admin]) {
        return response;
    }

    let repo = AccountRepository::new((*state.db).clone());

    match repo.delete_account(id).await {
        Ok(()) => {
            info!(account_id = %id, "Account deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => account_error_response(&e),
    }
}

fn default_normal_for(account_type: &str) -> String {
    tirta_core::account::AccountType::parse(account_type).map_or_else(
        || "debit".to_string(),
        |t| t.default_normal_balance().as_str().to_string(),
    )
}
