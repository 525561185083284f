//! Cost category routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::{AuthUser, require_role}};
use tirta_core::category::CategoryKind;
use tirta_db::entities::cost_categories;
use tirta_db::repositories::category::{
    CategoryError, CategoryRepository, CreateCategoryInput, UpdateCategoryInput,
};
use tirta_shared::UserRole;

/// Creates the cost category routes (auth middleware is applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cost-categories", get(list_categories))
        .route("/cost-categories", post(create_category))
        .route("/cost-categories/{id}", patch(update_category))
}

/// Request body for creating a cost category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Category code (unique).
    pub code: String,
    /// Category name.
    pub name: String,
    /// Kind: BIAYA, PENDAPATAN, or ASET.
    pub kind: String,
    /// Default debit account.
    pub debit_account_id: Option<Uuid>,
    /// Default credit account.
    pub credit_account_id: Option<Uuid>,
}

/// Request body for updating a cost category.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    /// Category code.
    pub code: Option<String>,
    /// Category name.
    pub name: Option<String>,
    /// Kind: BIAYA, PENDAPATAN, or ASET.
    pub kind: Option<String>,
    /// Default debit account.
    pub debit_account_id: Option<Uuid>,
    /// Default credit account.
    pub credit_account_id: Option<Uuid>,
}

fn category_json(category: &cost_categories::Model) -> serde_json::Value {
    json!({
        "id": category.id,
        "code": category.code,
        "name": category.name,
        "kind": CategoryKind::from(category.kind).as_str(),
        "debit_account_id": category.debit_account_id,
        "credit_account_id": category.credit_account_id,
        "created_at": category.created_at,
        "updated_at": category.updated_at
    })
}

fn category_error_response(e: &CategoryError) -> Response {
    match e {
        CategoryError::DuplicateCode(code) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_code",
                "message": format!("Category code '{code}' already exists")
            })),
        )
            .into_response(),
        CategoryError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Cost category not found"
            })),
        )
            .into_response(),
        CategoryError::AccountNotFound(id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "account_not_found",
                "message": format!("Mapped account not found: {id}")
            })),
        )
            .into_response(),
        CategoryError::Validation(inner) => (
            StatusCode::from_u16(inner.http_status_code())
                .unwrap_or(StatusCode::BAD_REQUEST),
            Json(json!({ "error": inner.error_code(), "message": inner.to_string() })),
        )
            .into_response(),
        CategoryError::Database(_) => {
            error!(error = %e, "Category operation failed");
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

/// GET `/cost-categories` - List categories.
async fn list_categories(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.list_categories().await {
        Ok(categories) => {
            let items: Vec<serde_json::Value> = categories.iter().map(category_json).collect();
            (StatusCode::OK, Json(json!({ "cost_categories": items }))).into_response()
        }
        Err(e) => category_error_response(&e),
    }
}

/// POST `/cost-categories` - Create a category (ADMIN only).
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::Admin]) {
        return response;
    }

    let Some(kind) = CategoryKind::parse(&payload.kind) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_kind",
                "message": format!("Unknown category kind: {}", payload.kind)
            })),
        )
            .into_response();
    };

    let repo = CategoryRepository::new((*state.db).clone());
    let input = CreateCategoryInput {
        code: payload.code,
        name: payload.name,
        kind,
        debit_account_id: payload.debit_account_id,
        credit_account_id: payload.credit_account_id,
    };

    match repo.create_category(input).await {
        Ok(category) => {
            info!(category_id = %category.id, code = %category.code, "Cost category created");
            (StatusCode::CREATED, Json(category_json(&category))).into_response()
        }
        Err(e) => category_error_response(&e),
    }
}

/// PATCH `/cost-categories/{id}` - Update a category (ADMIN only).
async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_role(&auth, &[UserRole::Admin]) {
        return response;
    }

    let kind = match payload.kind.as_deref() {
        Some(s) => match CategoryKind::parse(s) {
            Some(k) => Some(k),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_kind",
                        "message": format!("Unknown category kind: {s}")
                    })),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let repo = CategoryRepository::new((*state.db).clone());
    let input = UpdateCategoryInput {
        code: payload.code,
        name: payload.name,
        kind,
        debit_account_id: payload.debit_account_id.map(Some),
        credit_account_id: payload.credit_account_id.map(Some),
    };

    match repo.update_category(id, input).await {
        Ok(category) => {
            info!(category_id = %id, "Cost category updated");
            (StatusCode::OK, Json(category_json(&category))).into_response()
        }
        Err(e) => category_error_response(&e),
    }
}
