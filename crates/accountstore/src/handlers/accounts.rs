use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use accountstore_core::account::Account;
use accountstore_core::storage::TableStats;

use crate::{
    handlers::{
        error::{invalid_body, invalid_query},
        AppError,
    },
    state::AppState,
    store::{Credentials, NewAccount},
};

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_active_only")]
    pub active_only: bool,
}

fn default_active_only() -> bool {
    true
}

/// Create a new account (POST /api/accounts).
pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<NewAccount>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(new) = payload.map_err(invalid_body)?;
    let account = state.store()?.create(new).await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// Verify credentials and record the login (POST /api/accounts/authenticate).
pub async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<Account>, AppError> {
    let Json(credentials) = payload.map_err(invalid_body)?;
    let account = state.store()?.authenticate(credentials).await?;

    Ok(Json(account))
}

/// List accounts (GET /api/accounts).
///
/// Only active accounts unless `active_only=false` is given.
pub async fn list_accounts(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Account>>, AppError> {
    let Query(params) = params.map_err(invalid_query)?;
    let accounts = state.store()?.list(params.active_only).await?;

    Ok(Json(accounts))
}

/// Get a single account by ID (GET /api/accounts/{id}).
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Account>, AppError> {
    let account = state.store()?.get_by_id(&id).await?;

    Ok(Json(account))
}

/// Partially update an account (PATCH /api/accounts/{id}).
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Account>, AppError> {
    let Json(changes) = payload.map_err(invalid_body)?;
    let account = state.store()?.update(&id, changes).await?;

    Ok(Json(account))
}

/// Deactivate an account (DELETE /api/accounts/{id}).
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store()?.soft_delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Table metadata (GET /api/stats).
pub async fn stats(State(state): State<AppState>) -> Result<Json<TableStats>, AppError> {
    let stats = state.store()?.stats().await?;

    Ok(Json(stats))
}
