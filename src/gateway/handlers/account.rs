//! Account handlers (list, lookup, edit)

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use validator::Validate;

use super::super::error::ApiError;
use super::super::state::AppState;
use super::super::types::{ApiResult, ok};
use super::helpers::{json_body, required_id};
use crate::account::{AccountUpdate, AccountView};

/// List all accounts
#[utoipa::path(
    get,
    path = "/profile/all",
    responses(
        (status = 200, description = "All accounts", body = [AccountView]),
        (status = 500, description = "Database error", body = crate::gateway::error::ErrorBody)
    ),
    tag = "Account"
)]
pub async fn list_accounts(State(state): State<Arc<AppState>>) -> ApiResult<Vec<AccountView>> {
    let accounts = state.accounts.list().await?;
    ok(
        "Accounts retrieved successfully",
        accounts.into_iter().map(AccountView::from).collect(),
    )
}

/// Get one account
#[utoipa::path(
    get,
    path = "/profile/by-id",
    params(("id" = i64, Query, description = "Account id")),
    responses(
        (status = 200, description = "Account", body = AccountView),
        (status = 400, description = "Missing or invalid id", body = crate::gateway::error::ErrorBody),
        (status = 404, description = "No such account", body = crate::gateway::error::ErrorBody)
    ),
    tag = "Account"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<AccountView> {
    let id = required_id(&params, "id")?;
    match state.accounts.get_by_id(id).await? {
        Some(account) => ok("Account retrieved successfully", account.into()),
        None => ApiError::not_found(format!("Account {} not found", id)).into_err(),
    }
}

/// Edit an account
#[utoipa::path(
    put,
    path = "/profile/update",
    params(("id" = i64, Query, description = "Account id")),
    request_body = AccountUpdate,
    responses(
        (status = 200, description = "Updated account", body = AccountView),
        (status = 400, description = "Validation failed or phone already used", body = crate::gateway::error::ErrorBody),
        (status = 404, description = "No such account", body = crate::gateway::error::ErrorBody)
    ),
    tag = "Account"
)]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    payload: Result<Json<AccountUpdate>, JsonRejection>,
) -> ApiResult<AccountView> {
    let id = required_id(&params, "id")?;
    let update = json_body(payload)?;
    update
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    if !state.accounts.update(id, &update).await? {
        return ApiError::not_found(format!("Account {} not found", id)).into_err();
    }

    tracing::info!(account_id = id, "Account updated");
    let account = state
        .accounts
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Account {} not found", id)))?;
    ok("Account updated successfully", account.into())
}
