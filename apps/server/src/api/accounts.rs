use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use fintrack_core::accounts::{Account, AccountFilter, AccountNode, AccountUpdate, NewAccount};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsQuery {
    is_active: Option<bool>,
    parent_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    params(
        ("isActive" = Option<bool>, Query, description = "Only active or inactive accounts"),
        ("parentId" = Option<String>, Query, description = "Direct children of this account")
    ),
    responses((status = 200, description = "Accounts, active first, then by name"))
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AccountsQuery>,
) -> ApiResult<Json<Vec<Account>>> {
    let filter = AccountFilter {
        is_active: query.is_active,
        parent_id: query.parent_id,
    };
    let accounts = state.account_service.list_accounts(&filter)?;
    Ok(Json(accounts))
}

#[utoipa::path(get, path = "/api/v1/accounts/tree", responses((status = 200, description = "Accounts nested under their parents")))]
pub async fn get_account_tree(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AccountNode>>> {
    Ok(Json(state.account_service.get_account_tree()?))
}

#[utoipa::path(post, path = "/api/v1/accounts", responses((status = 200, description = "Created account"), (status = 400), (status = 409)))]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewAccount>,
) -> ApiResult<Json<Account>> {
    let created = state.account_service.create_account(payload).await?;
    info!("Created account {} ({})", created.id, created.name);
    Ok(Json(created))
}

#[utoipa::path(get, path = "/api/v1/accounts/{id}", responses((status = 200, description = "Account"), (status = 404)))]
pub async fn get_account(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Account>> {
    Ok(Json(state.account_service.get_account(&id)?))
}

#[utoipa::path(put, path = "/api/v1/accounts/{id}", responses((status = 200, description = "Updated account"), (status = 404), (status = 409)))]
pub async fn update_account(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<AccountUpdate>,
) -> ApiResult<Json<Account>> {
    payload.id = Some(id);
    let updated = state.account_service.update_account(payload).await?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/api/v1/accounts/{id}", responses((status = 204), (status = 404), (status = 409)))]
pub async fn delete_account(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.account_service.delete_account(&id).await?;
    info!("Deleted account {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/tree", get(get_account_tree))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
}
