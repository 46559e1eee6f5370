use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use fintrack_core::transactions::{
    NewTransaction, Transaction, TransactionFilter, TransactionUpdate,
};
use fintrack_core::Page;

/// Paged search. Query keys mirror the filter fields (`accountId`,
/// `categoryId`, `kind`, `startDate`, `endDate`, `search`, `page`,
/// `pageSize`, `sortBy`, `sortDirection`).
async fn search_transactions(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TransactionFilter>,
) -> ApiResult<Json<Page<Transaction>>> {
    Ok(Json(state.transaction_service.search_transactions(&filter)?))
}

async fn get_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Transaction>> {
    Ok(Json(state.transaction_service.get_transaction(&id)?))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewTransaction>,
) -> ApiResult<Json<Transaction>> {
    let created = state.transaction_service.create_transaction(payload).await?;
    Ok(Json(created))
}

async fn update_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<TransactionUpdate>,
) -> ApiResult<Json<Transaction>> {
    payload.id = Some(id);
    let updated = state.transaction_service.update_transaction(payload).await?;
    Ok(Json(updated))
}

async fn delete_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.transaction_service.delete_transaction(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(search_transactions).post(create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}
