use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use fintrack_core::categories::{
    Category, CategoryKind, CategoryUpdate, CategoryWithChildren, NewCategory,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct KindQuery {
    kind: Option<CategoryKind>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteCategoryQuery {
    replacement_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteCategoryResponse {
    reassigned_transactions: usize,
}

async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<KindQuery>,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.category_service.list_categories(query.kind)?))
}

async fn get_category_tree(
    State(state): State<Arc<AppState>>,
    Query(query): Query<KindQuery>,
) -> ApiResult<Json<Vec<CategoryWithChildren>>> {
    Ok(Json(state.category_service.get_category_tree(query.kind)?))
}

async fn get_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.category_service.get_category(&id)?))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewCategory>,
) -> ApiResult<Json<Category>> {
    let created = state.category_service.create_category(payload).await?;
    Ok(Json(created))
}

async fn update_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<CategoryUpdate>,
) -> ApiResult<Json<Category>> {
    payload.id = Some(id);
    let updated = state.category_service.update_category(payload).await?;
    Ok(Json(updated))
}

/// Deletes a category. With `replacementId`, its transactions and budget
/// lines move to the replacement first.
async fn delete_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeleteCategoryQuery>,
) -> ApiResult<Json<DeleteCategoryResponse>> {
    let reassigned = state
        .category_service
        .delete_category(&id, query.replacement_id)
        .await?;
    Ok(Json(DeleteCategoryResponse {
        reassigned_transactions: reassigned,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/tree", get(get_category_tree))
        .route(
            "/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}
