use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use fintrack_core::notifications::{NewNotification, Notification, NotificationFilter};
use fintrack_core::Page;
use serde::Serialize;

#[derive(Serialize)]
struct CountResponse {
    count: i64,
}

#[derive(Serialize)]
struct MarkAllReadResponse {
    updated: usize,
}

/// Newest first; `unreadOnly=true` hides read ones.
async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<NotificationFilter>,
) -> ApiResult<Json<Page<Notification>>> {
    let page = state
        .notification_service
        .list_notifications(filter.unread_only, filter.page_request())?;
    Ok(Json(page))
}

async fn create_notification(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewNotification>,
) -> ApiResult<Json<Notification>> {
    Ok(Json(
        state
            .notification_service
            .create_notification(payload)
            .await?,
    ))
}

async fn unread_count(State(state): State<Arc<AppState>>) -> ApiResult<Json<CountResponse>> {
    let count = state.notification_service.unread_count()?;
    Ok(Json(CountResponse { count }))
}

async fn mark_read(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Notification>> {
    Ok(Json(state.notification_service.mark_read(&id).await?))
}

async fn mark_all_read(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MarkAllReadResponse>> {
    let updated = state.notification_service.mark_all_read().await?;
    Ok(Json(MarkAllReadResponse { updated }))
}

async fn delete_notification(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.notification_service.delete_notification(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/notifications",
            get(list_notifications).post(create_notification),
        )
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/{id}/read", post(mark_read))
        .route("/notifications/{id}", delete(delete_notification))
}
