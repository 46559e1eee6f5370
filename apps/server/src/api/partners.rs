use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use fintrack_core::partners::{NewPartner, Partner, PartnerFilter, PartnerUpdate};
use fintrack_core::Page;

async fn search_partners(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<PartnerFilter>,
) -> ApiResult<Json<Page<Partner>>> {
    Ok(Json(state.partner_service.search_partners(&filter)?))
}

async fn get_partner(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Partner>> {
    Ok(Json(state.partner_service.get_partner(&id)?))
}

async fn create_partner(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewPartner>,
) -> ApiResult<Json<Partner>> {
    Ok(Json(state.partner_service.create_partner(payload).await?))
}

async fn update_partner(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<PartnerUpdate>,
) -> ApiResult<Json<Partner>> {
    payload.id = Some(id);
    Ok(Json(state.partner_service.update_partner(payload).await?))
}

async fn delete_partner(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.partner_service.delete_partner(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/partners", get(search_partners).post(create_partner))
        .route(
            "/partners/{id}",
            get(get_partner).put(update_partner).delete(delete_partner),
        )
}
