use std::sync::Arc;

use crate::{api::shared::today, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use fintrack_core::tiers::{
    Benefit, BenefitUpdate, MembershipStatus, MembershipTier, NewBenefit, TierUpsert,
};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AsOfQuery {
    as_of: Option<NaiveDate>,
}

async fn list_tiers(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<MembershipTier>>> {
    Ok(Json(state.tier_service.list_tiers()?))
}

async fn get_tier(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MembershipTier>> {
    Ok(Json(state.tier_service.get_tier(&id)?))
}

/// Creates the tier, or replaces it when the body carries an existing id.
async fn upsert_tier(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TierUpsert>,
) -> ApiResult<Json<MembershipTier>> {
    Ok(Json(state.tier_service.upsert_tier(payload).await?))
}

async fn update_tier(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<TierUpsert>,
) -> ApiResult<Json<MembershipTier>> {
    payload.id = Some(id);
    Ok(Json(state.tier_service.upsert_tier(payload).await?))
}

async fn delete_tier(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.tier_service.delete_tier(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_membership_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AsOfQuery>,
) -> ApiResult<Json<MembershipStatus>> {
    let as_of = query.as_of.unwrap_or_else(today);
    Ok(Json(state.tier_service.get_membership_status(as_of)?))
}

async fn list_benefits(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Benefit>>> {
    Ok(Json(state.tier_service.list_benefits()?))
}

async fn create_benefit(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewBenefit>,
) -> ApiResult<Json<Benefit>> {
    Ok(Json(state.tier_service.create_benefit(payload).await?))
}

async fn update_benefit(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<BenefitUpdate>,
) -> ApiResult<Json<Benefit>> {
    payload.id = Some(id);
    Ok(Json(state.tier_service.update_benefit(payload).await?))
}

async fn delete_benefit(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.tier_service.delete_benefit(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tiers", get(list_tiers).post(upsert_tier))
        .route("/tiers/status", get(get_membership_status))
        .route(
            "/tiers/{id}",
            get(get_tier).put(update_tier).delete(delete_tier),
        )
        .route("/benefits", get(list_benefits).post(create_benefit))
        .route("/benefits/{id}", put(update_benefit).delete(delete_benefit))
}
