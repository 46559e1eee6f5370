use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use fintrack_core::budgets::{Budget, BudgetUpdate, BudgetVsActual, NewBudget};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BudgetsQuery {
    fiscal_year: Option<i32>,
}

/// All budgets, newest fiscal year first, or the one for `fiscalYear`.
async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BudgetsQuery>,
) -> ApiResult<Json<Vec<Budget>>> {
    let budgets = match query.fiscal_year {
        Some(year) => state
            .budget_service
            .get_budget_by_year(year)?
            .into_iter()
            .collect(),
        None => state.budget_service.list_budgets()?,
    };
    Ok(Json(budgets))
}

async fn get_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Budget>> {
    Ok(Json(state.budget_service.get_budget(&id)?))
}

async fn create_budget(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewBudget>,
) -> ApiResult<Json<Budget>> {
    let created = state.budget_service.create_budget(payload).await?;
    Ok(Json(created))
}

async fn update_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<BudgetUpdate>,
) -> ApiResult<Json<Budget>> {
    payload.id = Some(id);
    let updated = state.budget_service.update_budget(payload).await?;
    Ok(Json(updated))
}

async fn delete_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.budget_service.delete_budget(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_budget_vs_actual(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BudgetVsActual>> {
    Ok(Json(state.budget_service.get_budget_vs_actual(&id)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route(
            "/budgets/{id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/budgets/{id}/vs-actual", get(get_budget_vs_actual))
}
