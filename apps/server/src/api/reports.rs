use std::sync::Arc;

use crate::{
    api::shared::{resolve_range, today},
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Query, RawQuery, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use fintrack_core::reports::{
    CashFlowMonth, CategoryChart, ChartOptions, Dashboard, TierProgress,
};
use serde::Deserialize;

const DEFAULT_PROGRESS_WIDTH: f64 = 100.0;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangeQuery {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TierProgressQuery {
    as_of: Option<NaiveDate>,
    width: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DashboardQuery {
    as_of: Option<NaiveDate>,
}

/// Splits the chart query into the date window and chart options.
/// `expanded` may repeat or carry a comma separated list of row ids.
fn parse_chart_query(
    raw: Option<&str>,
) -> ApiResult<(Option<NaiveDate>, Option<NaiveDate>, ChartOptions)> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw.unwrap_or_default())
        .map_err(|e| ApiError::BadRequest(format!("Invalid query string: {e}")))?;

    let mut start = None;
    let mut end = None;
    let mut options = ChartOptions::default();
    for (key, value) in pairs {
        match key.as_str() {
            "startDate" => start = Some(parse_param(&key, &value)?),
            "endDate" => end = Some(parse_param(&key, &value)?),
            "maxVisible" => options.max_visible = parse_param(&key, &value)?,
            "includeTotal" => options.include_total = parse_param(&key, &value)?,
            "totalLabel" => options.total_label = value,
            "othersLabel" => options.others_label = value,
            "expanded" => options.expanded.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string),
            ),
            _ => {}
        }
    }
    Ok((start, end, options))
}

fn parse_param<T: std::str::FromStr>(key: &str, value: &str) -> ApiResult<T> {
    value
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid value '{}' for {}", value, key)))
}

async fn category_chart(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<CategoryChart>> {
    let (start, end, options) = parse_chart_query(raw.as_deref())?;
    let range = resolve_range(start, end, state.fiscal_year_start_month)?;
    Ok(Json(state.report_service.category_chart(&range, &options)?))
}

async fn cash_flow(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Vec<CashFlowMonth>>> {
    let range = resolve_range(
        query.start_date,
        query.end_date,
        state.fiscal_year_start_month,
    )?;
    Ok(Json(state.report_service.cash_flow(&range)?))
}

async fn tier_progress(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TierProgressQuery>,
) -> ApiResult<Json<TierProgress>> {
    let width = query.width.unwrap_or(DEFAULT_PROGRESS_WIDTH);
    let as_of = query.as_of.unwrap_or_else(today);
    Ok(Json(state.report_service.tier_progress(as_of, width)?))
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<Dashboard>> {
    let as_of = query.as_of.unwrap_or_else(today);
    Ok(Json(state.report_service.dashboard(as_of)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports/category-chart", get(category_chart))
        .route("/reports/cash-flow", get(cash_flow))
        .route("/reports/tier-progress", get(tier_progress))
        .route("/reports/dashboard", get(dashboard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_query_collects_expanded_ids() {
        let (start, end, options) = parse_chart_query(Some(
            "startDate=2024-01-01&endDate=2024-12-31&maxVisible=3&includeTotal=true&expanded=a,b&expanded=__others__",
        ))
        .unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(options.max_visible, 3);
        assert!(options.include_total);
        assert_eq!(options.expanded.len(), 3);
        assert!(options.expanded.contains("__others__"));
    }

    #[test]
    fn chart_query_defaults_when_empty() {
        let (start, end, options) = parse_chart_query(None).unwrap();
        assert!(start.is_none() && end.is_none());
        assert_eq!(options, ChartOptions::default());
    }

    #[test]
    fn chart_query_rejects_bad_numbers() {
        assert!(parse_chart_query(Some("maxVisible=many")).is_err());
    }
}
