use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    auth::{self, AuthStatusResponse, LoginRequest, LoginResponse},
    config::Config,
    main_lib::AppState,
};

pub mod accounts;
mod budgets;
mod categories;
pub mod health;
mod notifications;
mod partners;
mod reports;
mod shared;
mod tiers;
mod transactions;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        health::readyz,
        auth::login,
        auth::logout,
        auth::auth_status,
        accounts::list_accounts,
        accounts::get_account_tree,
        accounts::create_account,
        accounts::get_account,
        accounts::update_account,
        accounts::delete_account
    ),
    components(schemas(LoginRequest, LoginResponse, AuthStatusResponse)),
    tags((name = "fintrack"))
)]
pub struct ApiDoc;

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    if config.cors_allow.iter().any(|o| o == "*") {
        return Ok(CorsLayer::new().allow_origin(Any));
    }
    let origins = config
        .cors_allow
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin '{}'", o))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(CorsLayer::new().allow_origin(origins))
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> anyhow::Result<Router> {
    let cors = cors_layer(config)?;
    let openapi = ApiDoc::openapi();

    let protected = Router::new()
        .merge(accounts::router())
        .merge(categories::router())
        .merge(transactions::router())
        .merge(budgets::router())
        .merge(tiers::router())
        .merge(partners::router())
        .merge(notifications::router())
        .merge(reports::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_jwt,
        ));

    let api = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/status", get(auth::auth_status))
        .merge(protected);

    Ok(Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http()))
}
