use std::time::Duration;

use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use fintrack_server::{api::app_router, auth::AuthConfig, build_state, config::Config};
use rand::{rngs::OsRng, RngCore};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn build_test_router(password: &str) -> (Router, TempDir) {
    let tmp = tempdir().unwrap();

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string();

    let mut secret_bytes = [0u8; 32];
    OsRng.fill_bytes(&mut secret_bytes);

    let config = Config {
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        auth: Some(AuthConfig {
            password_hash,
            jwt_secret: secret_bytes.to_vec(),
            access_token_ttl: Duration::from_secs(3600),
        }),
        ..Config::default()
    };
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config).unwrap(), tmp)
}

fn login_request(password: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "password": password }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn login_and_access_protected_route() {
    let password = "super-secret";
    let (app, _tmp) = build_test_router(password).await;

    // Unauthorized request should fail
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/accounts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Auth status reflects requirement
    let status_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(status_response.status(), StatusCode::OK);
    let status_body = to_bytes(status_response.into_body(), usize::MAX)
        .await
        .unwrap();
    let status_json: serde_json::Value = serde_json::from_slice(&status_body).unwrap();
    assert_eq!(status_json["requiresPassword"], true);

    let login_response = app.clone().oneshot(login_request(password)).await.unwrap();
    assert_eq!(login_response.status(), StatusCode::OK);
    let cookie = login_response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("ft_session="));
    assert!(cookie.contains("HttpOnly"));
    let login_bytes = to_bytes(login_response.into_body(), usize::MAX)
        .await
        .unwrap();
    let login_json: serde_json::Value = serde_json::from_slice(&login_bytes).unwrap();
    let token = login_json["accessToken"].as_str().unwrap();
    assert_eq!(login_json["expiresIn"], 3600);

    // Access with token succeeds
    let authed_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/accounts")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(authed_response.status(), StatusCode::OK);

    // So does the session cookie alone
    let session = cookie.split(';').next().unwrap().to_string();
    let cookie_response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/accounts")
                .header(header::COOKIE, session)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(cookie_response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_and_forged_token_are_rejected() {
    let (app, _tmp) = build_test_router("right").await;

    let response = app.clone().oneshot(login_request("wrong")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], 401);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/reports/dashboard")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_the_session_cookie_and_health_stays_public() {
    let (app, _tmp) = build_test_router("pw").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.starts_with("ft_session=;"));
    assert!(cookie.contains("Max-Age=0"));

    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_is_not_found_when_auth_is_disabled() {
    let tmp = tempdir().unwrap();
    let config = Config {
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        ..Config::default()
    };
    let state = build_state(&config).await.unwrap();
    let app = app_router(state, &config).unwrap();

    let response = app.clone().oneshot(login_request("x")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/accounts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
