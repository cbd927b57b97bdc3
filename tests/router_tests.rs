//! HTTP routing, authentication and error mapping, without a database

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::*;
use equipdesk_server::{
    api,
    config::AppConfig,
    models::principal::{Role, UserClaims},
    AppState,
};

fn token(user_id: i32, role: Role) -> String {
    let now = Utc::now().timestamp();
    UserClaims {
        sub: format!("user{}", user_id),
        user_id,
        role,
        exp: now + 3600,
        iat: now,
    }
    .create_token(JWT_SECRET)
    .unwrap()
}

async fn app() -> Router {
    let store = seeded_store().await;
    let config = AppConfig {
        auth: auth_config(),
        ..AppConfig::default()
    };
    api::router(AppState {
        config: Arc::new(config),
        services: Arc::new(services(store, date(2024, 1, 6))),
    })
}

async fn send(app: Router, method: &str, uri: &str, bearer: Option<String>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_is_public() {
    let (status, body) = send(app().await, "GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn lifecycle_routes_require_a_token() {
    let (status, body) = send(app().await, "GET", "/api/v1/checkouts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotAuthenticated");

    let (status, _) = send(
        app().await,
        "GET",
        "/api/v1/checkouts",
        Some("not-a-jwt".to_string()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn checkout_conflicts_map_to_http_statuses() {
    let app = app().await;
    let manager = token(MANAGER, Role::Manager);
    let body = json!({
        "equipment_id": CAMERA,
        "user_id": TRAINER,
        "expected_return_date": "2024-01-10"
    });

    let (status, created) = send(app.clone(), "POST", "/api/v1/checkouts", Some(manager.clone()), Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "in_progress");

    let (status, _) = send(app.clone(), "POST", "/api/v1/checkouts", Some(manager.clone()), Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let trainer = token(TRAINER, Role::Trainer);
    let uri = format!("/api/v1/checkouts/{}/checkin", created["id"]);
    let (status, _) = send(app.clone(), "POST", &uri, Some(trainer.clone()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, returned) = send(app.clone(), "POST", &uri, Some(manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(returned["status"], "returned");

    let (status, _) = send(app, "POST", &uri, Some(trainer), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_overdue_is_staff_only() {
    let app = app().await;

    let (status, _) = send(
        app.clone(),
        "POST",
        "/api/v1/checkouts/update-overdue",
        Some(token(TRAINER, Role::Trainer)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        app,
        "POST",
        "/api/v1/checkouts/update-overdue",
        Some(token(ADMIN, Role::Administrator)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert!(body.get("notifications").is_none());
}

#[tokio::test]
async fn approving_with_negative_amount_is_a_bad_request() {
    let app = app().await;
    let (status, created) = send(
        app.clone(),
        "POST",
        "/api/v1/acquisitions",
        Some(token(TRAINER, Role::Trainer)),
        Some(json!({ "equipment_name": "Document camera" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["quantity"], 1);
    assert_eq!(created["urgency"], "normal");

    let uri = format!("/api/v1/acquisitions/{}/approve", created["id"]);
    let (status, _) = send(
        app.clone(),
        "POST",
        &uri,
        Some(token(MANAGER, Role::Manager)),
        Some(json!({ "amount": "-3.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, approved) = send(
        app,
        "POST",
        &uri,
        Some(token(MANAGER, Role::Manager)),
        Some(json!({ "amount": "3.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");
}

#[tokio::test]
async fn unknown_issue_is_not_found() {
    let (status, body) = send(
        app().await,
        "POST",
        "/api/v1/issues/77/take-charge",
        Some(token(MANAGER, Role::Manager)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("77"));
}
