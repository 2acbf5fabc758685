//! HTTP-level tests for the subscription API
//!
//! The router runs over the in-memory store; requests go through the full
//! middleware stack via `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use subscription_service::api;
use subscription_service::service::SubscriptionService;
use subscription_service::storage::InMemorySubscriptionRepository;
use tower::ServiceExt;
use uuid::Uuid;

fn create_test_app() -> Router {
    let repo = Arc::new(InMemorySubscriptionRepository::new());
    let service = Arc::new(SubscriptionService::new(repo));
    api::router(service, Duration::from_secs(5))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn subscription_body(user_id: Uuid, price: i64, start: &str, end: Option<&str>) -> Value {
    let mut body = json!({
        "service_name": "Netflix",
        "price": price,
        "user_id": user_id,
        "start_date": start,
    });
    if let Some(end) = end {
        body["end_date"] = json!(end);
    }
    body
}

#[tokio::test]
async fn test_create_and_get_subscription() {
    let app = create_test_app();
    let user_id = Uuid::new_v4();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/v1/subscriptions",
        Some(subscription_body(user_id, 400, "07-2025", None)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/subscriptions/{id}");
    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], json!(id));
    assert_eq!(fetched["service_name"], json!("Netflix"));
    assert_eq!(fetched["price"], json!(400));
    assert_eq!(fetched["user_id"], json!(user_id.to_string()));
    assert_eq!(fetched["start_date"], json!("07-2025"));
    assert!(fetched.get("end_date").is_none());
}

#[tokio::test]
async fn test_create_with_invalid_json() {
    let app = create_test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/subscriptions")
        .body(Body::from("{"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], json!("invalid json"));
    assert_eq!(body["status"], json!(400));
}

#[tokio::test]
async fn test_create_with_end_before_start() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/subscriptions",
        Some(subscription_body(Uuid::new_v4(), 400, "08-2025", Some("07-2025"))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid period"));
}

#[tokio::test]
async fn test_create_with_missing_fields() {
    let app = create_test_app();
    let (status, body) = send(&app, Method::POST, "/api/v1/subscriptions", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("missing required fields"));
}

#[tokio::test]
async fn test_get_unknown_and_malformed_ids() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/subscriptions/{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("subscription not found"));

    let (status, body) = send(&app, Method::GET, "/api/v1/subscriptions/bad-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid id"));
}

#[tokio::test]
async fn test_update_and_delete_subscription() {
    let app = create_test_app();
    let user_id = Uuid::new_v4();
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/v1/subscriptions",
        Some(subscription_body(user_id, 400, "07-2025", None)),
    )
    .await;
    let uri = format!("/api/v1/subscriptions/{}", created["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(subscription_body(user_id, 500, "07-2025", Some("12-2025"))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("updated successfully"));

    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched["price"], json!(500));
    assert_eq!(fetched["end_date"], json!("12-2025"));

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_unknown_subscription() {
    let app = create_test_app();
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/subscriptions/{}", Uuid::new_v4()),
        Some(subscription_body(Uuid::new_v4(), 500, "07-2025", None)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_filters_and_orders_newest_first() {
    let app = create_test_app();
    let user_id = Uuid::new_v4();
    let mut ids = Vec::new();
    for price in [100, 200] {
        let (_, created) = send(
            &app,
            Method::POST,
            "/api/v1/subscriptions",
            Some(subscription_body(user_id, price, "07-2025", None)),
        )
        .await;
        ids.push(created["id"].clone());
    }
    send(
        &app,
        Method::POST,
        "/api/v1/subscriptions",
        Some(subscription_body(Uuid::new_v4(), 300, "07-2025", None)),
    )
    .await;

    let (status, items) = send(
        &app,
        Method::GET,
        &format!("/api/v1/subscriptions?user_id={user_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<Value> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].clone())
        .collect();
    assert_eq!(listed, vec![ids[1].clone(), ids[0].clone()]);

    let (status, body) = send(&app, Method::GET, "/api/v1/subscriptions?user_id=nope", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid user id"));
}

#[tokio::test]
async fn test_total_over_period() {
    let app = create_test_app();
    let user_id = Uuid::new_v4();
    for (price, start, end) in [
        (100, "07-2025", Some("09-2025")),
        (200, "08-2025", None),
        (999, "01-2024", Some("02-2024")),
    ] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/subscriptions",
            Some(subscription_body(user_id, price, start, end)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/subscriptions/total?from=07-2025&to=09-2025&user_id={user_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(700));

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/subscriptions/total?from=07-2025&to=09-2025&service_name=Spotify",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(0));
}

#[tokio::test]
async fn test_repeated_query_keys_use_first_value() {
    let app = create_test_app();
    let user_id = Uuid::new_v4();
    for (price, start, end) in [(100, "07-2025", Some("09-2025")), (200, "08-2025", None)] {
        send(
            &app,
            Method::POST,
            "/api/v1/subscriptions",
            Some(subscription_body(user_id, price, start, end)),
        )
        .await;
    }

    let (status, items) = send(
        &app,
        Method::GET,
        &format!("/api/v1/subscriptions?user_id={user_id}&user_id={}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items.as_array().unwrap().len(), 2);

    let uri = format!(
        "/api/v1/subscriptions/total?from=07-2025&to=09-2025&to=10-2025&user_id={user_id}"
    );
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], json!(700));
}

#[tokio::test]
async fn test_repeated_bad_query_key_keeps_json_error() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/subscriptions?user_id=nope&user_id=nope",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid user id"));
    assert_eq!(body["status"], json!(400));
}

#[tokio::test]
async fn test_total_validation_errors() {
    let app = create_test_app();

    let uri = "/api/v1/subscriptions/total?from=07-2025";
    let (status, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("missing required fields"));

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/subscriptions/total?from=09-2025&to=07-2025",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid period"));
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["database"], json!("ok"));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::HEAD)
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
