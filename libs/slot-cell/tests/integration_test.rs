use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;

use shared_database::{AppState, ClinicStore, MemoryStore};
use slot_cell::router::slot_routes;
use shared_utils::test_utils::TestConfig;

fn create_test_app(store: Arc<MemoryStore>) -> Router {
    let config = TestConfig::default().to_app_config();
    slot_routes(AppState::new(config, store))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_future_day_lists_every_open_slot() {
    let store = Arc::new(MemoryStore::new());
    let day = (Utc::now() + Duration::days(3)).date_naive();
    let morning = day.and_hms_opt(9, 0, 0).unwrap().and_utc();

    let first = store.add_open_slot(morning, 30).await;
    let second = store.add_open_slot(morning + Duration::hours(1), 30).await;
    store.add_open_slot(morning + Duration::days(1), 30).await;

    let app = create_test_app(Arc::clone(&store));
    let (status, body) = get_json(app, &format!("/?from={}", day.format("%Y-%m-%d"))).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body.as_array().unwrap().iter().map(|s| s["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![first.id.to_string(), second.id.to_string()]);
}

#[tokio::test]
async fn test_today_excludes_elapsed_slots() {
    let store = Arc::new(MemoryStore::new());
    let now = Utc::now();
    let today = now.date_naive();
    let tomorrow = today.succ_opt().unwrap();

    // Stay inside today's bounds whatever the wall-clock time is.
    let day_start = today.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let past = store.add_open_slot(day_start, 1).await;
    let future = store.add_open_slot(now + Duration::seconds(30), 1).await;

    let app = create_test_app(Arc::clone(&store));
    let (status, body) = get_json(
        app,
        &format!("/?from={}&to={}", today.format("%Y-%m-%d"), tomorrow.format("%Y-%m-%d")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect();
    assert!(!ids.contains(&past.id.to_string()));
    if future.start_time.date_naive() == today {
        assert_eq!(ids, vec![future.id.to_string()]);
    }
}

#[tokio::test]
async fn test_booked_slots_are_not_listed() {
    let store = Arc::new(MemoryStore::new());
    let day = (Utc::now() + Duration::days(2)).date_naive();
    let slot = store
        .add_open_slot(day.and_hms_opt(10, 0, 0).unwrap().and_utc(), 30)
        .await;
    store.claim_slot(slot.id).await.unwrap();

    let app = create_test_app(store);
    let (status, body) = get_json(app, &format!("/?from={}", day.format("%Y-%m-%d"))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_date_is_bad_request() {
    let app = create_test_app(Arc::new(MemoryStore::new()));
    let (status, body) = get_json(app, "/").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["message"], "Missing 'from' date");
}

#[tokio::test]
async fn test_malformed_date_is_bad_request() {
    let app = create_test_app(Arc::new(MemoryStore::new()));
    let (status, body) = get_json(app, "/?from=tomorrow").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_far_future_date_is_bad_request() {
    let app = create_test_app(Arc::new(MemoryStore::new()));
    let (status, body) = get_json(app, "/?from=%2B262142-12-30&to=%2B262142-12-31").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}
