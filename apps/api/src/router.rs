use axum::{routing::get, Router};

use auth_cell::router::auth_routes;
use booking_cell::router::booking_routes;
use shared_database::AppState;
use slot_cell::router::slot_routes;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Slot booking API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/slots", slot_routes(state.clone()))
        .nest("/bookings", booking_routes(state))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use shared_database::MemoryStore;
    use shared_utils::test_utils::TestConfig;

    use super::*;

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_liveness() {
        let state = AppState::new(TestConfig::default().to_app_config(), Arc::new(MemoryStore::new()));
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let (status, body) = send(create_router(state), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Slot booking API is running!");
    }

    #[tokio::test]
    async fn test_register_login_book_flow() {
        let store = Arc::new(MemoryStore::new());
        let day = (Utc::now() + Duration::days(2)).date_naive();
        let slot = store
            .add_open_slot(day.and_hms_opt(10, 0, 0).unwrap().and_utc(), 30)
            .await;
        let app = create_router(AppState::new(TestConfig::default().to_app_config(), store));

        let (status, _) = send(
            app.clone(),
            post_json(
                "/auth/register",
                json!({ "name": "Ana", "email": "ana@clinic.io", "password": "secret1" }),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app.clone(),
            post_json("/auth/login", json!({ "email": "ana@clinic.io", "password": "secret1" }), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let login: Value = serde_json::from_slice(&body).unwrap();
        let token = login["access_token"].as_str().unwrap().to_string();

        let request = Request::builder()
            .uri(format!("/slots?from={}", day.format("%Y-%m-%d")))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        let slots: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(slots[0]["id"], slot.id.to_string());

        let (status, _) = send(
            app.clone(),
            post_json("/bookings", json!({ "slotId": slot.id }), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let request = Request::builder()
            .uri(format!("/slots?from={}", day.format("%Y-%m-%d")))
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(app, request).await;
        let slots: Value = serde_json::from_slice(&body).unwrap();
        assert!(slots.as_array().unwrap().is_empty());
    }
}
