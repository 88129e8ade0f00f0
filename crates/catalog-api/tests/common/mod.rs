//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use catalog_cache::cached_repository::CachedCardRepository;
use catalog_cache::in_memory::InMemoryCache;
use catalog_core::repository::CardRepository;
use catalog_event_store::in_memory::InMemoryEventStore;
use catalog_event_store::pg_event_store::PgEventStore;
use catalog_test_support::RecordingEventPublisher;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use catalog_api::build_router;
use catalog_api::state::AppState;

fn app_over(event_store: Arc<dyn CardRepository>) -> Router {
    let repository = Arc::new(CachedCardRepository::new(
        event_store,
        Arc::new(InMemoryCache::new()),
    ));
    build_router(AppState::new(
        repository,
        Arc::new(RecordingEventPublisher::new()),
    ))
}

/// Build the full app router over an in-memory store, returned with the store
/// so a test can build further routers that share it.
pub fn build_in_memory_app() -> (Router, Arc<InMemoryEventStore>) {
    let store = Arc::new(InMemoryEventStore::new());
    (app_over(store.clone()), store)
}

/// Build another router over an existing in-memory store.
pub fn app_for(store: &Arc<InMemoryEventStore>) -> Router {
    app_over(store.clone())
}

/// Build the full app router with a real `PgEventStore`.
pub fn build_test_app(pool: PgPool) -> Router {
    app_over(Arc::new(PgEventStore::new(pool)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("POST", uri, body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("PUT", uri, body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}
