//! Integration tests for the HTTP router.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use foodcomp::store::{Seed, SqliteFoodStore};
use foodcomp::web::{router, AppState};
use serde_json::Value;
use tower::ServiceExt;

const SAMPLE: &str = include_str!("../fixtures/sample_food.json");

async fn app() -> Router {
    let store = SqliteFoodStore::open_in_memory().unwrap();
    store
        .load_seed(&Seed::from_json(SAMPLE).unwrap())
        .await
        .unwrap();
    router(Arc::new(AppState::new(Arc::new(store))))
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_get_food_returns_document_and_etag() {
    let response = app().await.oneshot(get("/api/foods/CL0001")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let etag = response.headers()[header::ETAG].to_str().unwrap().to_string();
    assert!(etag.starts_with('"') && etag.ends_with('"'));
    assert_eq!(etag.len(), 66);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let doc: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(doc["id"], 1);
    assert_eq!(doc["group"]["name"], "Cereals");
    assert!(doc.get("strain").is_none());
}

#[tokio::test]
async fn test_etag_is_stable_across_id_and_code() {
    let app = app().await;
    let by_id = app.clone().oneshot(get("/api/foods/1")).await.unwrap();
    let by_code = app.oneshot(get("/api/foods/CL0001")).await.unwrap();

    assert_eq!(
        by_id.headers()[header::ETAG],
        by_code.headers()[header::ETAG]
    );
}

#[tokio::test]
async fn test_matching_if_none_match_is_304() {
    let app = app().await;
    let first = app.clone().oneshot(get("/api/foods/1")).await.unwrap();
    let etag = first.headers()[header::ETAG].clone();

    let request = Request::get("/api/foods/1")
        .header(header::IF_NONE_MATCH, etag.clone())
        .body(Body::empty())
        .unwrap();
    let second = app.oneshot(request).await.unwrap();

    assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(second.headers()[header::ETAG], etag);
    let body = to_bytes(second.into_body(), usize::MAX).await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_stale_if_none_match_is_200() {
    let request = Request::get("/api/foods/1")
        .header(header::IF_NONE_MATCH, "\"stale\"")
        .body(Body::empty())
        .unwrap();
    let response = app().await.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_food_is_404() {
    let response = app().await.oneshot(get("/api/foods/CL9999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Food not found: CL9999");
}

#[tokio::test]
async fn test_health() {
    let response = app().await.oneshot(get("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value, serde_json::json!({ "status": "ok" }));
}
