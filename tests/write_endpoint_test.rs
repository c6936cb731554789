//! Tests for the write endpoint and its HTTP clients.

mod common;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{COLLECTION, full_game, seed_games};
use http_body_util::BodyExt;
use perfect_scrabble::{
    AppState, CollectionQueryEngine, Document, DocumentReader, DocumentStore, GameData,
    HttpStoreReader, HttpWriteClient, InMemoryStore, NewDocument, PAGE_SIZE, Query, ServiceError,
    StaticTokenVerifier, WriteEndpoint, WriteRequest, router,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

/// A store that is unreachable for writes.
struct BrokenStore;

#[async_trait]
impl DocumentReader for BrokenStore {
    async fn query(&self, _: &str, _: &Query) -> Result<Vec<Document>, ServiceError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl DocumentStore for BrokenStore {
    async fn add(&self, _: &str, _: NewDocument) -> Result<String, ServiceError> {
        Err(ServiceError::external("disk full"))
    }
}

fn verifier() -> Arc<StaticTokenVerifier> {
    let tokens = HashMap::from([("token-1".to_string(), "user-1".to_string())]);
    Arc::new(StaticTokenVerifier::new(tokens))
}

fn state(store: &InMemoryStore) -> AppState {
    AppState::new(Arc::new(store.clone()), verifier())
}

fn write_body() -> Value {
    json!({
        "collection": COLLECTION,
        "data": {
            "turns": full_game(10),
            "timestamp": "2025-06-01T12:00:00Z",
        },
    })
}

fn post(token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/write")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn test_get_on_write_route_is_rejected() {
    let store = InMemoryStore::new();
    let request = Request::builder()
        .method("GET")
        .uri("/api/write")
        .body(Body::empty())
        .expect("request");

    let response = router(state(&store)).oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json_body(response).await["error"], "Method not allowed");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let store = InMemoryStore::new();

    let response = router(state(&store))
        .oneshot(post(None, &write_body()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await["error"],
        "Unauthorized: Missing or invalid token"
    );
    assert_eq!(store.len(COLLECTION).expect("len"), 0);
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let store = InMemoryStore::new();

    let response = router(state(&store))
        .oneshot(post(Some("forged"), &write_body()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.len(COLLECTION).expect("len"), 0);
}

#[tokio::test]
async fn test_missing_data_is_bad_request() {
    let store = InMemoryStore::new();
    let body = json!({ "collection": COLLECTION });

    let response = router(state(&store))
        .oneshot(post(Some("token-1"), &body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Invalid request: Missing collection or data"
    );
}

#[tokio::test]
async fn test_valid_write_stores_user_and_server_timestamp() {
    let store = InMemoryStore::new();

    let response = router(state(&store))
        .oneshot(post(Some("token-1"), &write_body()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    let doc_id = body["docId"].as_str().expect("doc id").to_string();

    let documents = store.query(COLLECTION, &Query::all()).await.expect("query");
    assert_eq!(documents.len(), 1);
    let document = &documents[0];
    assert_eq!(document.id(), &doc_id);
    assert_eq!(document.data()["userId"], "user-1");
    assert!(document.data().get("timestamp").is_none());
    assert_eq!(document.data()["turns"].as_array().map(Vec::len), Some(14));
    assert!(document.timestamp().timestamp() > 1_748_779_200);
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let app = router(AppState::new(Arc::new(BrokenStore), verifier()));

    let response = app
        .oneshot(post(Some("token-1"), &write_body()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Internal server error" })
    );
}

#[tokio::test]
async fn test_read_route_pages_newest_first() {
    let store = InMemoryStore::new();
    let ids = seed_games(&store, 7).await;
    let request = Request::builder()
        .uri(format!(
            "/api/collections/{}/documents?order=timestamp_desc&limit=3&start_after={}",
            COLLECTION, ids[5]
        ))
        .body(Body::empty())
        .expect("request");

    let response = router(state(&store)).oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let returned: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|doc| doc["id"].as_str())
        .collect();
    assert_eq!(returned, vec![ids[4].as_str(), ids[3].as_str(), ids[2].as_str()]);
}

#[tokio::test]
async fn test_read_route_rejects_unknown_order() {
    let store = InMemoryStore::new();
    let request = Request::builder()
        .uri(format!("/api/collections/{}/documents?order=score", COLLECTION))
        .body(Body::empty())
        .expect("request");

    let response = router(state(&store)).oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

async fn spawn_server(store: &InMemoryStore) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app_state = state(store);
    tokio::spawn(async move {
        perfect_scrabble::serve(listener, app_state)
            .await
            .expect("serve");
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_http_clients_round_trip_through_server() {
    let store = InMemoryStore::new();
    let base_url = spawn_server(&store).await;
    let writer = HttpWriteClient::new(format!("{}/api/write", base_url));

    for _ in 0..6 {
        let request = WriteRequest::new(
            COLLECTION.to_string(),
            GameData::new(full_game(10), common::base_time()),
        );
        writer.write("token-1", &request).await.expect("write");
    }

    let reader = HttpStoreReader::new(&base_url);
    let mut engine = CollectionQueryEngine::new(COLLECTION, PAGE_SIZE);
    engine.load(&reader).await;
    assert_eq!(engine.games().len(), 5);
    engine.load_more(&reader).await;
    assert_eq!(engine.games().len(), 6);
    assert!(!engine.has_more());
    assert!(engine.games().iter().all(|g| g.scores().total() == 1050));
}

#[tokio::test]
async fn test_http_write_client_reports_rejection() {
    let store = InMemoryStore::new();
    let base_url = spawn_server(&store).await;
    let writer = HttpWriteClient::new(format!("{}/api/write", base_url));
    let request = WriteRequest::new(
        COLLECTION.to_string(),
        GameData::new(full_game(10), common::base_time()),
    );

    let error = writer.write("forged", &request).await.expect_err("rejected");

    assert_eq!(error.user_message(), "Failed to save: Unauthorized");
    assert_eq!(store.len(COLLECTION).expect("len"), 0);
}

#[tokio::test]
async fn test_reader_encodes_collection_name() {
    let store = InMemoryStore::new();
    let base_url = spawn_server(&store).await;
    let collection = "finals/2025 games";
    let writer = HttpWriteClient::new(format!("{}/api/write", base_url));
    let request = WriteRequest::new(
        collection.to_string(),
        GameData::new(full_game(10), common::base_time()),
    );
    writer.write("token-1", &request).await.expect("write");

    let documents = HttpStoreReader::new(&base_url)
        .query(collection, &Query::all())
        .await
        .expect("query");

    assert_eq!(documents.len(), 1);
    assert_eq!(store.len(collection).expect("len"), 1);
    assert_eq!(store.len(COLLECTION).expect("len"), 0);
}
