//! HTTP write endpoint and collection read API.
//!
//! - `POST /api/write` with `Authorization: Bearer <token>` and body
//!   `{collection, data}` appends `data` plus the verified user id and a
//!   server timestamp to the collection.
//! - `GET /api/collections/{collection}/documents` returns stored documents,
//!   optionally `order=timestamp_desc`, `limit`, and `start_after=<doc id>`.

use crate::auth::TokenVerifier;
use crate::recorder::WriteResponse;
use crate::store::{Cursor, DocumentStore, NewDocument, Query};
use crate::{ServiceError, ServiceErrorKind};
use axum::body::Bytes;
use axum::extract::{Path, Query as UrlQuery, Request, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::middleware::{Next, from_fn};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, instrument, warn};

const UNAUTHORIZED: &str = "Unauthorized: Missing or invalid token";
const MISSING_FIELDS: &str = "Invalid request: Missing collection or data";
const METHOD_NOT_ALLOWED: &str = "Method not allowed";
const INTERNAL_ERROR: &str = "Internal server error";

/// Shared handler state: the store written to and the token verifier.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn DocumentStore>,
    verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Bundles the capabilities the handlers need.
    pub fn new(store: Arc<dyn DocumentStore>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { store, verifier }
    }
}

/// Query parameters of the read route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Maximum number of documents.
    pub limit: Option<usize>,
    /// `timestamp_desc` for newest first.
    pub order: Option<String>,
    /// Return documents after this id.
    pub start_after: Option<String>,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/write",
            post(write_document).fallback(method_not_allowed),
        )
        .route("/api/collections/{collection}/documents", get(list_documents))
        .layer(from_fn(log_request))
        .with_state(state)
}

/// Serves the router on `listener` until the process exits.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
#[instrument(skip_all)]
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "Write endpoint listening");
    axum::serve(listener, router(state)).await
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    info!(method = %method, uri = %uri, "Incoming HTTP request");
    let response = next.run(request).await;
    info!(status = %response.status(), uri = %uri, "Response sent");
    response
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED)
}

#[instrument(skip_all)]
async fn write_document(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let Some(token) = bearer_token(&headers) else {
        warn!("Missing bearer token");
        return error_response(StatusCode::UNAUTHORIZED, UNAUTHORIZED);
    };

    let user_id = match state.verifier.verify(token).await {
        Ok(user_id) => user_id,
        Err(e) => {
            warn!(error = %e, "Token rejected");
            return error_response(StatusCode::UNAUTHORIZED, UNAUTHORIZED);
        }
    };

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Body is not JSON");
            return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS);
        }
    };
    let collection = payload
        .get("collection")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty());
    let data = payload.get("data").and_then(Value::as_object);
    let (Some(collection), Some(data)) = (collection, data) else {
        warn!("Missing collection or data");
        return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS);
    };

    let mut fields = data.clone();
    fields.remove("timestamp");
    fields.insert("userId".to_string(), Value::String(user_id.clone()));
    let document = NewDocument::new(fields, Utc::now());

    match state.store.add(collection, document).await {
        Ok(doc_id) => {
            info!(collection, doc_id = %doc_id, user_id = %user_id, "Document written");
            let body = WriteResponse {
                success: true,
                doc_id,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Error in server-side write");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
        }
    }
}

fn store_query(params: ListParams) -> Result<Query, ServiceError> {
    let mut query = Query::all();
    match params.order.as_deref() {
        None => {}
        Some("timestamp_desc") => query = query.with_newest_first(true),
        Some(other) => {
            return Err(ServiceError::validation(format!(
                "Unsupported order '{}'",
                other
            )));
        }
    }
    if let Some(limit) = params.limit {
        query = query.with_limit(limit);
    }
    if let Some(doc_id) = params.start_after {
        query = query.with_start_after(Cursor::from_doc_id(doc_id));
    }
    Ok(query)
}

#[instrument(skip(state, params), fields(collection = %collection))]
async fn list_documents(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    UrlQuery(params): UrlQuery<ListParams>,
) -> Response {
    debug!(?params, "Listing documents");
    let query = match store_query(params) {
        Ok(query) => query,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.user_message()),
    };

    match state.store.query(&collection, &query).await {
        Ok(documents) => Json(documents).into_response(),
        Err(e) => match e.kind {
            ServiceErrorKind::Validation(message) => {
                error_response(StatusCode::BAD_REQUEST, &message)
            }
            _ => {
                error!(error = %e, "Error reading collection");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
            }
        },
    }
}
