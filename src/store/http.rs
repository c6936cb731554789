//! Read access to a remote collection over the write endpoint's read API.

use crate::ServiceError;
use crate::store::{Document, DocumentReader, Query};
use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, error, instrument};

/// Reads documents from a server exposing
/// `GET /api/collections/{collection}/documents`.
#[derive(Debug, Clone)]
pub struct HttpStoreReader {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStoreReader {
    /// Creates a reader for the server at `base_url`.
    #[instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

/// URL of a collection's documents, with the collection name
/// percent-encoded as a single path segment.
pub(crate) fn documents_url(base_url: &str, collection: &str) -> Result<Url, ServiceError> {
    let mut url = Url::parse(base_url).map_err(|e| {
        ServiceError::validation(format!("Invalid server URL '{}': {}", base_url, e))
    })?;
    url.path_segments_mut()
        .map_err(|()| ServiceError::validation(format!("Invalid server URL '{}'", base_url)))?
        .pop_if_empty()
        .extend(["api", "collections", collection, "documents"]);
    Ok(url)
}

/// Encodes a query as URL parameters understood by the read API.
pub(crate) fn query_params(query: &Query) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if *query.newest_first() {
        params.push(("order", "timestamp_desc".to_string()));
    }
    if let Some(limit) = query.limit() {
        params.push(("limit", limit.to_string()));
    }
    if let Some(cursor) = query.start_after() {
        params.push(("start_after", cursor.doc_id().to_string()));
    }
    params
}

#[async_trait]
impl DocumentReader for HttpStoreReader {
    #[instrument(skip(self), fields(base_url = %self.base_url, collection = %collection))]
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, ServiceError> {
        let url = documents_url(&self.base_url, collection)?;
        let params = query_params(query);
        debug!(url = %url, ?params, "Querying remote collection");

        let response = self.client.get(url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Remote query failed");
            return Err(ServiceError::network(format!(
                "Query failed with status {}",
                status.as_u16()
            )));
        }

        let documents: Vec<Document> = response.json().await.map_err(|e| {
            error!(error = %e, "Invalid query response");
            ServiceError::external(format!("Invalid query response: {}", e))
        })?;
        debug!(count = documents.len(), "Remote query returned");
        Ok(documents)
    }
}
