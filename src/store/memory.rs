//! In-process document store backing the local write endpoint and tests.

use crate::ServiceError;
use crate::store::{Cursor, Document, DocumentReader, DocumentStore, NewDocument, Query};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Default)]
struct Collections {
    documents: HashMap<String, Vec<Document>>,
    next_id: u64,
}

/// Thread-safe in-memory store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Collections>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory document store");
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, ServiceError> {
        self.inner
            .lock()
            .map_err(|_| ServiceError::external("Document store lock poisoned"))
    }

    /// Number of documents in `collection`.
    #[instrument(skip(self))]
    pub fn len(&self, collection: &str) -> Result<usize, ServiceError> {
        Ok(self.lock()?.documents.get(collection).map_or(0, Vec::len))
    }

    /// True when `collection` holds no documents.
    pub fn is_empty(&self, collection: &str) -> Result<bool, ServiceError> {
        Ok(self.len(collection)? == 0)
    }
}

#[async_trait]
impl DocumentReader for InMemoryStore {
    #[instrument(skip(self), fields(collection = %collection))]
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, ServiceError> {
        let guard = self.lock()?;
        let mut documents: Vec<Document> = guard
            .documents
            .get(collection)
            .cloned()
            .unwrap_or_default();
        drop(guard);

        if *query.newest_first() {
            // Later insertions win timestamp ties.
            documents.reverse();
            documents.sort_by(|a, b| b.timestamp().cmp(a.timestamp()));
        }

        let start = match query.start_after() {
            Some(cursor) => position_after(&documents, cursor)?,
            None => 0,
        };
        let limit = query.limit().unwrap_or(usize::MAX);
        let page: Vec<Document> = documents.into_iter().skip(start).take(limit).collect();

        debug!(returned = page.len(), start, "Query served");
        Ok(page)
    }
}

fn position_after(documents: &[Document], cursor: &Cursor) -> Result<usize, ServiceError> {
    documents
        .iter()
        .position(|doc| doc.id() == cursor.doc_id())
        .map(|index| index + 1)
        .ok_or_else(|| {
            warn!(doc_id = cursor.doc_id(), "Cursor document not found");
            ServiceError::validation(format!("Unknown cursor document '{}'", cursor.doc_id()))
        })
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    #[instrument(skip(self, document), fields(collection = %collection))]
    async fn add(&self, collection: &str, document: NewDocument) -> Result<String, ServiceError> {
        let mut guard = self.lock()?;
        guard.next_id += 1;
        let id = format!("doc-{:06}", guard.next_id);
        let stored = Document::new(
            id.clone(),
            *document.timestamp(),
            document.data().clone(),
        );
        guard
            .documents
            .entry(collection.to_string())
            .or_default()
            .push(stored);
        info!(doc_id = %id, "Document added");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::Map;

    async fn seeded(count: i64) -> InMemoryStore {
        let store = InMemoryStore::new();
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        for i in 0..count {
            let doc = NewDocument::new(Map::new(), base + Duration::minutes(i));
            store.add("games", doc).await.expect("add");
        }
        store
    }

    #[tokio::test]
    async fn newest_first_orders_by_timestamp() {
        let store = seeded(3).await;
        let docs = store
            .query("games", &Query::recent(10))
            .await
            .expect("query");
        let ids: Vec<&str> = docs.iter().map(|d| d.id().as_str()).collect();
        assert_eq!(ids, vec!["doc-000003", "doc-000002", "doc-000001"]);
    }

    #[tokio::test]
    async fn start_after_skips_through_cursor() {
        let store = seeded(4).await;
        let query = Query::recent(2).with_start_after(Cursor::from_doc_id("doc-000003"));
        let docs = store.query("games", &query).await.expect("query");
        let ids: Vec<&str> = docs.iter().map(|d| d.id().as_str()).collect();
        assert_eq!(ids, vec!["doc-000002", "doc-000001"]);
    }

    #[tokio::test]
    async fn unknown_cursor_is_an_error() {
        let store = seeded(1).await;
        let query = Query::all().with_start_after(Cursor::from_doc_id("missing"));
        assert!(store.query("games", &query).await.is_err());
    }

    #[tokio::test]
    async fn missing_collection_is_empty() {
        let store = InMemoryStore::new();
        let docs = store.query("nothing", &Query::all()).await.expect("query");
        assert!(docs.is_empty());
        assert!(store.is_empty("nothing").expect("len"));
    }
}
