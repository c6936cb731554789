//! Documents, queries, and the store traits.

use crate::ServiceError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored document: store-assigned id, server timestamp, and fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, new)]
pub struct Document {
    id: String,
    timestamp: DateTime<Utc>,
    data: Map<String, Value>,
}

/// A document to append; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Getters, new)]
pub struct NewDocument {
    data: Map<String, Value>,
    timestamp: DateTime<Utc>,
}

/// Opaque continuation point: the last document of the previous page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    doc_id: String,
}

impl Cursor {
    /// A cursor positioned just after `document`.
    pub fn after(document: &Document) -> Self {
        Self {
            doc_id: document.id.clone(),
        }
    }

    /// A cursor positioned after the document with this id.
    pub fn from_doc_id(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
        }
    }

    /// Id of the document the cursor follows.
    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }
}

/// Which documents a read returns.
///
/// The default query is an unordered scan of the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Setters)]
#[setters(prefix = "with_", strip_option)]
pub struct Query {
    /// Order by timestamp, newest first.
    newest_first: bool,
    /// Maximum number of documents.
    limit: Option<usize>,
    /// Return only documents strictly after this one.
    start_after: Option<Cursor>,
}

impl Query {
    /// Every document, in storage order.
    pub fn all() -> Self {
        Self::default()
    }

    /// The `limit` most recent documents.
    pub fn recent(limit: usize) -> Self {
        Self::default().with_newest_first(true).with_limit(limit)
    }

    /// True when the query asks for a bounded page.
    pub fn is_paginated(&self) -> bool {
        self.limit.is_some()
    }
}

/// Read access to a document collection.
#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// Runs `query` against `collection`.
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, ServiceError>;
}

/// Read and append access to a document collection.
#[async_trait]
pub trait DocumentStore: DocumentReader {
    /// Appends a document and returns its new id.
    async fn add(&self, collection: &str, document: NewDocument) -> Result<String, ServiceError>;
}
