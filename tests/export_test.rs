//! Tests for exporting the collection to disk.

mod common;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{COLLECTION, seed_games};
use perfect_scrabble::{
    Document, DocumentReader, InMemoryStore, Query, ServiceError, export_collection,
};
use serde_json::Value;

struct UnreachableReader;

#[async_trait]
impl DocumentReader for UnreachableReader {
    async fn query(&self, _: &str, _: &Query) -> Result<Vec<Document>, ServiceError> {
        Err(ServiceError::network("connection refused"))
    }
}

fn export_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("date")
}

#[tokio::test]
async fn test_empty_collection_exports_empty_array() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = InMemoryStore::new();

    let path = export_collection(&store, COLLECTION, dir.path(), export_date())
        .await
        .expect("export");

    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some("perfect-scrabble-games-2025-06-01.json")
    );
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "[]");
}

#[tokio::test]
async fn test_export_contains_only_game_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = InMemoryStore::new();
    let ids = seed_games(&store, 3).await;

    let path = export_collection(&store, COLLECTION, dir.path(), export_date())
        .await
        .expect("export");

    let content = std::fs::read_to_string(&path).expect("read");
    assert!(content.contains("\n  {"));
    let records: Vec<Value> = serde_json::from_str(&content).expect("json");
    assert_eq!(records.len(), 3);
    for (record, id) in records.iter().zip(&ids) {
        let object = record.as_object().expect("object");
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["id", "timestamp", "turns"]);
        assert_eq!(object["id"], id.as_str());
        assert_eq!(object["turns"].as_array().map(Vec::len), Some(14));
    }
}

#[tokio::test]
async fn test_failed_read_writes_no_file() {
    let dir = tempfile::tempdir().expect("tempdir");

    let result = export_collection(&UnreachableReader, COLLECTION, dir.path(), export_date()).await;

    assert!(result.is_err());
    assert_eq!(std::fs::read_dir(dir.path()).expect("dir").count(), 0);
}
