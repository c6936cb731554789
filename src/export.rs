//! JSON export of the whole collection.

use crate::ServiceError;
use crate::store::{DocumentReader, PersistedGame, Query};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

/// Message shown when an export fails.
pub const EXPORT_FAILED_MESSAGE: &str = "Failed to export games. Please try again.";

/// File name for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("perfect-scrabble-games-{}.json", date.format("%Y-%m-%d"))
}

/// Encodes games as a pretty-printed JSON array of `{id, turns, timestamp}`.
///
/// # Errors
///
/// Returns a validation [`ServiceError`] if serialization fails.
#[instrument(skip(games), fields(count = games.len()))]
pub fn encode_games(games: &[PersistedGame]) -> Result<String, ServiceError> {
    serde_json::to_string_pretty(games)
        .map_err(|e| ServiceError::validation(format!("Failed to encode games: {}", e)))
}

/// Reads every game in `collection`, unpaginated.
///
/// # Errors
///
/// Returns [`ServiceError`] if the read fails or a document is malformed.
#[instrument(skip(reader))]
pub async fn fetch_all(
    reader: &dyn DocumentReader,
    collection: &str,
) -> Result<Vec<PersistedGame>, ServiceError> {
    reader
        .query(collection, &Query::all())
        .await?
        .iter()
        .map(PersistedGame::from_document)
        .collect()
}

/// Fetches the whole collection and writes it to `dir`, named for `date`.
///
/// Returns the path written.
///
/// # Errors
///
/// Returns [`ServiceError`] if the read, encoding, or file write fails.
#[instrument(skip(reader, dir), fields(dir = %dir.as_ref().display()))]
pub async fn export_collection(
    reader: &dyn DocumentReader,
    collection: &str,
    dir: impl AsRef<Path>,
    date: NaiveDate,
) -> Result<PathBuf, ServiceError> {
    let result = async {
        let games = fetch_all(reader, collection).await?;
        let json = encode_games(&games)?;
        let path = dir.as_ref().join(export_file_name(date));
        tokio::fs::write(&path, json).await.map_err(|e| {
            ServiceError::external(format!("Failed to write {}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), games = games.len(), "Collection exported");
        Ok::<PathBuf, ServiceError>(path)
    }
    .await;

    if let Err(e) = &result {
        error!(error = %e, "Error exporting games");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_embeds_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).expect("date");
        assert_eq!(
            export_file_name(date),
            "perfect-scrabble-games-2025-03-09.json"
        );
    }

    #[test]
    fn no_games_encode_as_empty_array() {
        assert_eq!(encode_games(&[]).expect("encode"), "[]");
    }
}
