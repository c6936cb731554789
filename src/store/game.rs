//! Completed games as read back from the store.

use crate::ServiceError;
use crate::store::Document;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use scrabble_board::{Grid, ReplayError, ScoreSummary, Turn, aggregate, replay};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// A completed game: store id, turns in persistence order, and the time the
/// store accepted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PersistedGame {
    id: String,
    turns: Vec<Turn>,
    timestamp: DateTime<Utc>,
}

impl PersistedGame {
    /// Creates a game record.
    pub fn new(id: impl Into<String>, turns: Vec<Turn>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            turns,
            timestamp,
        }
    }

    /// Decodes the `turns` field of a stored document.
    ///
    /// # Errors
    ///
    /// Returns an external-service [`ServiceError`] if the document has no
    /// `turns` array or a turn is malformed.
    #[instrument(skip(document), fields(doc_id = %document.id()))]
    pub fn from_document(document: &Document) -> Result<Self, ServiceError> {
        let turns = document.data().get("turns").cloned().ok_or_else(|| {
            warn!("Document has no turns");
            ServiceError::external(format!("Document '{}' has no turns", document.id()))
        })?;
        let turns: Vec<Turn> = serde_json::from_value(turns).map_err(|e| {
            warn!(error = %e, "Malformed turns");
            ServiceError::external(format!(
                "Document '{}' has malformed turns: {}",
                document.id(),
                e
            ))
        })?;
        Ok(Self::new(document.id().clone(), turns, *document.timestamp()))
    }

    /// Per-player and total scores.
    pub fn scores(&self) -> ScoreSummary {
        aggregate(&self.turns)
    }

    /// The final board.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the stored turns do not replay cleanly.
    pub fn board(&self) -> Result<Grid, ReplayError> {
        replay(&self.turns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrabble_board::Direction;
    use serde_json::{Map, json};

    fn document(data: serde_json::Value) -> Document {
        let data: Map<String, serde_json::Value> =
            serde_json::from_value(data).expect("object");
        Document::new("doc-1".to_string(), Utc::now(), data)
    }

    #[test]
    fn decodes_turns_and_ignores_extra_fields() {
        let doc = document(json!({
            "userId": "u1",
            "turns": [{"id": 1, "row": 7, "col": 7, "direction": "horizontal", "bingo": "CAT", "score": 10}]
        }));
        let game = PersistedGame::from_document(&doc).expect("decode");
        assert_eq!(game.id(), "doc-1");
        assert_eq!(
            game.turns(),
            &vec![Turn::new(1, 7, 7, Direction::Horizontal, "CAT", 10)]
        );
        assert_eq!(game.scores().total(), 10);
        assert_eq!(game.board().expect("board").letter(7, 9), Some('T'));
    }

    #[test]
    fn missing_turns_is_an_error() {
        let doc = document(json!({ "userId": "u1" }));
        assert!(PersistedGame::from_document(&doc).is_err());
    }
}
