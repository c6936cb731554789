//! Client for the hosted turn-scoring API.

use crate::ServiceError;
use scrabble_board::{Coordinate, Turn};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

/// Response from the scoring API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTurnResponse {
    /// Whether the turn was scored.
    pub success: bool,
    /// Score, when successful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    /// Reason, when unsuccessful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Calls the scoring API with a turn description.
#[derive(Debug, Clone)]
pub struct ScoringClient {
    url: String,
    client: reqwest::Client,
}

impl ScoringClient {
    /// Creates a client for the API at `url`.
    #[instrument(skip_all, fields(url = %url.as_ref()))]
    pub fn new(url: impl AsRef<str>) -> Self {
        Self {
            url: url.as_ref().to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Scores `turn`, marking `blank_positions` as played with blanks.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on transport failure, a non-success status,
    /// or an unreadable response body.
    #[instrument(skip(self, blank_positions), fields(url = %self.url, blanks = blank_positions.map_or(0, |p| p.len())))]
    pub async fn score_turn(
        &self,
        turn: &str,
        blank_positions: Option<&[Coordinate]>,
    ) -> Result<ScoreTurnResponse, ServiceError> {
        let mut params = vec![("turn", turn.to_string())];
        if let Some(positions) = blank_positions {
            let encoded = serde_json::to_string(positions).map_err(|e| {
                ServiceError::validation(format!("Failed to encode blank positions: {}", e))
            })?;
            params.push(("blankPositions", encoded));
        }
        debug!(?params, "Requesting turn score");

        let response = self.client.get(&self.url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Scoring request failed");
            return Err(ServiceError::external(format!(
                "API request failed with status {}",
                status.as_u16()
            )));
        }

        let body: ScoreTurnResponse = response.json().await.map_err(|e| {
            ServiceError::external(format!("Invalid scoring response: {}", e))
        })?;
        debug!(success = body.success, score = ?body.score, "Turn scored");
        Ok(body)
    }

    /// Scores a recorded turn, sending its word and the board positions of
    /// its blank tiles.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] under the same conditions as
    /// [`ScoringClient::score_turn`].
    #[instrument(skip(self, turn), fields(turn_id = turn.id()))]
    pub async fn score_recorded_turn(
        &self,
        turn: &Turn,
    ) -> Result<ScoreTurnResponse, ServiceError> {
        let positions = turn.blank_positions();
        let blanks = (!positions.is_empty()).then_some(positions.as_slice());
        self.score_turn(turn.bingo(), blanks).await
    }
}
