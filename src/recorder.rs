//! One-shot saving of a completed game.

use crate::ServiceError;
use crate::auth::AuthProvider;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use scrabble_board::{GAME_LENGTH, LiveTurn, Turn, check_complete};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// The record submitted for a completed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct GameData {
    turns: Vec<Turn>,
    timestamp: DateTime<Utc>,
}

/// Body of a write endpoint request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct WriteRequest {
    collection: String,
    data: GameData,
}

/// Successful write endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResponse {
    /// Always true on success.
    pub success: bool,
    /// Id assigned by the store.
    #[serde(rename = "docId")]
    pub doc_id: String,
}

/// Submits write requests on behalf of a signed-in user.
#[async_trait]
pub trait WriteEndpoint: Send + Sync {
    /// Sends `request` authorised by `token` and returns the new document id.
    async fn write(&self, token: &str, request: &WriteRequest) -> Result<String, ServiceError>;
}

/// Write endpoint reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpWriteClient {
    url: String,
    client: reqwest::Client,
}

impl HttpWriteClient {
    /// Creates a client posting to `url`.
    #[instrument(skip_all, fields(url = %url.as_ref()))]
    pub fn new(url: impl AsRef<str>) -> Self {
        Self {
            url: url.as_ref().to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl WriteEndpoint for HttpWriteClient {
    #[instrument(skip(self, token, request), fields(url = %self.url, collection = %request.collection))]
    async fn write(&self, token: &str, request: &WriteRequest) -> Result<String, ServiceError> {
        debug!(turns = request.data.turns.len(), "Posting game");
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or(status.as_str());
            warn!(status = %status, "Write rejected");
            return Err(ServiceError::network(format!("Failed to save: {}", reason)));
        }

        let body: WriteResponse = response.json().await.map_err(|e| {
            ServiceError::external(format!("Invalid write response: {}", e))
        })?;
        info!(doc_id = %body.doc_id, "Game written");
        Ok(body.doc_id)
    }
}

/// Progress of the single save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// No attempt yet.
    Idle,
    /// Attempt in flight.
    Saving,
    /// Stored under this id.
    Saved(String),
    /// Attempt failed with this message; not retried.
    Failed(String),
}

/// Saves a game exactly once, when its fourteenth turn is played.
pub struct GameRecorder {
    collection: String,
    auth: Arc<dyn AuthProvider>,
    endpoint: Arc<dyn WriteEndpoint>,
    status: SaveStatus,
}

impl std::fmt::Debug for GameRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameRecorder")
            .field("collection", &self.collection)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl GameRecorder {
    /// Creates an idle recorder.
    #[instrument(skip(auth, endpoint))]
    pub fn new(
        collection: String,
        auth: Arc<dyn AuthProvider>,
        endpoint: Arc<dyn WriteEndpoint>,
    ) -> Self {
        info!("Creating GameRecorder");
        Self {
            collection,
            auth,
            endpoint,
            status: SaveStatus::Idle,
        }
    }

    /// Current save status.
    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    /// Offers the turns played so far.
    ///
    /// Saves only when exactly [`GAME_LENGTH`] turns are present and no
    /// attempt has been made; every later call is a no-op.
    #[instrument(skip(self, turns), fields(collection = %self.collection, count = turns.len()))]
    pub async fn on_turns_changed(&mut self, turns: &[LiveTurn]) -> &SaveStatus {
        if self.status != SaveStatus::Idle || turns.len() != GAME_LENGTH {
            debug!(status = ?self.status, "Nothing to save");
            return &self.status;
        }

        self.status = SaveStatus::Saving;
        info!("Saving completed game");
        self.status = match self.save(turns).await {
            Ok(doc_id) => {
                info!(doc_id = %doc_id, "Game saved");
                SaveStatus::Saved(doc_id)
            }
            Err(e) => {
                error!(error = %e, "Error saving game");
                SaveStatus::Failed(e.user_message())
            }
        };
        &self.status
    }

    async fn save(&self, turns: &[LiveTurn]) -> Result<String, ServiceError> {
        let token = self
            .auth
            .id_token()
            .await?
            .ok_or_else(|| ServiceError::unauthenticated("User not authenticated"))?;

        let turns: Vec<Turn> = turns.iter().cloned().map(LiveTurn::into_turn).collect();
        check_complete(&turns).map_err(|e| ServiceError::validation(e.to_string()))?;

        let request = WriteRequest::new(self.collection.clone(), GameData::new(turns, Utc::now()));
        self.endpoint.write(&token, &request).await
    }
}
