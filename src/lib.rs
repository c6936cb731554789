//! Perfect Scrabble games: recording, browsing, and exporting.
//!
//! Board placement, replay, and scoring live in the `scrabble_board` crate;
//! this crate connects them to the outside world.
//!
//! # Architecture
//!
//! - **Store**: document store capability (in-memory or remote over HTTP)
//! - **Collection**: paginated and score-sorted browsing of stored games
//! - **Export**: JSON export of the whole collection
//! - **Recorder**: one-shot save of a completed fourteen-turn game
//! - **Playback**: stepping through a scripted game
//! - **Server**: the authenticated write endpoint and read API
//!
//! # Example
//!
//! ```no_run
//! use perfect_scrabble::{CollectionQueryEngine, HttpStoreReader, PAGE_SIZE};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let reader = HttpStoreReader::new("http://127.0.0.1:3000");
//! let mut engine = CollectionQueryEngine::new("perfect-scrabble-games", PAGE_SIZE);
//! engine.load(&reader).await;
//! for game in engine.games() {
//!     println!("{} scored {}", game.id(), game.scores().total());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod auth;
mod collection;
mod config;
mod error;
mod export;
mod playback;
mod recorder;
mod render;
mod scoring;
mod server;
mod store;

pub use auth::{AuthProvider, StaticCredential, StaticTokenVerifier, TokenVerifier};
pub use collection::{
    BrowseState, CollectionQueryEngine, LOAD_FAILED_MESSAGE, PAGE_SIZE, QueryRequest,
    QueryResponse, SortMode,
};
pub use config::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE, ID_TOKEN_VAR};
pub use error::{ServiceError, ServiceErrorKind};
pub use export::{
    EXPORT_FAILED_MESSAGE, encode_games, export_collection, export_file_name, fetch_all,
};
pub use playback::LivePlayback;
pub use recorder::{
    GameData, GameRecorder, HttpWriteClient, SaveStatus, WriteEndpoint, WriteRequest,
    WriteResponse,
};
pub use render::{column_label, render_board, render_game, render_scores, render_turns};
pub use scoring::{ScoreTurnResponse, ScoringClient};
pub use server::{AppState, ListParams, router, serve};
pub use store::{
    Cursor, Document, DocumentReader, DocumentStore, HttpStoreReader, InMemoryStore,
    NewDocument, PersistedGame, Query,
};
