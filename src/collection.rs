//! Browsing the stored game collection.
//!
//! The engine is a small state machine. Issuing a request and applying its
//! response are separate steps so that a response which arrives after a
//! newer request was issued can be recognised and dropped:
//!
//! ```text
//! Idle -> Loading -> Loaded | Errored
//! Loaded -> LoadingMore -> Loaded (appended) | Errored
//! ```
//!
//! Changing the sort mode always restarts at `Loading` with an empty list.

use crate::ServiceError;
use crate::store::{Cursor, Document, DocumentReader, PersistedGame, Query};
use std::cmp::Reverse;
use tracing::{debug, error, info, instrument, warn};

/// Games fetched per page when browsing by date.
pub const PAGE_SIZE: usize = 5;

/// Message shown when a fetch fails.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load games.";

/// How the collection is ordered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display, clap::ValueEnum,
)]
#[strum(serialize_all = "snake_case")]
pub enum SortMode {
    /// Newest first, fetched a page at a time.
    #[default]
    Timestamp,
    /// Highest total score first, fetched in one request.
    TotalScore,
}

/// Where a browsing session is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseState {
    /// Nothing requested yet.
    Idle,
    /// First page (or full scan) in flight.
    Loading,
    /// Results available.
    Loaded,
    /// Another page in flight; existing results stay visible.
    LoadingMore,
    /// The last fetch failed.
    Errored(String),
}

/// A fetch the engine wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    generation: u64,
    mode: SortMode,
    query: Query,
    append: bool,
}

impl QueryRequest {
    /// Monotonic id of this request within its engine.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The store query to run.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// True for "load more" requests.
    pub fn is_append(&self) -> bool {
        self.append
    }
}

/// The outcome of running a [`QueryRequest`].
#[derive(Debug)]
pub struct QueryResponse {
    request: QueryRequest,
    result: Result<Vec<Document>, ServiceError>,
}

impl QueryResponse {
    /// Pairs a request with its result.
    pub fn new(request: QueryRequest, result: Result<Vec<Document>, ServiceError>) -> Self {
        Self { request, result }
    }

    /// The request this answers.
    pub fn request(&self) -> &QueryRequest {
        &self.request
    }
}

/// Paginated, sortable view over one collection.
#[derive(Debug, Clone)]
pub struct CollectionQueryEngine {
    collection: String,
    page_size: usize,
    mode: SortMode,
    state: BrowseState,
    games: Vec<PersistedGame>,
    cursor: Option<Cursor>,
    has_more: bool,
    generation: u64,
}

impl CollectionQueryEngine {
    /// Creates an idle engine for `collection`.
    #[instrument(skip(collection), fields(collection = %collection.as_ref()))]
    pub fn new(collection: impl AsRef<str>, page_size: usize) -> Self {
        info!(page_size, "Creating collection query engine");
        Self {
            collection: collection.as_ref().to_string(),
            page_size: page_size.max(1),
            mode: SortMode::default(),
            state: BrowseState::Idle,
            games: Vec::new(),
            cursor: None,
            has_more: true,
            generation: 0,
        }
    }

    /// Collection being browsed.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Current sort mode.
    pub fn sort_mode(&self) -> SortMode {
        self.mode
    }

    /// Current state.
    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    /// Games loaded so far, in display order.
    pub fn games(&self) -> &[PersistedGame] {
        &self.games
    }

    /// True while more pages may exist.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// True when a "load more" action would issue a request.
    pub fn can_load_more(&self) -> bool {
        self.mode == SortMode::Timestamp
            && self.state == BrowseState::Loaded
            && self.has_more
            && self.cursor.is_some()
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Starts a fresh load in the current mode, discarding loaded results.
    #[instrument(skip(self), fields(collection = %self.collection, mode = %self.mode))]
    pub fn begin(&mut self) -> QueryRequest {
        self.state = BrowseState::Loading;
        self.games.clear();
        self.cursor = None;
        self.has_more = true;
        let query = match self.mode {
            SortMode::Timestamp => Query::recent(self.page_size),
            SortMode::TotalScore => Query::all(),
        };
        let generation = self.next_generation();
        debug!(generation, "Issuing initial query");
        QueryRequest {
            generation,
            mode: self.mode,
            query,
            append: false,
        }
    }

    /// Switches sort mode and starts a fresh load.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub fn set_sort_mode(&mut self, mode: SortMode) -> QueryRequest {
        info!(from = %self.mode, to = %mode, "Changing sort mode");
        self.mode = mode;
        self.begin()
    }

    /// Requests the page after the last loaded game.
    ///
    /// Returns `None` while a fetch is outstanding, after the last page, in
    /// total-score mode, or after an error.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub fn begin_load_more(&mut self) -> Option<QueryRequest> {
        if !self.can_load_more() {
            debug!(state = ?self.state, has_more = self.has_more, "Load more ignored");
            return None;
        }
        let cursor = self.cursor.clone()?;
        self.state = BrowseState::LoadingMore;
        let generation = self.next_generation();
        debug!(generation, after = cursor.doc_id(), "Issuing next page query");
        Some(QueryRequest {
            generation,
            mode: self.mode,
            query: Query::recent(self.page_size).with_start_after(cursor),
            append: true,
        })
    }

    /// Runs `request` against `reader`.
    ///
    /// Takes no engine borrow, so the engine can issue newer requests while
    /// this one is in flight.
    #[instrument(skip(reader, request), fields(collection = %collection, generation = request.generation))]
    pub async fn fetch(
        reader: &dyn DocumentReader,
        collection: &str,
        request: QueryRequest,
    ) -> QueryResponse {
        let result = reader.query(collection, &request.query).await;
        QueryResponse::new(request, result)
    }

    /// Applies a response. Returns `false` if it was stale and ignored.
    #[instrument(skip(self, response), fields(collection = %self.collection, generation = response.request.generation))]
    pub fn apply(&mut self, response: QueryResponse) -> bool {
        let QueryResponse { request, result } = response;
        if request.generation != self.generation {
            warn!(
                latest = self.generation,
                "Discarding response superseded by a newer query"
            );
            return false;
        }

        let documents = match result {
            Ok(documents) => documents,
            Err(e) => {
                error!(error = %e, "Error fetching games");
                self.state = BrowseState::Errored(LOAD_FAILED_MESSAGE.to_string());
                return true;
            }
        };

        let games = match documents
            .iter()
            .map(PersistedGame::from_document)
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(games) => games,
            Err(e) => {
                error!(error = %e, "Error decoding games");
                self.state = BrowseState::Errored(LOAD_FAILED_MESSAGE.to_string());
                return true;
            }
        };

        match request.mode {
            SortMode::TotalScore => {
                let mut games = games;
                // Stable: equal totals keep retrieval order.
                games.sort_by_key(|game| Reverse(game.scores().total()));
                self.games = games;
                self.has_more = false;
            }
            SortMode::Timestamp => {
                if documents.len() < self.page_size {
                    self.has_more = false;
                } else {
                    self.cursor = documents.last().map(Cursor::after);
                }
                if request.append {
                    self.games.extend(games);
                } else {
                    self.games = games;
                }
            }
        }

        self.state = BrowseState::Loaded;
        info!(
            loaded = self.games.len(),
            has_more = self.has_more,
            "Games loaded"
        );
        true
    }

    /// Loads the first page (or full scan) for the current mode.
    pub async fn load(&mut self, reader: &dyn DocumentReader) -> &BrowseState {
        let request = self.begin();
        let response = Self::fetch(reader, &self.collection, request).await;
        self.apply(response);
        &self.state
    }

    /// Appends the next page, if one may exist.
    pub async fn load_more(&mut self, reader: &dyn DocumentReader) -> &BrowseState {
        if let Some(request) = self.begin_load_more() {
            let response = Self::fetch(reader, &self.collection, request).await;
            self.apply(response);
        }
        &self.state
    }
}
