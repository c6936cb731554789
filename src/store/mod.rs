//! Document store capability and its implementations.
//!
//! The hosted database is reached only through [`DocumentReader`] and
//! [`DocumentStore`]; callers receive an implementation at start-up rather
//! than reaching for a global client.

mod document;
mod game;
mod http;
mod memory;

pub use document::{Cursor, Document, DocumentReader, DocumentStore, NewDocument, Query};
pub use game::PersistedGame;
pub use http::HttpStoreReader;
pub use memory::InMemoryStore;
