//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use perfect_scrabble::{DocumentStore, InMemoryStore, NewDocument};
use scrabble_board::{Direction, LiveTurn, Turn};
use serde_json::{Map, Value, json};

pub const COLLECTION: &str = "perfect-scrabble-games";

const WORDS: [&str; 14] = [
    "RETAINS", "SATIRE", "QUOTING", "JOVIAL", "ZEPHYRS", "BANDITO", "WAXING", "FLOWERS",
    "CLIMBED", "PARTING", "HOSTILE", "MUSKETS", "GRAVITY", "DOZENS",
];

/// Fourteen non-overlapping turns, one per row; turn `id` scores `id * points`.
pub fn full_game(points: u32) -> Vec<Turn> {
    WORDS
        .iter()
        .zip(1u32..)
        .map(|(word, id)| Turn::new(id, (id - 1) as usize, 0, Direction::Horizontal, *word, id * points))
        .collect()
}

/// The same game as played live, with a shrinking tile bag.
pub fn live_game() -> Vec<LiveTurn> {
    full_game(10)
        .into_iter()
        .map(|turn| {
            let left = 14 - turn.id();
            LiveTurn::new(turn, vec!['E'; left as usize], left)
        })
        .collect()
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Stored fields for a game, as the write endpoint would store them.
pub fn game_fields(turns: &[Turn]) -> Map<String, Value> {
    let value = json!({ "userId": "user-1", "turns": turns });
    serde_json::from_value(value).expect("object")
}

/// Seeds `count` games one minute apart; game `i` scores `10 * (i + 1)` per point.
pub async fn seed_games(store: &InMemoryStore, count: u32) -> Vec<String> {
    let mut ids = Vec::new();
    for i in 0..count {
        let doc = NewDocument::new(
            game_fields(&full_game(i + 1)),
            base_time() + Duration::minutes(i64::from(i)),
        );
        ids.push(store.add(COLLECTION, doc).await.expect("add"));
    }
    ids
}
