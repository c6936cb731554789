//! Turn records: one word placement per turn.

use crate::grid::Coordinate;
use crate::placement::Placement;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Direction a word is laid out in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Left to right along a row.
    Horizontal,
    /// Top to bottom along a column.
    Vertical,
}

impl Direction {
    /// Row and column deltas for one step along this direction.
    pub fn step(self) -> (usize, usize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
        }
    }

    /// Coordinate of the letter at `index` in a word starting at `(row, col)`.
    pub fn offset(self, row: usize, col: usize, index: usize) -> Coordinate {
        let (dr, dc) = self.step();
        Coordinate {
            row: row + dr * index,
            col: col + dc * index,
        }
    }
}

/// An existing board tile reused by a new word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Overlap {
    /// Letter already on the board.
    pub tile: char,
    /// Index of that letter within the new word.
    pub index: usize,
}

/// Wildcard tiles used in a word, and the letter they stand for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Blanks {
    /// Letter the blank tiles represent.
    pub tile: char,
    /// Indices within the word played with a blank.
    pub indices: Vec<usize>,
}

impl Blanks {
    /// Returns true if the letter at `index` was played with a blank.
    pub fn covers(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }
}

/// One persisted word placement.
///
/// The id is 1-based; its parity decides which player made the turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    id: u32,
    row: usize,
    col: usize,
    direction: Direction,
    bingo: String,
    score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    overlap: Option<Overlap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    blanks: Option<Blanks>,
}

impl Turn {
    /// Creates a turn without overlap or blanks.
    #[instrument(skip(bingo))]
    pub fn new(
        id: u32,
        row: usize,
        col: usize,
        direction: Direction,
        bingo: impl Into<String>,
        score: u32,
    ) -> Self {
        Self {
            id,
            row,
            col,
            direction,
            bingo: bingo.into(),
            score,
            overlap: None,
            blanks: None,
        }
    }

    /// Sets the reused board tile.
    pub fn with_overlap(mut self, tile: char, index: usize) -> Self {
        self.overlap = Some(Overlap { tile, index });
        self
    }

    /// Sets the blank tiles used.
    pub fn with_blanks(mut self, tile: char, indices: Vec<usize>) -> Self {
        self.blanks = Some(Blanks { tile, indices });
        self
    }

    /// Sequence id, starting at 1.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Starting row.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Starting column.
    pub fn col(&self) -> usize {
        self.col
    }

    /// Layout direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The word played.
    pub fn bingo(&self) -> &str {
        &self.bingo
    }

    /// Score reported by the scoring service.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Reused board tile, if any.
    pub fn overlap(&self) -> Option<&Overlap> {
        self.overlap.as_ref()
    }

    /// Blank tiles used, if any.
    pub fn blanks(&self) -> Option<&Blanks> {
        self.blanks.as_ref()
    }

    /// Borrows this turn as a placement on the board.
    pub fn placement(&self) -> Placement<'_> {
        Placement {
            row: self.row,
            col: self.col,
            direction: self.direction,
            word: &self.bingo,
            overlap: self.overlap.as_ref(),
            blanks: self.blanks.as_ref(),
        }
    }

    /// Board coordinates of every letter played with a blank.
    #[instrument(skip(self), fields(turn_id = self.id))]
    pub fn blank_positions(&self) -> Vec<Coordinate> {
        self.blanks
            .iter()
            .flat_map(|blanks| blanks.indices.iter())
            .map(|&index| self.direction.offset(self.row, self.col, index))
            .collect()
    }
}

/// A turn as played live, carrying the rack state after the turn.
///
/// The tile bag and tile count are only meaningful while playing and are
/// dropped by [`LiveTurn::into_turn`] before a game is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveTurn {
    #[serde(flatten)]
    turn: Turn,
    #[serde(rename = "tileBag", default)]
    tile_bag: Vec<char>,
    #[serde(rename = "tilesLeft", default)]
    tiles_left: u32,
}

impl LiveTurn {
    /// Creates a live turn.
    pub fn new(turn: Turn, tile_bag: Vec<char>, tiles_left: u32) -> Self {
        Self {
            turn,
            tile_bag,
            tiles_left,
        }
    }

    /// The persistent part of this turn.
    pub fn turn(&self) -> &Turn {
        &self.turn
    }

    /// Tiles remaining in the bag.
    pub fn tile_bag(&self) -> &[char] {
        &self.tile_bag
    }

    /// Number of tiles left.
    pub fn tiles_left(&self) -> u32 {
        self.tiles_left
    }

    /// Drops the live-play fields.
    pub fn into_turn(self) -> Turn {
        self.turn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parses_lowercase_names() {
        assert_eq!("horizontal".parse::<Direction>(), Ok(Direction::Horizontal));
        assert_eq!(Direction::Vertical.to_string(), "vertical");
    }

    #[test]
    fn blank_positions_follow_direction() {
        let turn = Turn::new(2, 3, 4, Direction::Vertical, "QUIZZES", 90)
            .with_blanks('Z', vec![3, 4]);
        assert_eq!(
            turn.blank_positions(),
            vec![Coordinate { row: 6, col: 4 }, Coordinate { row: 7, col: 4 }]
        );
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let turn = Turn::new(1, 7, 7, Direction::Horizontal, "CAT", 10);
        let json = serde_json::to_value(&turn).expect("serialize");
        assert!(json.get("overlap").is_none());
        assert!(json.get("blanks").is_none());
        assert_eq!(json["direction"], "horizontal");
    }

    #[test]
    fn live_turn_reads_camel_case_ephemeral_fields() {
        let json = serde_json::json!({
            "id": 1, "row": 7, "col": 1, "direction": "horizontal",
            "bingo": "RETAINS", "score": 72,
            "tileBag": ["A", "E"], "tilesLeft": 2
        });
        let live: LiveTurn = serde_json::from_value(json).expect("deserialize");
        assert_eq!(live.tiles_left(), 2);
        assert_eq!(live.tile_bag(), &['A', 'E']);

        let persisted = serde_json::to_value(live.into_turn()).expect("serialize");
        assert!(persisted.get("tileBag").is_none());
        assert!(persisted.get("tilesLeft").is_none());
    }
}
