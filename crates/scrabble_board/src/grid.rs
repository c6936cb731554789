//! The fixed-size board.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of rows and columns on the board.
pub const BOARD_SIZE: usize = 15;

/// A single square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// No tile.
    #[default]
    Empty,
    /// A placed tile showing this letter.
    Tile(char),
}

impl Square {
    /// Returns the letter on this square, if any.
    pub fn letter(self) -> Option<char> {
        match self {
            Square::Empty => None,
            Square::Tile(letter) => Some(letter),
        }
    }
}

/// A row/column pair on the board, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub col: usize,
}

/// A `BOARD_SIZE` x `BOARD_SIZE` grid of squares.
///
/// Grids are values: placing a word produces a new grid and leaves the
/// original untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    squares: [[Square; BOARD_SIZE]; BOARD_SIZE],
}

impl Grid {
    /// Creates an all-empty grid.
    pub fn new() -> Self {
        Self {
            squares: [[Square::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Returns the square at `(row, col)`, or `None` off the board.
    pub fn get(&self, row: usize, col: usize) -> Option<Square> {
        self.squares.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Returns the letter at `(row, col)`, or `None` if empty or off the board.
    pub fn letter(&self, row: usize, col: usize) -> Option<char> {
        self.get(row, col).and_then(Square::letter)
    }

    /// Returns the rows of the grid, top to bottom.
    pub fn rows(&self) -> &[[Square; BOARD_SIZE]; BOARD_SIZE] {
        &self.squares
    }

    /// Counts squares holding a tile.
    pub fn tile_count(&self) -> usize {
        self.squares
            .iter()
            .flatten()
            .filter(|square| **square != Square::Empty)
            .count()
    }

    /// Returns true if no square holds a tile.
    pub fn is_empty(&self) -> bool {
        self.tile_count() == 0
    }

    /// Writes a tile. Callers guarantee the coordinate is on the board.
    pub(crate) fn set(&mut self, row: usize, col: usize, letter: char) {
        self.squares[row][col] = Square::Tile(letter);
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.squares.iter().enumerate() {
            let line: String = row
                .iter()
                .map(|square| square.letter().unwrap_or('.'))
                .collect();
            write!(f, "{line}")?;
            if i + 1 < BOARD_SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
