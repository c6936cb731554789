//! Writing one word onto a grid.

use crate::grid::{BOARD_SIZE, Grid};
use crate::turn::{Blanks, Direction, Overlap};
use tracing::{debug, instrument, warn};

/// Everything needed to lay a word on the board.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    /// Starting row.
    pub row: usize,
    /// Starting column.
    pub col: usize,
    /// Layout direction.
    pub direction: Direction,
    /// Letters to write, in order.
    pub word: &'a str,
    /// Existing board tile the word reuses.
    pub overlap: Option<&'a Overlap>,
    /// Blank tiles used in the word.
    pub blanks: Option<&'a Blanks>,
}

/// Reasons a placement is rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PlacementError {
    /// The word has no letters.
    #[display("Cannot place an empty word")]
    EmptyWord,

    /// Part of the word falls off the board.
    #[display("Word of length {len} at ({row}, {col}) runs off the board")]
    OutOfBounds {
        /// Starting row.
        row: usize,
        /// Starting column.
        col: usize,
        /// Word length.
        len: usize,
    },

    /// A blank index points past the end of the word.
    #[display("Blank index {index} is outside a word of length {len}")]
    BlankIndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Word length.
        len: usize,
    },

    /// The declared overlap does not match the board.
    #[display("Overlap at index {index} expects '{expected}' but found {found:?}")]
    OverlapMismatch {
        /// Index within the word.
        index: usize,
        /// Tile the turn claims to reuse.
        expected: char,
        /// What the board actually holds.
        found: Option<char>,
    },

    /// The word would overwrite a different letter.
    #[display("Square ({row}, {col}) holds '{existing}', cannot place '{placed}'")]
    Conflict {
        /// Row of the conflicting square.
        row: usize,
        /// Column of the conflicting square.
        col: usize,
        /// Letter already there.
        existing: char,
        /// Letter the word wants to write.
        placed: char,
    },
}

/// Places a word on `grid`, returning the resulting grid.
///
/// The input grid is left untouched. Letters at blank indices are written
/// as the letter recorded in the blanks descriptor. Squares that already
/// hold the same letter (ignoring case) are reused as-is; any other
/// occupied square is a conflict.
///
/// # Errors
///
/// Returns [`PlacementError`] if the word is empty, leaves the board, has a
/// blank index past its end, declares an overlap the board does not have,
/// or collides with a different letter.
#[instrument(skip(grid, placement), fields(row = placement.row, col = placement.col, direction = %placement.direction, word = placement.word))]
pub fn place_word(grid: &Grid, placement: &Placement<'_>) -> Result<Grid, PlacementError> {
    let letters: Vec<char> = placement.word.chars().collect();
    let len = letters.len();
    if len == 0 {
        warn!("Rejecting empty word");
        return Err(PlacementError::EmptyWord);
    }

    let (dr, dc) = placement.direction.step();
    let end_row = placement.row.checked_add(dr * (len - 1));
    let end_col = placement.col.checked_add(dc * (len - 1));
    let on_board = matches!(
        (end_row, end_col),
        (Some(r), Some(c)) if r < BOARD_SIZE && c < BOARD_SIZE
    );
    if !on_board {
        warn!(len, "Word runs off the board");
        return Err(PlacementError::OutOfBounds {
            row: placement.row,
            col: placement.col,
            len,
        });
    }

    if let Some(blanks) = placement.blanks
        && let Some(&index) = blanks.indices.iter().find(|&&i| i >= len)
    {
        return Err(PlacementError::BlankIndexOutOfRange { index, len });
    }

    if let Some(overlap) = placement.overlap {
        if overlap.index >= len {
            return Err(PlacementError::OverlapMismatch {
                index: overlap.index,
                expected: overlap.tile,
                found: None,
            });
        }
        let at = placement
            .direction
            .offset(placement.row, placement.col, overlap.index);
        let found = grid.letter(at.row, at.col);
        if !found.is_some_and(|letter| letter.eq_ignore_ascii_case(&overlap.tile)) {
            warn!(index = overlap.index, ?found, "Overlap does not match board");
            return Err(PlacementError::OverlapMismatch {
                index: overlap.index,
                expected: overlap.tile,
                found,
            });
        }
    }

    let mut next = grid.clone();
    for (index, &letter) in letters.iter().enumerate() {
        let placed = match placement.blanks {
            Some(blanks) if blanks.covers(index) => blanks.tile,
            _ => letter,
        };
        let at = placement.direction.offset(placement.row, placement.col, index);
        match grid.letter(at.row, at.col) {
            Some(existing) if existing.eq_ignore_ascii_case(&placed) => {
                debug!(row = at.row, col = at.col, "Reusing existing tile");
            }
            Some(existing) => {
                warn!(row = at.row, col = at.col, %existing, %placed, "Placement conflict");
                return Err(PlacementError::Conflict {
                    row: at.row,
                    col: at.col,
                    existing,
                    placed,
                });
            }
            None => next.set(at.row, at.col, placed),
        }
    }

    Ok(next)
}
