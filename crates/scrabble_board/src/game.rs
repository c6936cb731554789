//! Completeness rules for a recorded game.

use crate::turn::Turn;
use tracing::{instrument, warn};

/// Number of turns in a complete perfect game.
pub const GAME_LENGTH: usize = 14;

/// Why a turn sequence is not a complete game.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum IncompleteGame {
    /// Wrong number of turns.
    #[display("Expected {} turns, found {}", GAME_LENGTH, _0)]
    WrongLength(#[error(not(source))] usize),

    /// Turn ids are not 1..=14 in order.
    #[display("Turn at position {position} has id {found}, expected {expected}")]
    OutOfSequence {
        /// Zero-based position in the sequence.
        position: usize,
        /// Id found there.
        found: u32,
        /// Id that belongs there.
        expected: u32,
    },
}

/// Checks that `turns` holds exactly ids `1..=14` in increasing order.
///
/// # Errors
///
/// Returns [`IncompleteGame`] describing the first violation.
#[instrument(skip(turns), fields(count = turns.len()))]
pub fn check_complete(turns: &[Turn]) -> Result<(), IncompleteGame> {
    if turns.len() != GAME_LENGTH {
        return Err(IncompleteGame::WrongLength(turns.len()));
    }
    for (position, (turn, expected)) in turns.iter().zip(1u32..).enumerate() {
        if turn.id() != expected {
            warn!(position, found = turn.id(), expected, "Turn out of sequence");
            return Err(IncompleteGame::OutOfSequence {
                position,
                found: turn.id(),
                expected,
            });
        }
    }
    Ok(())
}
