//! Rebuilding a board from a turn history.

use crate::grid::Grid;
use crate::placement::{PlacementError, place_word};
use crate::turn::Turn;
use tracing::{debug, instrument, warn};

/// Reasons a turn history cannot be replayed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ReplayError {
    /// Two turns share an id, so their order is ambiguous.
    #[display("Turn id {_0} appears more than once")]
    DuplicateTurnId(#[error(not(source))] u32),

    /// A turn could not be placed on the board built so far.
    #[display("Turn {turn_id} could not be placed: {source}")]
    Placement {
        /// Id of the failing turn.
        turn_id: u32,
        /// Why placement failed.
        source: PlacementError,
    },
}

/// Returns the turns sorted by ascending id.
///
/// # Errors
///
/// Returns [`ReplayError::DuplicateTurnId`] if two turns share an id.
#[instrument(skip(turns), fields(count = turns.len()))]
pub fn ordered(turns: &[Turn]) -> Result<Vec<&Turn>, ReplayError> {
    let mut sorted: Vec<&Turn> = turns.iter().collect();
    sorted.sort_by_key(|turn| turn.id());
    if let Some(pair) = sorted.windows(2).find(|pair| pair[0].id() == pair[1].id()) {
        warn!(turn_id = pair[0].id(), "Duplicate turn id");
        return Err(ReplayError::DuplicateTurnId(pair[0].id()));
    }
    Ok(sorted)
}

/// Replays every turn onto an empty grid.
///
/// # Errors
///
/// Returns [`ReplayError`] on duplicate ids or an invalid placement.
pub fn replay(turns: &[Turn]) -> Result<Grid, ReplayError> {
    replay_onto(Grid::new(), turns)
}

/// Replays turns onto an existing grid, in ascending id order.
///
/// Each step depends only on the previous grid, so a replay can resume
/// from the board left by any prefix of the history.
///
/// # Errors
///
/// Returns [`ReplayError`] on duplicate ids or an invalid placement.
#[instrument(skip(start, turns), fields(count = turns.len()))]
pub fn replay_onto(start: Grid, turns: &[Turn]) -> Result<Grid, ReplayError> {
    let grid = ordered(turns)?
        .into_iter()
        .try_fold(start, |grid, turn| {
            debug!(turn_id = turn.id(), word = turn.bingo(), "Applying turn");
            place_word(&grid, &turn.placement()).map_err(|source| ReplayError::Placement {
                turn_id: turn.id(),
                source,
            })
        })?;
    debug!(tiles = grid.tile_count(), "Replay complete");
    Ok(grid)
}

/// Replays the turns with id up to and including `last_id`.
///
/// # Errors
///
/// Returns [`ReplayError`] on duplicate ids or an invalid placement.
#[instrument(skip(turns), fields(count = turns.len()))]
pub fn replay_through(turns: &[Turn], last_id: u32) -> Result<Grid, ReplayError> {
    let prefix: Vec<Turn> = turns
        .iter()
        .filter(|turn| turn.id() <= last_id)
        .cloned()
        .collect();
    replay(&prefix)
}

/// Returns the board before any turn followed by the board after each turn.
///
/// # Errors
///
/// Returns [`ReplayError`] on duplicate ids or an invalid placement.
#[instrument(skip(turns), fields(count = turns.len()))]
pub fn snapshots(turns: &[Turn]) -> Result<Vec<Grid>, ReplayError> {
    let mut boards = vec![Grid::new()];
    for turn in ordered(turns)? {
        let previous = boards.last().cloned().unwrap_or_default();
        let next = place_word(&previous, &turn.placement()).map_err(|source| {
            ReplayError::Placement {
                turn_id: turn.id(),
                source,
            }
        })?;
        boards.push(next);
    }
    Ok(boards)
}
