//! Stepping through a scripted perfect game.

use crate::recorder::{GameRecorder, SaveStatus};
use scrabble_board::{Grid, LiveTurn, ReplayError, ScoreSummary, Turn, aggregate, replay};
use tracing::{debug, info, instrument};

/// Plays a fixed sequence of turns one at a time and records the game
/// once the last turn is on the board.
#[derive(Debug)]
pub struct LivePlayback {
    script: Vec<LiveTurn>,
    played: usize,
    recorder: GameRecorder,
}

impl LivePlayback {
    /// Starts playback with no turns played.
    #[instrument(skip(script, recorder), fields(turns = script.len()))]
    pub fn new(script: Vec<LiveTurn>, recorder: GameRecorder) -> Self {
        info!("Starting playback");
        Self {
            script,
            played: 0,
            recorder,
        }
    }

    /// Turns played so far.
    pub fn played(&self) -> &[LiveTurn] {
        &self.script[..self.played]
    }

    /// The next turn to play, if any.
    pub fn next_turn(&self) -> Option<&LiveTurn> {
        self.script.get(self.played)
    }

    /// True once every scripted turn is played.
    pub fn is_complete(&self) -> bool {
        self.played == self.script.len()
    }

    /// Save status of the recorder.
    pub fn save_status(&self) -> &SaveStatus {
        self.recorder.status()
    }

    fn persisted_prefix(&self, count: usize) -> Vec<Turn> {
        self.script[..count]
            .iter()
            .map(|live| live.turn().clone())
            .collect()
    }

    /// Board after the turns played so far.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the played turns do not replay cleanly.
    pub fn board(&self) -> Result<Grid, ReplayError> {
        replay(&self.persisted_prefix(self.played))
    }

    /// Scores of the turns played so far.
    pub fn scores(&self) -> ScoreSummary {
        aggregate(&self.persisted_prefix(self.played))
    }

    /// Plays the next turn and returns the new board.
    ///
    /// Returns `Ok(None)` when the script is exhausted. A turn that cannot
    /// be placed is not played.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] if the next turn does not fit the board.
    #[instrument(skip(self), fields(played = self.played))]
    pub async fn advance(&mut self) -> Result<Option<Grid>, ReplayError> {
        if self.is_complete() {
            debug!("Script exhausted");
            return Ok(None);
        }

        let board = replay(&self.persisted_prefix(self.played + 1))?;
        self.played += 1;
        info!(played = self.played, "Turn played");

        self.recorder
            .on_turns_changed(&self.script[..self.played])
            .await;
        Ok(Some(board))
    }
}
