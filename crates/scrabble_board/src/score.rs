//! Per-player score totals.

use crate::turn::Turn;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One of the two players in a perfect game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Player {
    /// Plays the odd-numbered turns.
    #[strum(serialize = "Player A")]
    A,
    /// Plays the even-numbered turns.
    #[strum(serialize = "Player B")]
    B,
}

/// Returns the player who made the turn with this id.
pub fn player_of(turn_id: u32) -> Player {
    if turn_id % 2 == 1 { Player::A } else { Player::B }
}

/// Score totals for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreSummary {
    player_a: u64,
    player_b: u64,
    total: u64,
}

impl ScoreSummary {
    /// Sum of odd-numbered turn scores.
    pub fn player_a(&self) -> u64 {
        self.player_a
    }

    /// Sum of even-numbered turn scores.
    pub fn player_b(&self) -> u64 {
        self.player_b
    }

    /// Combined score.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Score for one player.
    pub fn for_player(&self, player: Player) -> u64 {
        match player {
            Player::A => self.player_a,
            Player::B => self.player_b,
        }
    }
}

/// Sums turn scores per player.
///
/// Totals are `u64`, so summing `u32` turn scores cannot overflow.
#[instrument(skip(turns), fields(count = turns.len()))]
pub fn aggregate(turns: &[Turn]) -> ScoreSummary {
    let (player_a, player_b) = turns.iter().fold((0u64, 0u64), |(a, b), turn| {
        let score = u64::from(turn.score());
        match player_of(turn.id()) {
            Player::A => (a + score, b),
            Player::B => (a, b + score),
        }
    });
    let summary = ScoreSummary {
        player_a,
        player_b,
        total: player_a + player_b,
    };
    debug!(player_a, player_b, total = summary.total, "Scores aggregated");
    summary
}
