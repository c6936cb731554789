//! Pure game logic for perfect Scrabble games.
//!
//! Everything in this crate is synchronous and side-effect free:
//!
//! - **Grid**: the fixed-size board and its squares
//! - **Turn**: one word placement, as persisted and as played live
//! - **Placement**: writing a single turn onto a grid, producing a new grid
//! - **Replay**: folding a turn history into the board it produces
//! - **Score**: per-player totals by turn parity
//!
//! # Example
//!
//! ```
//! use scrabble_board::{Direction, Turn, aggregate, replay};
//!
//! let turns = vec![Turn::new(1, 7, 7, Direction::Horizontal, "CAT", 10)];
//! let board = replay(&turns).expect("valid history");
//! assert_eq!(board.letter(7, 8), Some('A'));
//! assert_eq!(aggregate(&turns).total(), 10);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod game;
mod grid;
mod placement;
mod replay;
mod score;
mod turn;

pub use game::{GAME_LENGTH, IncompleteGame, check_complete};
pub use grid::{BOARD_SIZE, Coordinate, Grid, Square};
pub use placement::{Placement, PlacementError, place_word};
pub use replay::{ReplayError, ordered, replay, replay_onto, replay_through, snapshots};
pub use score::{Player, ScoreSummary, aggregate, player_of};
pub use turn::{Blanks, Direction, LiveTurn, Overlap, Turn};
