//! Plain-text views of boards, turns, and stored games.

use crate::store::PersistedGame;
use scrabble_board::{BOARD_SIZE, Grid, Player, ScoreSummary, Turn};
use std::fmt::Write;

/// Column label as shown on the board: `A` for column 0.
pub fn column_label(col: usize) -> char {
    u8::try_from(col)
        .ok()
        .and_then(|offset| b'A'.checked_add(offset))
        .map_or('?', char::from)
}

/// Board with column letters across the top and 1-based row numbers.
pub fn render_board(grid: &Grid) -> String {
    let mut out = String::from("   ");
    out.extend((0..BOARD_SIZE).map(column_label));
    for (row, squares) in grid.rows().iter().enumerate() {
        let line: String = squares
            .iter()
            .map(|square| square.letter().unwrap_or('.'))
            .collect();
        let _ = write!(out, "\n{:>2} {}", row + 1, line);
    }
    out
}

/// Per-player and total score lines.
pub fn render_scores(scores: &ScoreSummary) -> String {
    format!(
        "{}: {}  {}: {}  Total: {}",
        Player::A,
        scores.player_a(),
        Player::B,
        scores.player_b(),
        scores.total()
    )
}

/// Turn table: id, word, direction, row, column, overlap, score, blanks.
pub fn render_turns(turns: &[Turn]) -> String {
    let mut out = format!(
        "{:>3}  {:<10} {:<10} {:>3} {:>3}  {:<8} {:>5}  {}",
        "ID", "Bingo", "Direction", "Row", "Col", "Overlap", "Score", "Blanks"
    );
    for turn in turns {
        let overlap = turn
            .overlap()
            .map_or_else(|| "None".to_string(), |o| format!("{} ({})", o.tile, o.index));
        let blanks = turn.blanks().map_or_else(
            || "-".to_string(),
            |b| {
                let indices: Vec<String> = b.indices.iter().map(usize::to_string).collect();
                format!("{} ({})", b.tile, indices.join(", "))
            },
        );
        let _ = write!(
            out,
            "\n{:>3}  {:<10} {:<10} {:>3} {:>3}  {:<8} {:>5}  {}",
            turn.id(),
            turn.bingo(),
            turn.direction().to_string(),
            turn.row() + 1,
            column_label(turn.col()),
            overlap,
            turn.score(),
            blanks
        );
    }
    out
}

/// Header, scores, and optionally board and turns for a stored game.
pub fn render_game(game: &PersistedGame, details: bool) -> String {
    let mut out = format!(
        "Game ID: {}  ({})\n{}",
        game.id(),
        game.timestamp().format("%Y-%m-%d %H:%M:%S UTC"),
        render_scores(&game.scores())
    );
    if details {
        match game.board() {
            Ok(board) => {
                let _ = write!(out, "\n\n{}", render_board(&board));
            }
            Err(e) => {
                let _ = write!(out, "\n\nBoard unavailable: {}", e);
            }
        }
        let _ = write!(out, "\n\n{}", render_turns(game.turns()));
    }
    out
}
