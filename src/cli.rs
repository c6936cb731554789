//! Command-line interface for perfect_scrabble.

use clap::{Parser, Subcommand};
use perfect_scrabble::{DEFAULT_CONFIG_FILE, SortMode};
use std::path::PathBuf;

/// Perfect Scrabble - record, browse, and export perfect games
#[derive(Parser, Debug)]
#[command(name = "perfect_scrabble")]
#[command(about = "Record, browse, and export perfect Scrabble games", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the server URL from the configuration
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the write endpoint and read API over an in-memory store
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Browse stored games
    Browse {
        /// Sort order
        #[arg(long, value_enum, default_value_t = SortMode::Timestamp)]
        sort: SortMode,

        /// Extra pages to load after the first (date order only)
        #[arg(long, default_value = "0")]
        more: usize,

        /// Show each game's board and turns
        #[arg(long)]
        details: bool,
    },

    /// Export every stored game as JSON
    Export {
        /// Directory to write the export file into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Step through a scripted game and save it when complete
    Play {
        /// JSON file holding the scripted turns
        script: PathBuf,
    },

    /// Rebuild and print the board for a turn history
    Replay {
        /// JSON file holding an array of turns
        turns: PathBuf,

        /// Stop after the turn with this id
        #[arg(long)]
        through: Option<u32>,
    },

    /// Score a turn with the hosted scoring API
    Score {
        /// Turn description passed to the API
        #[arg(required_unless_present = "from")]
        turn: Option<String>,

        /// Blank positions as JSON, e.g. '[{"row":7,"col":3}]'
        #[arg(long, conflicts_with = "from")]
        blanks: Option<String>,

        /// Score a recorded turn from this JSON turn file instead
        #[arg(long, requires = "id", conflicts_with = "turn")]
        from: Option<PathBuf>,

        /// Id of the recorded turn to score
        #[arg(long, requires = "from")]
        id: Option<u32>,
    },
}
