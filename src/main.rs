//! Perfect Scrabble - unified CLI
//!
//! Records, browses, and exports perfect Scrabble games.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Command};
use perfect_scrabble::{
    AppConfig, AppState, BrowseState, CollectionQueryEngine, EXPORT_FAILED_MESSAGE, GameRecorder,
    HttpStoreReader, HttpWriteClient, InMemoryStore, LivePlayback, SaveStatus, ScoreTurnResponse,
    ScoringClient, SortMode, StaticCredential, StaticTokenVerifier, export_collection,
    render_board, render_game, render_scores, render_turns,
};
use scrabble_board::{Coordinate, LiveTurn, Turn, aggregate, replay, replay_through};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let mut config = AppConfig::load_or_default(&cli.config)?;
    if let Some(server_url) = cli.server_url {
        config = config.with_server_url(server_url);
    }

    match cli.command {
        Command::Serve { port, host } => run_server(&config, host, port).await,
        Command::Browse {
            sort,
            more,
            details,
        } => run_browse(&config, sort, more, details).await,
        Command::Export { out_dir } => run_export(&config, out_dir).await,
        Command::Play { script } => run_play(&config, &script).await,
        Command::Replay { turns, through } => run_replay(&turns, through),
        Command::Score {
            turn,
            blanks,
            from,
            id,
        } => match (from, id) {
            (Some(path), Some(id)) => run_score_recorded(&config, &path, id).await,
            _ => {
                let turn = turn.context("A turn description or --from is required")?;
                run_score(&config, &turn, blanks.as_deref()).await
            }
        },
    }
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,perfect_scrabble=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Run the write endpoint over an in-memory store
#[instrument(skip(config))]
async fn run_server(config: &AppConfig, host: String, port: u16) -> Result<()> {
    if config.tokens().is_empty() {
        warn!("No tokens configured; every write will be rejected");
    }
    let state = AppState::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(StaticTokenVerifier::new(config.tokens().clone())),
    );
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    info!("Server ready at http://{}:{}/", host, port);
    perfect_scrabble::serve(listener, state).await?;
    Ok(())
}

/// Print stored games in the requested order
#[instrument(skip(config))]
async fn run_browse(config: &AppConfig, sort: SortMode, more: usize, details: bool) -> Result<()> {
    let reader = HttpStoreReader::new(config.server_url());
    let mut engine = CollectionQueryEngine::new(config.collection(), *config.page_size());
    engine.set_sort_mode(sort);
    engine.load(&reader).await;
    for _ in 0..more {
        if !engine.can_load_more() {
            break;
        }
        engine.load_more(&reader).await;
    }

    if let BrowseState::Errored(message) = engine.state() {
        anyhow::bail!("{}", message);
    }
    if engine.games().is_empty() {
        println!("No games found.");
        return Ok(());
    }
    for game in engine.games() {
        println!("{}\n", render_game(game, details));
    }
    if engine.can_load_more() {
        println!("More games available (use --more).");
    }
    Ok(())
}

/// Export the whole collection to a dated JSON file
#[instrument(skip(config))]
async fn run_export(config: &AppConfig, out_dir: PathBuf) -> Result<()> {
    let reader = HttpStoreReader::new(config.server_url());
    let today = Utc::now().date_naive();
    match export_collection(&reader, config.collection(), &out_dir, today).await {
        Ok(path) => {
            println!("Exported to {}", path.display());
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Export failed");
            anyhow::bail!(EXPORT_FAILED_MESSAGE)
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Step through a scripted game, saving it after the last turn
#[instrument(skip(config), fields(script = %script.display()))]
async fn run_play(config: &AppConfig, script: &Path) -> Result<()> {
    let turns: Vec<LiveTurn> = read_json(script)?;
    let recorder = GameRecorder::new(
        config.collection().clone(),
        Arc::new(StaticCredential::new(config.id_token_from_env())),
        Arc::new(HttpWriteClient::new(config.write_url())),
    );
    let mut playback = LivePlayback::new(turns, recorder);

    while let Some(next) = playback.next_turn().map(|live| live.turn().clone()) {
        let Some(board) = playback.advance().await? else {
            break;
        };
        println!(
            "Turn {}: {} for {} ({} tiles left)\n{}\n{}\n",
            next.id(),
            next.bingo(),
            next.score(),
            playback.played().last().map_or(0, LiveTurn::tiles_left),
            render_board(&board),
            render_scores(&playback.scores())
        );
    }

    match playback.save_status() {
        SaveStatus::Saved(doc_id) => println!("Game complete! Game ID: {}", doc_id),
        SaveStatus::Failed(message) => println!("Error saving game: {}", message),
        SaveStatus::Idle | SaveStatus::Saving => {
            println!("Game not saved: {} turns played", playback.played().len())
        }
    }
    Ok(())
}

/// Print the board and scores for a turn history
#[instrument(fields(turns = %path.display()))]
fn run_replay(path: &Path, through: Option<u32>) -> Result<()> {
    let turns: Vec<Turn> = read_json(path)?;
    let board = match through {
        Some(last_id) => replay_through(&turns, last_id)?,
        None => replay(&turns)?,
    };
    let shown: Vec<Turn> = turns
        .iter()
        .filter(|turn| through.is_none_or(|last| turn.id() <= last))
        .cloned()
        .collect();
    println!(
        "{}\n\n{}\n\n{}",
        render_board(&board),
        render_turns(&shown),
        render_scores(&aggregate(&shown))
    );
    Ok(())
}

/// Score a single turn with the hosted API
#[instrument(skip(config))]
async fn run_score(config: &AppConfig, turn: &str, blanks: Option<&str>) -> Result<()> {
    let blanks: Option<Vec<Coordinate>> = blanks
        .map(serde_json::from_str)
        .transpose()
        .context("Blank positions must be a JSON array of {row, col}")?;
    let client = ScoringClient::new(config.scoring_url());
    let response = client.score_turn(turn, blanks.as_deref()).await?;
    print_score(response);
    Ok(())
}

/// Score one turn of a recorded game with the hosted API
#[instrument(skip(config), fields(turns = %path.display()))]
async fn run_score_recorded(config: &AppConfig, path: &Path, id: u32) -> Result<()> {
    let turns: Vec<Turn> = read_json(path)?;
    let turn = turns
        .iter()
        .find(|turn| turn.id() == id)
        .with_context(|| format!("No turn {} in {}", id, path.display()))?;
    let client = ScoringClient::new(config.scoring_url());
    let response = client.score_recorded_turn(turn).await?;
    print_score(response);
    Ok(())
}

fn print_score(response: ScoreTurnResponse) {
    match (response.success, response.score, response.error) {
        (true, Some(score), _) => println!("Score: {}", score),
        (_, _, Some(error)) => println!("Scoring failed: {}", error),
        _ => println!("Scoring failed"),
    }
}
