//! Headless demo runner (default binary).
//!
//! Plays one game through the async game loop, choosing placements with the
//! autoplay heuristic, and prints a JSON summary on stdout.
//!
//! Reads the [`LoopConfig`] variables plus `BLOCKFALL_MAX_PIECES` (default
//! 500). Logging goes through `env_logger` (`RUST_LOG`, default `info`).

use anyhow::{Context, Result};
use log::info;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use blockfall::core::ScoreTracker;
use blockfall::engine::{pick_placement, GameLoop, LoopConfig};
use blockfall::types::Command;

const DEFAULT_MAX_PIECES: u32 = 500;

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    pieces: u32,
    status: &'static str,
    score: u32,
    level: u32,
    lines: u32,
    ledger: ScoreTracker,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = LoopConfig::from_env();
    let seed = config.seed.unwrap_or_else(rand::random);
    config.seed = Some(seed);

    let max_pieces = std::env::var("BLOCKFALL_MAX_PIECES")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_MAX_PIECES);

    info!("autoplay: seed {}, up to {} pieces", seed, max_pieces);

    let game = GameLoop::spawn(config, ScoreTracker::new());
    let handle = game.handle();
    let mut rng = Pcg32::seed_from_u64(seed);

    handle.submit(Command::Start).await?;

    let mut pieces = 0u32;
    let last = loop {
        let snap = handle.snapshot().await.context("reading game state")?;
        if snap.over || pieces >= max_pieces {
            break snap;
        }
        let Some(placement) = pick_placement(&snap, &mut rng) else {
            break snap;
        };
        for command in placement.commands() {
            handle.submit(command).await?;
        }
        pieces += 1;
    };

    let ledger = game.join().await.context("stopping game loop")?;

    let summary = Summary {
        seed,
        pieces,
        status: last.status.as_str(),
        score: last.score,
        level: last.level,
        lines: last.lines,
        ledger,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
