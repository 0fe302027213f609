//! Runtime driver for the board engine.
//!
//! The core crate owns no clock. This crate puts a [`GameState`] inside a
//! tokio task that serializes player commands and gravity ticks, and hands
//! out a cloneable [`GameHandle`] for talking to it.
//!
//! Environment variables read by [`LoopConfig::from_env`]:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BLOCKFALL_SEED` | random | Piece stream seed |
//! | `BLOCKFALL_MAX_PENDING` | 32 | Command queue capacity |
//! | `BLOCKFALL_GRAVITY` | on | `0`/`false` disables the gravity timer |
//!
//! [`GameState`]: blockfall_core::GameState

pub mod autoplay;
pub mod config;
pub mod runtime;

pub use autoplay::{pick_placement, Placement};
pub use config::LoopConfig;
pub use runtime::{GameHandle, GameLoop, LoopError};
