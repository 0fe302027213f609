//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the whole board engine: grid, piece matrices, piece
//! selection, scoring, and the game state machine. It performs no I/O and
//! owns no clock; a host drives gravity by calling
//! [`GameState::tick`](game_state::GameState::tick) on its own timer (or
//! [`GameState::advance`](game_state::GameState::advance) with elapsed time).
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision checks and line clearing
//! - [`game_state`]: lifecycle, active/next pieces, commands, progression
//! - [`pieces`]: template matrices and clockwise rotation (no wall kicks)
//! - [`rng`]: seedable uniform piece selection
//! - [`scoring`]: line-clear points, level and gravity interval formulas
//! - [`snapshot`]: read-only views for renderers
//! - [`events`]: score notifications and the in-memory score ledger
//!
//! # Game Rules
//!
//! | Rule | Value |
//! |------|-------|
//! | Spawn anchor | `(4, 0)`, top-left of the piece matrix |
//! | Line clear | `lines * 100 * level` (level before the clear) |
//! | Hard drop | 2 points per row fallen |
//! | Level | `lines / 10 + 1` |
//! | Gravity | `max(100, 1000 - (level - 1) * 100)` ms |
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_core::types::Command;
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! game.apply_command(Command::MoveRight);
//! game.apply_command(Command::Rotate);
//! game.apply_command(Command::HardDrop);
//!
//! assert!(game.score() > 0); // Hard drop awards points
//! ```

pub mod board;
pub mod events;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, ClearedRows, BOARD_COLS, BOARD_ROWS};
pub use events::{ScoreListener, ScoreTracker};
pub use game_state::{DropOutcome, GameState, Piece};
pub use pieces::{try_rotate, Shape};
pub use rng::{PieceSource, RandomPieces, ScriptedPieces};
pub use scoring::{drop_interval_ms, hard_drop_bonus, level_for_lines, line_clear_points};
pub use snapshot::{ActiveSnapshot, GameSnapshot, NextSnapshot};
