//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! Everything here is plain data (plus `serde` derives), usable from the core
//! engine, the timed game loop, and any presentation layer that consumes
//! snapshots.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn anchor**: (4, 0), i.e. `floor(W/2) - 1`
//!
//! # Progression Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_DROP_MS` | 1000 | Gravity interval at level 1 |
//! | `DROP_STEP_MS` | 100 | Interval reduction per level |
//! | `MIN_DROP_MS` | 100 | Interval floor |
//! | `LINES_PER_LEVEL` | 10 | Cleared lines per level |
//! | `LINE_CLEAR_POINTS` | 100 | Points per cleared line, times level |
//! | `HARD_DROP_POINTS_PER_ROW` | 2 | Hard drop bonus per row fallen |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Command, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.color(), "#a000f0");
//!
//! let cmd = Command::from_str("hardDrop").unwrap();
//! assert_eq!(cmd, Command::HardDrop);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Spawn anchor column: `floor(BOARD_WIDTH / 2) - 1`
pub const SPAWN_X: i8 = (BOARD_WIDTH / 2) as i8 - 1;

/// Spawn anchor row (top of the visible board)
pub const SPAWN_Y: i8 = 0;

/// Gravity interval at level 1 (1000ms = 1 second per row)
pub const BASE_DROP_MS: u32 = 1000;

/// Gravity interval reduction per level above 1
pub const DROP_STEP_MS: u32 = 100;

/// Gravity interval floor
pub const MIN_DROP_MS: u32 = 100;

/// Cleared lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Points per cleared line, multiplied by the level in effect
pub const LINE_CLEAR_POINTS: u32 = 100;

/// Hard drop bonus per row fallen
pub const HARD_DROP_POINTS_PER_ROW: u32 = 2;

/// The seven piece kinds
///
/// Each kind has a fixed template shape and a display color:
/// - **I**: `#00f5ff`, 1x4 bar
/// - **O**: `#ffff00`, 2x2 square
/// - **T**: `#a000f0`
/// - **S**: `#00f000`
/// - **Z**: `#f00000`
/// - **J**: `#0000f0`
/// - **L**: `#f0a000`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds, in template order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Map an index in `0..7` to a kind (wraps for larger values)
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Display color as a `#rrggbb` hex string
    pub fn color(&self) -> &'static str {
        match self {
            PieceKind::I => "#00f5ff",
            PieceKind::O => "#ffff00",
            PieceKind::T => "#a000f0",
            PieceKind::S => "#00f000",
            PieceKind::Z => "#f00000",
            PieceKind::J => "#0000f0",
            PieceKind::L => "#f0a000",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Filled cell; the kind carries the color
pub type Cell = Option<PieceKind>;

/// Engine lifecycle state
///
/// ```text
/// Idle --start--> Running --pause--> Paused --resume/start--> Running
///                    |
///                    +--spawn blocked--> GameOver
/// any --reset--> Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EngineStatus {
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

impl EngineStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, EngineStatus::Running)
    }

    pub fn is_over(&self) -> bool {
        matches!(self, EngineStatus::GameOver)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineStatus::Idle => "idle",
            EngineStatus::Running => "running",
            EngineStatus::Paused => "paused",
            EngineStatus::GameOver => "gameOver",
        }
    }
}

/// Commands accepted by the engine
///
/// These are the abstract commands an input translator produces. Every command
/// is a no-op when its precondition (engine state) is not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    /// Idle -> Running, or Paused -> Running
    Start,
    /// Running -> Paused
    Pause,
    /// Paused -> Running
    Resume,
    /// Any -> Idle, clearing the session
    Reset,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// One-row descent, locking when blocked
    SoftDrop,
    /// Rotate piece 90° clockwise (no wall kicks)
    Rotate,
    /// Drop to the resting row, lock, award the distance bonus
    HardDrop,
    /// One gravity step (timer-driven)
    Tick,
}

impl Command {
    /// Parse command from a camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("SOFTDROP"), Some(Command::SoftDrop));
    /// assert_eq!(Command::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(Command::Start),
            "pause" => Some(Command::Pause),
            "resume" => Some(Command::Resume),
            "reset" => Some(Command::Reset),
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "softdrop" => Some(Command::SoftDrop),
            "rotate" => Some(Command::Rotate),
            "harddrop" => Some(Command::HardDrop),
            "tick" => Some(Command::Tick),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Reset => "reset",
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::Rotate => "rotate",
            Command::HardDrop => "hardDrop",
            Command::Tick => "tick",
        }
    }
}

/// Summary of a single lock.
///
/// Emitted by the engine each time an active piece is written into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LockEvent {
    pub lines_cleared: u32,
    /// Line-clear points awarded by this lock (`lines * 100 * level_before`).
    pub line_clear_score: u32,
    /// Hard drop bonus awarded before the lock (0 for gravity locks).
    pub drop_bonus: u32,
    pub level_before: u32,
    pub level_after: u32,
    /// The spawn that followed this lock was blocked.
    pub game_over: bool,
}

/// Notification produced for the score ledger / presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    ScoreChanged { score: u32 },
    LinesCleared { count: u32, total: u32 },
    LevelUp { level: u32 },
    GameEnded { final_score: u32 },
}
