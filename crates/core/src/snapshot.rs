use serde::{Deserialize, Serialize};

use crate::board::{BOARD_COLS, BOARD_ROWS};
use crate::game_state::Piece;
use crate::pieces::Shape;
use crate::types::{Cell, EngineStatus, PieceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl ActiveSnapshot {
    pub fn color(&self) -> &'static str {
        self.kind.color()
    }

    /// Absolute grid cells covered by the piece (may include rows above the board)
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .cells()
            .iter()
            .map(move |&(dx, dy)| (self.x + dx, self.y + dy))
    }
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            shape: value.shape,
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NextSnapshot {
    pub kind: PieceKind,
    pub shape: Shape,
}

impl NextSnapshot {
    pub fn color(&self) -> &'static str {
        self.kind.color()
    }
}

impl From<PieceKind> for NextSnapshot {
    fn from(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: Shape::template(kind),
        }
    }
}

/// Read-only view of everything a renderer needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: [[Cell; BOARD_COLS]; BOARD_ROWS],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: Option<NextSnapshot>,
    pub status: EngineStatus,
    pub running: bool,
    pub over: bool,
    pub generation: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub drop_interval_ms: u32,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.running && !self.over
    }

    /// Grid with the active piece drawn in (cells above the board are skipped)
    pub fn composited(&self) -> [[Cell; BOARD_COLS]; BOARD_ROWS] {
        let mut out = self.board;
        if let Some(active) = &self.active {
            for (x, y) in active.cells() {
                if (0..BOARD_COLS as i8).contains(&x) && (0..BOARD_ROWS as i8).contains(&y) {
                    out[y as usize][x as usize] = Some(active.kind);
                }
            }
        }
        out
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_COLS]; BOARD_ROWS],
            active: None,
            ghost_y: None,
            next: None,
            status: EngineStatus::Idle,
            running: false,
            over: false,
            generation: 0,
            score: 0,
            level: 1,
            lines: 0,
            drop_interval_ms: crate::types::BASE_DROP_MS,
        }
    }
}
