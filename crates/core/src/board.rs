//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty or filled with the piece
//! kind that locked there (the kind carries the color).
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//!
//! Pieces may hang above the visible top row (`y < 0`): such cells are checked
//! against the side walls only, and are dropped when the piece locks.

use arrayvec::ArrayVec;

use crate::pieces::Shape;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Number of columns as a `usize`
pub const BOARD_COLS: usize = BOARD_WIDTH as usize;

/// Number of rows as a `usize`
pub const BOARD_ROWS: usize = BOARD_HEIGHT as usize;

/// Total number of cells on the board
const BOARD_SIZE: usize = BOARD_COLS * BOARD_ROWS;

/// Row indices removed by one clear, top to bottom
pub type ClearedRows = ArrayVec<usize, BOARD_ROWS>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Build a board from text rows aligned to the bottom of the grid.
    ///
    /// `.` is empty, a piece letter (`I O T S Z J L`, any case) fills the cell
    /// with that kind and `#` fills it with `I`. Returns `None` for rows of
    /// the wrong width, too many rows, or unknown characters.
    ///
    /// ```
    /// use blockfall_core::Board;
    ///
    /// let board = Board::from_rows(&["##########"]).unwrap();
    /// assert!(board.is_row_full(19));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        if rows.len() > BOARD_ROWS {
            return None;
        }
        let mut board = Self::new();
        let top = BOARD_ROWS - rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.chars().count() != BOARD_COLS {
                return None;
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' => None,
                    '#' => Some(PieceKind::I),
                    other => Some(PieceKind::from_str(&other.to_string())?),
                };
                board.cells[(top + i) * BOARD_COLS + x] = cell;
            }
        }
        Some(board)
    }

    /// Rebuild a board from a snapshot grid
    pub fn from_grid(grid: &[[Cell; BOARD_COLS]; BOARD_ROWS]) -> Self {
        let mut board = Self::new();
        for (y, row) in grid.iter().enumerate() {
            let start = y * BOARD_COLS;
            board.cells[start..start + BOARD_COLS].copy_from_slice(row);
        }
        board
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * BOARD_COLS + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether a single piece cell may sit at (x, y).
    ///
    /// `x` must lie in `[0, W)` and `y` below `H`; above the board (`y < 0`)
    /// only the side walls apply, otherwise the cell must be empty.
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return false;
        }
        y < 0 || matches!(self.get(x, y), Some(None))
    }

    /// Collision test for a whole shape anchored at (x, y)
    pub fn is_valid_shape(&self, shape: &Shape, x: i8, y: i8) -> bool {
        shape.cells().iter().all(|&(dx, dy)| {
            match (x.checked_add(dx), y.checked_add(dy)) {
                (Some(px), Some(py)) => self.is_valid(px, py),
                _ => false,
            }
        })
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_ROWS {
            return false;
        }
        let start = y * BOARD_COLS;
        self.cells[start..start + BOARD_COLS]
            .iter()
            .all(|cell| cell.is_some())
    }

    /// Clear all full rows and return the row indices that were cleared (top to bottom).
    ///
    /// Full rows are identified against the pre-clear grid, then removed in
    /// one pass: surviving rows keep their relative order and settle at the
    /// bottom, and the vacated rows at the top become empty.
    /// Uses a two-pointer algorithm with zero allocation.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared_rows = ClearedRows::new();
        let mut write_y = BOARD_ROWS;

        // Scan from bottom to top. Rows above `read_y` are never written
        // before they are read, so fullness is judged on the pre-clear grid.
        for read_y in (0..BOARD_ROWS).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * BOARD_COLS;
                    let dst_start = write_y * BOARD_COLS;
                    self.cells
                        .copy_within(src_start..src_start + BOARD_COLS, dst_start);
                }
            }
        }

        for cell in &mut self.cells[..write_y * BOARD_COLS] {
            *cell = None;
        }

        cleared_rows.reverse();
        cleared_rows
    }

    /// Write a shape into the grid at (x, y) with the given kind.
    ///
    /// Cells above the visible board are dropped. Returns false (and writes
    /// nothing) if any cell fails the collision test.
    pub fn lock_shape(&mut self, shape: &Shape, x: i8, y: i8, kind: PieceKind) -> bool {
        if !self.is_valid_shape(shape, x, y) {
            return false;
        }

        for &(dx, dy) in shape.cells() {
            let py = y + dy;
            if py >= 0 {
                self.set(x + dx, py, Some(kind));
            }
        }

        true
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy into a row-major 2D grid (for snapshots)
    pub fn write_grid(&self, out: &mut [[Cell; BOARD_COLS]; BOARD_ROWS]) {
        for (y, row) in out.iter_mut().enumerate() {
            let start = y * BOARD_COLS;
            row.copy_from_slice(&self.cells[start..start + BOARD_COLS]);
        }
    }

    /// Render as text rows (`.` empty, uppercase kind letter otherwise)
    pub fn rows_string(&self) -> String {
        let mut out = String::with_capacity(BOARD_SIZE + BOARD_ROWS);
        for (i, row) in self.cells.chunks(BOARD_COLS).enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for cell in row {
                match cell {
                    Some(kind) => out.push_str(&kind.as_str().to_uppercase()),
                    None => out.push('.'),
                }
            }
        }
        out
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [None; BOARD_SIZE];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
