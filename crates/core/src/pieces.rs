//! Pieces module - template shapes and matrix rotation
//!
//! Every piece is a small boolean matrix stored as its four occupied cells
//! (offsets from the top-left anchor) plus the matrix width and height.
//! Templates are immutable; rotating produces a new [`Shape`].
//!
//! Rotation is a plain clockwise matrix rotation (transpose, then reverse each
//! row) about the unchanged anchor. There is no wall-kick table: if the
//! rotated matrix does not fit at the current anchor, the rotation fails.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{PieceKind, SPAWN_X, SPAWN_Y};

/// Offset of a single mino relative to the piece anchor
pub type MinoOffset = (i8, i8);

/// Largest matrix dimension of any template (the I piece)
pub const MAX_SHAPE_SIZE: usize = 4;

/// Occupied-cell matrix of a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    width: u8,
    height: u8,
    /// Occupied cells, sorted row-major so equal matrices compare equal
    cells: [MinoOffset; 4],
}

impl Shape {
    fn new(width: u8, height: u8, mut cells: [MinoOffset; 4]) -> Self {
        cells.sort_unstable_by_key(|&(x, y)| (y, x));
        Self {
            width,
            height,
            cells,
        }
    }

    /// Build a shape from textual rows, `1`/`#` marking occupied cells.
    ///
    /// Returns `None` unless the rows are rectangular and hold exactly four
    /// occupied cells.
    ///
    /// ```
    /// use blockfall_core::Shape;
    /// use blockfall_core::types::PieceKind;
    ///
    /// let t = Shape::from_rows(&["010", "111"]).unwrap();
    /// assert_eq!(t, Shape::template(PieceKind::T));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.len();
        if height == 0
            || width == 0
            || height > MAX_SHAPE_SIZE
            || width > MAX_SHAPE_SIZE
            || rows.iter().any(|r| r.len() != width)
        {
            return None;
        }

        let mut cells = [(0i8, 0i8); 4];
        let mut count = 0usize;
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if matches!(ch, '1' | '#') {
                    if count == cells.len() {
                        return None;
                    }
                    cells[count] = (x as i8, y as i8);
                    count += 1;
                }
            }
        }
        (count == cells.len()).then(|| Self::new(width as u8, height as u8, cells))
    }

    /// The immutable spawn template for a piece kind
    pub fn template(kind: PieceKind) -> Self {
        match kind {
            // 1111
            PieceKind::I => Self::new(4, 1, [(0, 0), (1, 0), (2, 0), (3, 0)]),
            // 11 / 11
            PieceKind::O => Self::new(2, 2, [(0, 0), (1, 0), (0, 1), (1, 1)]),
            // 010 / 111
            PieceKind::T => Self::new(3, 2, [(1, 0), (0, 1), (1, 1), (2, 1)]),
            // 011 / 110
            PieceKind::S => Self::new(3, 2, [(1, 0), (2, 0), (0, 1), (1, 1)]),
            // 110 / 011
            PieceKind::Z => Self::new(3, 2, [(0, 0), (1, 0), (1, 1), (2, 1)]),
            // 100 / 111
            PieceKind::J => Self::new(3, 2, [(0, 0), (0, 1), (1, 1), (2, 1)]),
            // 001 / 111
            PieceKind::L => Self::new(3, 2, [(2, 0), (0, 1), (1, 1), (2, 1)]),
        }
    }

    /// Clockwise quarter turn: transpose, then reverse each row.
    ///
    /// An occupied cell at column `x`, row `y` of an `h`-row matrix moves to
    /// column `h - 1 - y`, row `x`.
    pub fn rotated_cw(&self) -> Self {
        let h = self.height as i8;
        let mut cells = self.cells;
        for cell in &mut cells {
            let (x, y) = *cell;
            *cell = (h - 1 - y, x);
        }
        Self::new(self.height, self.width, cells)
    }

    /// Occupied cells as anchor offsets
    pub fn cells(&self) -> &[MinoOffset; 4] {
        &self.cells
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether the matrix cell at column `x`, row `y` is occupied
    pub fn is_filled(&self, x: i8, y: i8) -> bool {
        self.cells.contains(&(x, y))
    }

    /// Fixed 4x4 preview grid (row-major), for next-piece display
    pub fn mask(&self) -> [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE] {
        let mut out = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for &(x, y) in &self.cells {
            out[y as usize][x as usize] = true;
        }
        out
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height as i8 {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width as i8 {
                f.write_str(if self.is_filled(x, y) { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

/// Try to rotate a shape clockwise at a fixed anchor.
///
/// Returns the rotated shape if every occupied cell passes `is_valid`,
/// `None` otherwise. No alternate offsets are attempted.
pub fn try_rotate(
    shape: &Shape,
    x: i8,
    y: i8,
    is_valid: impl Fn(i8, i8) -> bool,
) -> Option<Shape> {
    let rotated = shape.rotated_cw();
    rotated
        .cells()
        .iter()
        .all(|&(dx, dy)| match (x.checked_add(dx), y.checked_add(dy)) {
            (Some(px), Some(py)) => is_valid(px, py),
            _ => false,
        })
        .then_some(rotated)
}

/// Spawn anchor for new pieces (x, y)
pub const SPAWN_POSITION: (i8, i8) = (SPAWN_X, SPAWN_Y);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_have_expected_bounds() {
        let dims: Vec<(u8, u8)> = PieceKind::ALL
            .iter()
            .map(|&k| {
                let s = Shape::template(k);
                (s.width(), s.height())
            })
            .collect();
        assert_eq!(
            dims,
            vec![(4, 1), (2, 2), (3, 2), (3, 2), (3, 2), (3, 2), (3, 2)]
        );
    }

    #[test]
    fn test_rotate_t_clockwise() {
        let t = Shape::template(PieceKind::T);
        let r = t.rotated_cw();
        assert_eq!(r, Shape::from_rows(&["10", "11", "10"]).unwrap());
        assert_eq!(r.to_string(), "#.\n##\n#.");
    }

    #[test]
    fn test_rotate_i_swaps_dimensions() {
        let i = Shape::template(PieceKind::I).rotated_cw();
        assert_eq!((i.width(), i.height()), (1, 4));
        assert_eq!(i.cells(), &[(0, 0), (0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn test_four_rotations_return_to_template() {
        for kind in PieceKind::ALL {
            let t = Shape::template(kind);
            let back = t.rotated_cw().rotated_cw().rotated_cw().rotated_cw();
            assert_eq!(back, t, "{:?}", kind);
        }
    }

    #[test]
    fn test_rotation_does_not_touch_template() {
        let before = Shape::template(PieceKind::L);
        let _ = before.rotated_cw();
        assert_eq!(Shape::template(PieceKind::L), before);
    }

    #[test]
    fn test_from_rows_rejects_malformed() {
        assert!(Shape::from_rows(&[]).is_none());
        assert!(Shape::from_rows(&["11", "1"]).is_none());
        assert!(Shape::from_rows(&["111"]).is_none());
        assert!(Shape::from_rows(&["11111"]).is_none());
    }

    #[test]
    fn test_mask_matches_cells() {
        let mask = Shape::template(PieceKind::S).mask();
        assert_eq!(mask[0], [false, true, true, false]);
        assert_eq!(mask[1], [true, true, false, false]);
        assert_eq!(mask[2], [false; 4]);
    }

    #[test]
    fn test_try_rotate_rejects_without_kick() {
        let i = Shape::template(PieceKind::I).rotated_cw();
        // Vertical bar at the right wall cannot turn horizontal.
        assert!(try_rotate(&i, 9, 5, |x, _| (0..10).contains(&x)).is_none());
        assert!(try_rotate(&i, 6, 5, |x, _| (0..10).contains(&x)).is_some());
    }
}
