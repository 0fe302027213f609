//! Heuristic placement picker for headless play.
//!
//! Tries every reachable (rotation, column) for the active piece, drops it on
//! a scratch copy of the board and scores the resulting grid with a fixed
//! linear evaluation:
//!
//! | Feature | Weight |
//! |---------|--------|
//! | aggregate column height | -0.510066 |
//! | complete lines | +0.760666 |
//! | holes | -0.35663 |
//! | bumpiness | -0.184483 |
//!
//! Equal-scoring placements are broken at random.

use rand::Rng;

use blockfall_core::{try_rotate, Board, GameSnapshot, Shape, BOARD_COLS, BOARD_ROWS};
use blockfall_types::{Command, PieceKind};

/// Rotations to apply at the spawn anchor, then a horizontal shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub rotations: u8,
    pub shift: i8,
}

impl Placement {
    /// Command sequence that realizes this placement, ending in a hard drop
    pub fn commands(&self) -> Vec<Command> {
        let moves = self.shift.unsigned_abs() as usize;
        let mut out = Vec::with_capacity(self.rotations as usize + moves + 1);
        out.extend(std::iter::repeat(Command::Rotate).take(self.rotations as usize));
        let step = if self.shift < 0 {
            Command::MoveLeft
        } else {
            Command::MoveRight
        };
        out.extend(std::iter::repeat(step).take(moves));
        out.push(Command::HardDrop);
        out
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct GridFeatures {
    aggregate_height: u32,
    holes: u32,
    bumpiness: u32,
    complete_lines: u32,
}

fn grid_features(board: &Board) -> GridFeatures {
    let mut heights = [0u32; BOARD_COLS];
    let mut holes = 0u32;

    for (x, height) in heights.iter_mut().enumerate() {
        let mut seen_block = false;
        for y in 0..BOARD_ROWS {
            if board.is_occupied(x as i8, y as i8) {
                if !seen_block {
                    *height = (BOARD_ROWS - y) as u32;
                    seen_block = true;
                }
            } else if seen_block {
                holes += 1;
            }
        }
    }

    let bumpiness = heights
        .windows(2)
        .map(|w| w[0].abs_diff(w[1]))
        .sum();
    let complete_lines = (0..BOARD_ROWS).filter(|&y| board.is_row_full(y)).count() as u32;

    GridFeatures {
        aggregate_height: heights.iter().sum(),
        holes,
        bumpiness,
        complete_lines,
    }
}

fn evaluate(features: GridFeatures) -> f64 {
    -0.510066 * f64::from(features.aggregate_height)
        + 0.760666 * f64::from(features.complete_lines)
        - 0.35663 * f64::from(features.holes)
        - 0.184483 * f64::from(features.bumpiness)
}

/// Score of hard-dropping `shape` at column `x`, starting from row `y`
fn score_drop(board: &Board, shape: &Shape, kind: PieceKind, x: i8, y: i8) -> f64 {
    let mut rest = y;
    while board.is_valid_shape(shape, x, rest + 1) {
        rest += 1;
    }
    let mut scratch = board.clone();
    scratch.lock_shape(shape, x, rest, kind);
    evaluate(grid_features(&scratch))
}

/// Pick a placement for the active piece, or `None` when there is none.
pub fn pick_placement<R: Rng>(snapshot: &GameSnapshot, rng: &mut R) -> Option<Placement> {
    let active = snapshot.active?;
    let board = Board::from_grid(&snapshot.board);

    let mut best_score = f64::NEG_INFINITY;
    let mut best: Vec<Placement> = Vec::new();
    let mut consider = |placement: Placement, score: f64| {
        if score > best_score + 1e-9 {
            best_score = score;
            best.clear();
            best.push(placement);
        } else if (score - best_score).abs() <= 1e-9 {
            best.push(placement);
        }
    };

    let mut shape = active.shape;
    for rotations in 0..4u8 {
        if rotations > 0 {
            match try_rotate(&shape, active.x, active.y, |x, y| board.is_valid(x, y)) {
                Some(rotated) => shape = rotated,
                None => break,
            }
        }

        consider(
            Placement { rotations, shift: 0 },
            score_drop(&board, &shape, active.kind, active.x, active.y),
        );
        for dir in [-1i8, 1] {
            let mut shift = 0i8;
            while board.is_valid_shape(&shape, active.x + shift + dir, active.y) {
                shift += dir;
                consider(
                    Placement { rotations, shift },
                    score_drop(&board, &shape, active.kind, active.x + shift, active.y),
                );
            }
        }
    }

    if best.is_empty() {
        return None;
    }
    let pick = rng.random_range(0..best.len());
    Some(best[pick])
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfall_core::{GameState, ScriptedPieces};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn snapshot_with(kind: PieceKind, rows: &[&str]) -> GameSnapshot {
        let mut state = GameState::with_source(ScriptedPieces::repeat(kind));
        state.load_board(Board::from_rows(rows).unwrap());
        state.start();
        state.snapshot()
    }

    #[test]
    fn test_commands_sequence() {
        let p = Placement {
            rotations: 1,
            shift: -2,
        };
        assert_eq!(
            p.commands(),
            vec![
                Command::Rotate,
                Command::MoveLeft,
                Command::MoveLeft,
                Command::HardDrop
            ]
        );
    }

    #[test]
    fn test_features_count_holes_and_heights() {
        let board = Board::from_rows(&["#.........", "..........", "##........"]).unwrap();
        let f = grid_features(&board);
        assert_eq!(f.aggregate_height, 4);
        assert_eq!(f.holes, 1);
        assert_eq!(f.bumpiness, 2 + 1);
        assert_eq!(f.complete_lines, 0);
    }

    #[test]
    fn test_flat_i_on_empty_board() {
        let snap = snapshot_with(PieceKind::I, &[]);
        let mut rng = Pcg32::seed_from_u64(3);
        let p = pick_placement(&snap, &mut rng).unwrap();
        assert_eq!(p.rotations % 2, 0);
    }

    #[test]
    fn test_vertical_i_fills_well() {
        let snap = snapshot_with(
            PieceKind::I,
            &["#########.", "#########.", "#########.", "#########."],
        );
        let mut rng = Pcg32::seed_from_u64(3);
        let p = pick_placement(&snap, &mut rng).unwrap();
        assert_eq!(p.rotations % 2, 1);
        assert_eq!(snap.active.unwrap().x + p.shift, 9);
    }

    #[test]
    fn test_no_active_piece() {
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(pick_placement(&GameSnapshot::default(), &mut rng).is_none());
    }
}
