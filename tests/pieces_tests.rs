//! Pieces tests - template matrices and fixed-anchor rotation

use blockfall::core::pieces::{try_rotate, SPAWN_POSITION};
use blockfall::core::{Board, Shape};
use blockfall::types::PieceKind;

// ============== Shape Tests ==============

#[test]
fn test_template_rows() {
    let rendered: Vec<String> = PieceKind::ALL
        .iter()
        .map(|&k| Shape::template(k).to_string())
        .collect();
    assert_eq!(
        rendered,
        vec![
            "####",
            "##\n##",
            ".#.\n###",
            ".##\n##.",
            "##.\n.##",
            "#..\n###",
            "..#\n###",
        ]
    );
}

#[test]
fn test_every_template_has_four_cells_in_bounds() {
    for kind in PieceKind::ALL {
        let s = Shape::template(kind);
        assert_eq!(s.cells().len(), 4);
        for &(x, y) in s.cells() {
            assert!(x >= 0 && x < s.width() as i8, "{:?}", kind);
            assert!(y >= 0 && y < s.height() as i8, "{:?}", kind);
        }
    }
}

#[test]
fn test_o_rotation_is_identity() {
    let o = Shape::template(PieceKind::O);
    assert_eq!(o.rotated_cw(), o);
}

#[test]
fn test_s_and_z_alternate() {
    let s = Shape::template(PieceKind::S);
    let r = s.rotated_cw();
    assert_eq!(r.to_string(), "#.\n##\n.#");
    assert_eq!(r.rotated_cw(), s);
}

#[test]
fn test_j_rotation_cycle() {
    let j = Shape::template(PieceKind::J);
    let r1 = j.rotated_cw();
    let r2 = r1.rotated_cw();
    let r3 = r2.rotated_cw();
    assert_eq!(r1.to_string(), "##\n#.\n#.");
    assert_eq!(r2.to_string(), "###\n..#");
    assert_eq!(r3.to_string(), ".#\n.#\n##");
    assert_eq!(r3.rotated_cw(), j);
}

// ============== Rotation Against The Board ==============

#[test]
fn test_spawn_position() {
    assert_eq!(SPAWN_POSITION, (4, 0));
}

#[test]
fn test_rotation_blocked_by_wall_is_rejected() {
    let board = Board::new();
    let vertical = Shape::template(PieceKind::I).rotated_cw();

    // Vertical I at column 8: horizontal would span columns 8..11.
    assert!(try_rotate(&vertical, 8, 5, |x, y| board.is_valid(x, y)).is_none());
    // No kick: one column left is not tried.
    assert!(try_rotate(&vertical, 6, 5, |x, y| board.is_valid(x, y)).is_some());
}

#[test]
fn test_rotation_blocked_by_stack_is_rejected() {
    let mut board = Board::new();
    let t = Shape::template(PieceKind::T);
    // Rotated T at (0, 10) occupies (0,10), (0,11), (1,11), (0,12).
    board.set(0, 12, Some(PieceKind::I));

    assert!(try_rotate(&t, 0, 10, |x, y| board.is_valid(x, y)).is_none());
    assert!(try_rotate(&t, 2, 10, |x, y| board.is_valid(x, y)).is_some());
}

#[test]
fn test_rotation_above_board_allowed() {
    let board = Board::new();
    let i = Shape::template(PieceKind::I);
    // Vertical I at y = -2 pokes above the top row; only walls are checked there.
    assert!(try_rotate(&i, 0, -2, |x, y| board.is_valid(x, y)).is_some());
}
