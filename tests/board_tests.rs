//! Board tests - grid storage, collision and line clearing

use blockfall::core::{Board, Shape};
use blockfall::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

fn o_shape() -> Shape {
    Shape::template(PieceKind::O)
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);

    // All cells should be empty
    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert!(board.is_valid(x, y), "Cell ({}, {}) should be valid", x, y);
            assert_eq!(board.get(x, y), Some(None));
        }
    }
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();

    // Negative coordinates
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);

    // Beyond bounds
    assert_eq!(board.get(BOARD_WIDTH as i8, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::new();

    assert!(board.set(5, 10, Some(PieceKind::T)));
    assert_eq!(board.get(5, 10), Some(Some(PieceKind::T)));

    assert!(board.set(0, 0, Some(PieceKind::I)));
    assert_eq!(board.get(0, 0), Some(Some(PieceKind::I)));

    // Clear a cell
    assert!(board.set(5, 10, None));
    assert_eq!(board.get(5, 10), Some(None));
}

#[test]
fn test_board_set_out_of_bounds() {
    let mut board = Board::new();

    assert!(!board.set(-1, 0, Some(PieceKind::T)));
    assert!(!board.set(0, -1, Some(PieceKind::T)));
    assert!(!board.set(BOARD_WIDTH as i8, 0, Some(PieceKind::T)));
    assert!(!board.set(0, BOARD_HEIGHT as i8, Some(PieceKind::T)));
}

#[test]
fn test_board_is_valid() {
    let mut board = Board::new();

    assert!(board.is_valid(5, 10));

    board.set(5, 10, Some(PieceKind::T));
    assert!(!board.is_valid(5, 10));

    // Side walls and floor
    assert!(!board.is_valid(-1, 0));
    assert!(!board.is_valid(BOARD_WIDTH as i8, 0));
    assert!(!board.is_valid(0, BOARD_HEIGHT as i8));

    // Above the top row only the walls apply
    assert!(board.is_valid(0, -1));
    assert!(board.is_valid(5, -4));
    assert!(!board.is_valid(-1, -1));
}

#[test]
fn test_board_is_occupied() {
    let mut board = Board::new();

    assert!(!board.is_occupied(5, 10));

    board.set(5, 10, Some(PieceKind::T));
    assert!(board.is_occupied(5, 10));

    assert!(!board.is_occupied(-1, 0));
}

#[test]
fn test_board_lock_shape_success() {
    let mut board = Board::new();

    assert!(board.lock_shape(&o_shape(), 3, 5, PieceKind::O));

    assert_eq!(board.get(3, 5), Some(Some(PieceKind::O)));
    assert_eq!(board.get(4, 5), Some(Some(PieceKind::O)));
    assert_eq!(board.get(3, 6), Some(Some(PieceKind::O)));
    assert_eq!(board.get(4, 6), Some(Some(PieceKind::O)));
    assert_eq!(board.filled_count(), 4);
}

#[test]
fn test_board_lock_shape_collision() {
    let mut board = Board::new();

    board.set(4, 5, Some(PieceKind::T));

    assert!(!board.lock_shape(&o_shape(), 3, 5, PieceKind::O));

    // Cells should not be modified
    assert_eq!(board.get(3, 5), Some(None));
    assert_eq!(board.get(4, 5), Some(Some(PieceKind::T)));
}

#[test]
fn test_board_lock_shape_out_of_bounds() {
    let mut board = Board::new();
    let i = Shape::template(PieceKind::I);

    // Too close to right edge
    assert!(!board.lock_shape(&i, 7, 5, PieceKind::I));
    assert!(board.lock_shape(&i, 6, 5, PieceKind::I));
}

#[test]
fn test_board_is_row_full() {
    let mut board = Board::new();

    assert!(!board.is_row_full(5));

    for x in 0..BOARD_WIDTH {
        board.set(x as i8, 5, Some(PieceKind::T));
    }
    assert!(board.is_row_full(5));

    // Leave one cell empty in row 6
    for x in 0..BOARD_WIDTH - 1 {
        board.set(x as i8, 6, Some(PieceKind::I));
    }
    assert!(!board.is_row_full(6));
    assert!(!board.is_row_full(BOARD_HEIGHT as usize));
}

#[test]
fn test_board_clear_full_rows() {
    let mut board = Board::new();

    // Fill rows 18 and 19 (bottom two)
    for x in 0..BOARD_WIDTH {
        board.set(x as i8, 18, Some(PieceKind::I));
        board.set(x as i8, 19, Some(PieceKind::O));
    }

    board.set(0, 17, Some(PieceKind::T));

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[18, 19]);

    // The T dropped by 2 rows
    assert_eq!(board.get(0, 19), Some(Some(PieceKind::T)));
    assert_eq!(board.filled_count(), 1);
}

#[test]
fn test_board_clear_multiple_rows_order() {
    let mut board = Board::new();

    // Fill rows 5, 10, and 15
    for x in 0..BOARD_WIDTH {
        board.set(x as i8, 5, Some(PieceKind::T));
        board.set(x as i8, 10, Some(PieceKind::I));
        board.set(x as i8, 15, Some(PieceKind::O));
    }

    // Marker cells above each
    board.set(0, 4, Some(PieceKind::J));
    board.set(0, 9, Some(PieceKind::L));
    board.set(0, 14, Some(PieceKind::S));

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[5, 10, 15]);

    // Each row drops by the number of cleared rows below it
    assert_eq!(board.get(0, 7), Some(Some(PieceKind::J)));
    assert_eq!(board.get(0, 11), Some(Some(PieceKind::L)));
    assert_eq!(board.get(0, 15), Some(Some(PieceKind::S)));
    // Vacated rows at the top are empty
    for y in 0..3 {
        for x in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(x, y), Some(None));
        }
    }
}

#[test]
fn test_board_clear_adjacent_full_rows_single_pass() {
    // Two adjacent full rows must both go in one clear.
    let mut board = Board::from_rows(&["J.........", "LLLLLLLLLL", "SSSSSSSSSS", "Z........."]).unwrap();

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.len(), 2);
    assert_eq!(board.get(0, 18), Some(Some(PieceKind::J)));
    assert_eq!(board.get(0, 19), Some(Some(PieceKind::Z)));
    assert_eq!(board.filled_count(), 2);
}

#[test]
fn test_board_clear() {
    let mut board = Board::new();

    for x in 0..BOARD_WIDTH {
        board.set(x as i8, 5, Some(PieceKind::T));
    }

    board.clear();
    assert_eq!(board.filled_count(), 0);
}

#[test]
fn test_board_spawn_area_blocked() {
    let mut board = Board::new();
    let t = Shape::template(PieceKind::T);

    assert!(board.is_valid_shape(&t, 4, 0));

    board.set(5, 0, Some(PieceKind::I));
    assert!(!board.is_valid_shape(&t, 4, 0));
}

#[test]
fn test_board_cells_reference() {
    let board = Board::new();
    let cells = board.cells();

    assert_eq!(cells.len(), BOARD_WIDTH as usize * BOARD_HEIGHT as usize);
    assert!(cells.iter().all(|c| c.is_none()));
}
