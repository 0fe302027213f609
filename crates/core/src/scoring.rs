//! Scoring module - line-clear points, leveling and gravity speed
//!
//! Rules:
//! - A lock clearing `n` lines awards `n * 100 * level`, where `level` is the
//!   level in effect *before* the clear is counted.
//! - Level is `floor(lines / 10) + 1`.
//! - Gravity interval is `max(100, 1000 - (level - 1) * 100)` milliseconds.
//! - A hard drop awards 2 points per row fallen.

use crate::types::{
    BASE_DROP_MS, DROP_STEP_MS, HARD_DROP_POINTS_PER_ROW, LINES_PER_LEVEL, LINE_CLEAR_POINTS,
    MIN_DROP_MS,
};

/// Points for clearing `lines` rows at `level` (the pre-clear level)
pub fn line_clear_points(lines: u32, level: u32) -> u32 {
    lines
        .saturating_mul(LINE_CLEAR_POINTS)
        .saturating_mul(level)
}

/// Level for a cumulative line count (1-based)
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity interval for a level, in milliseconds
pub fn drop_interval_ms(level: u32) -> u32 {
    let reduction = level.saturating_sub(1).saturating_mul(DROP_STEP_MS);
    BASE_DROP_MS.saturating_sub(reduction).max(MIN_DROP_MS)
}

/// Hard drop bonus for falling `rows` rows
pub fn hard_drop_bonus(rows: u32) -> u32 {
    rows.saturating_mul(HARD_DROP_POINTS_PER_ROW)
}
