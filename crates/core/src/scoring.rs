//! Scoring module - line clear points, drop bonus and leveling
//!
//! Simultaneous clears are rewarded super-linearly: 100 / 300 / 500 / 800 for
//! 1 / 2 / 3 / 4+ lines, independent of level. Hard drops add one point per
//! row fallen.

use crate::types::{HARD_DROP_POINTS_PER_ROW, LINES_PER_LEVEL, LINE_SCORES, STARTING_LEVEL};

/// Points for clearing `lines` rows with a single lock
pub fn line_clear_score(lines: usize) -> u32 {
    LINE_SCORES[lines.min(LINE_SCORES.len() - 1)]
}

/// Points for a hard drop that fell `rows` rows
pub fn hard_drop_score(rows: u32) -> u32 {
    rows.saturating_mul(HARD_DROP_POINTS_PER_ROW)
}

/// Level management
/// Level increases every 10 lines cleared, starting at 1
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + STARTING_LEVEL
}
