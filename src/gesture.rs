//! Swipe detection for mouse drags.
//!
//! Thresholds are in approximate pixel units. Terminal cells are converted
//! with a fixed cell size.

/// Minimum horizontal travel for a swipe.
pub const SWIPE_MIN_DISTANCE: i32 = 50;

/// Vertical travel at or beyond which a drag is not a swipe.
pub const SWIPE_MAX_DRIFT: i32 = 100;

pub const UNITS_PER_COLUMN: i32 = 8;
pub const UNITS_PER_ROW: i32 = 16;

/// A point in pixel units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Top-left corner of a terminal cell.
    pub fn from_cell(column: u16, row: u16) -> Self {
        Self {
            x: i32::from(column) * UNITS_PER_COLUMN,
            y: i32::from(row) * UNITS_PER_ROW,
        }
    }
}

/// Page transition requested by a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Previous,
    Next,
}

/// Classify a drag from `start` to `end`.
///
/// Dragging right turns back a page, dragging left turns forward.
pub fn classify_swipe(start: Point, end: Point) -> Option<Swipe> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    if dx.abs() <= SWIPE_MIN_DISTANCE || dy.abs() >= SWIPE_MAX_DRIFT {
        return None;
    }
    Some(if dx > 0 { Swipe::Previous } else { Swipe::Next })
}
