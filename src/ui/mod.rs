//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Theme palettes
//!
//! The screen is a title row, the reading pane, and a status row. Panels
//! are drawn over the reading pane.

pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::{format_age, panel_rect, toc_list_top, toc_panel_rect};
pub use render::{document_area, render};

pub const DOCUMENT_LEFT_PADDING: u16 = 2;
pub const DOCUMENT_RIGHT_PADDING: u16 = 1;

/// Rows outside the reading pane: title and status.
pub const CHROME_ROWS: u16 = 2;

pub const TOC_WIDTH_PERCENT: u16 = 40;

/// Reading pane height for a terminal `height` rows tall.
pub const fn reading_pane_height(height: u16) -> u16 {
    height.saturating_sub(CHROME_ROWS)
}

/// Columns available for text in a pane `total_width` wide.
pub fn document_content_width(total_width: u16) -> u16 {
    total_width
        .saturating_sub(DOCUMENT_LEFT_PADDING + DOCUMENT_RIGHT_PADDING)
        .max(1)
}

/// Rows for entries in a TOC panel as tall as the reading pane.
pub fn toc_list_rows(pane_height: u16, searching: bool) -> usize {
    usize::from(pane_height.saturating_sub(2 + u16::from(searching)))
}
