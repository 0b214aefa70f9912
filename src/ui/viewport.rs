//! Scroll position over the laid-out book.
//!
//! The [`Viewport`] knows the reading pane size and the number of display
//! lines. Offsets are always clamped to `0..=max_offset()`.

use std::ops::Range;

/// The visible window onto the book's display lines.
///
/// # Example
///
/// ```
/// use bookreader::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 20, 100);
/// assert_eq!(vp.visible_range(), 0..20);
///
/// vp.screen_down();
/// assert_eq!(vp.visible_range(), 20..40);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    /// `width` is the terminal width; `height` is the reading pane height.
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Lines currently on screen, clamped to the book.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset.min(self.total_lines);
        let end = (self.offset + self.height as usize).min(self.total_lines);
        start..end
    }

    /// Position of the offset through the book as a fraction of its lines.
    ///
    /// Used to keep the reader's place when the layout changes.
    #[allow(clippy::cast_precision_loss)]
    pub fn position_ratio(&self) -> f64 {
        if self.total_lines == 0 {
            return 0.0;
        }
        self.offset as f64 / self.total_lines as f64
    }

    /// Move to the line at `ratio` of the book.
    pub fn go_to_ratio(&mut self, ratio: f64) {
        // ratio is clamped to 0.0..=1.0, so the product fits.
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let line = (self.total_lines as f64 * ratio.clamp(0.0, 1.0)).round() as usize;
        self.go_to_line(line);
    }

    pub const fn can_scroll_up(&self) -> bool {
        self.offset > 0
    }

    pub const fn can_scroll_down(&self) -> bool {
        self.offset < self.max_offset()
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n).min(self.max_offset());
    }

    /// Scroll back one screenful.
    pub const fn screen_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    /// Scroll forward one screenful.
    pub fn screen_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    pub const fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Put `line` at the top of the pane, as far as the book allows.
    pub fn go_to_line(&mut self, line: usize) {
        self.offset = line.min(self.max_offset());
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the line count after a new layout.
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Largest offset that still fills the pane.
    pub const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}
