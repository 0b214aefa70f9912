//! Page model over a scrolling document.
//!
//! Pages are a display metric, not content units. The page count is the
//! content height divided by the viewport height, rounded up. The page index
//! is derived proportionally from the scroll offset, and the offset for a
//! page is derived the same way in reverse. All heights are in display
//! lines.

/// Number of pages for `content_height` lines shown `viewport_height` at a time.
pub const fn total_pages(content_height: usize, viewport_height: usize) -> usize {
    if viewport_height == 0 {
        return 0;
    }
    content_height.div_ceil(viewport_height)
}

/// Page index for a scroll offset.
///
/// `floor(offset / content_height * total_pages)`, clamped to the last page.
pub const fn page_for_offset(offset: usize, content_height: usize, total_pages: usize) -> usize {
    if content_height == 0 || total_pages == 0 {
        return 0;
    }
    let page = offset.saturating_mul(total_pages) / content_height;
    if page >= total_pages {
        total_pages - 1
    } else {
        page
    }
}

/// Scroll offset for the start of `page`.
///
/// `page / total_pages * content_height`, rounded up so that
/// [`page_for_offset`] maps the result back to `page`.
pub const fn offset_for_page(page: usize, content_height: usize, total_pages: usize) -> usize {
    if total_pages == 0 {
        return 0;
    }
    page.saturating_mul(content_height).div_ceil(total_pages)
}

/// Whether the previous-page control applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    AtFirstPage,
    AtOtherPage,
}

/// Current page and page count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    total_pages: usize,
    content_height: usize,
}

impl Pagination {
    pub const fn new() -> Self {
        Self {
            current_page: 0,
            total_pages: 0,
            content_height: 0,
        }
    }

    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    pub const fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Recompute the page count, then the page index for `offset`.
    ///
    /// With no content the index resets to the first page.
    pub fn recalculate(&mut self, content_height: usize, viewport_height: usize, offset: usize) {
        self.content_height = content_height;
        self.total_pages = total_pages(content_height, viewport_height);
        if content_height > 0 {
            self.sync_to_offset(offset);
        } else {
            self.current_page = 0;
        }
    }

    /// Derive the page index from a new scroll offset.
    pub fn sync_to_offset(&mut self, offset: usize) {
        self.current_page = page_for_offset(offset, self.content_height, self.total_pages);
    }

    /// Jump to `page`, returning the scroll offset to request.
    ///
    /// Out-of-range pages are ignored. The index changes immediately, ahead
    /// of the scroll itself.
    pub fn go_to_page(&mut self, page: usize) -> Option<usize> {
        if page >= self.total_pages {
            return None;
        }
        self.current_page = page;
        Some(offset_for_page(page, self.content_height, self.total_pages))
    }

    pub fn next_page(&mut self) -> Option<usize> {
        if !self.can_go_next() {
            return None;
        }
        self.go_to_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> Option<usize> {
        if !self.can_go_previous() {
            return None;
        }
        self.go_to_page(self.current_page - 1)
    }

    pub const fn state(&self) -> PageState {
        if self.current_page == 0 {
            PageState::AtFirstPage
        } else {
            PageState::AtOtherPage
        }
    }

    pub const fn can_go_previous(&self) -> bool {
        matches!(self.state(), PageState::AtOtherPage)
    }

    pub const fn can_go_next(&self) -> bool {
        self.current_page + 1 < self.total_pages
    }

    /// Reading progress, `(current + 1) / total`, in `0.0..=1.0`.
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        ((self.current_page + 1) as f64 / self.total_pages as f64).min(1.0)
    }

    /// Progress as a whole percentage.
    pub fn progress_percent(&self) -> u16 {
        // progress() is within 0.0..=1.0.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (self.progress() * 100.0).round() as u16;
        percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn paged(content: usize, viewport: usize) -> Pagination {
        let mut pagination = Pagination::new();
        pagination.recalculate(content, viewport, 0);
        pagination
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(100, 20), 5);
        assert_eq!(total_pages(101, 20), 6);
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(100, 0), 0);
    }

    #[test]
    fn test_page_for_offset_is_proportional() {
        assert_eq!(page_for_offset(0, 100, 5), 0);
        assert_eq!(page_for_offset(19, 100, 5), 0);
        assert_eq!(page_for_offset(20, 100, 5), 1);
        assert_eq!(page_for_offset(99, 100, 5), 4);
        assert_eq!(page_for_offset(500, 100, 5), 4);
    }

    #[test]
    fn test_offset_for_page_is_proportional() {
        assert_eq!(offset_for_page(0, 100, 5), 0);
        assert_eq!(offset_for_page(3, 100, 5), 60);
        assert_eq!(offset_for_page(1, 0, 0), 0);
        assert_eq!(offset_for_page(1, 10, 3), 4);
        assert_eq!(page_for_offset(4, 10, 3), 1);
    }

    #[test]
    fn test_go_to_page_rejects_out_of_range() {
        let mut pagination = paged(100, 20);
        assert_eq!(pagination.go_to_page(5), None);
        assert_eq!(pagination.current_page(), 0);
        assert_eq!(pagination.go_to_page(2), Some(40));
        assert_eq!(pagination.current_page(), 2);
    }

    #[test]
    fn test_next_and_previous_stop_at_ends() {
        let mut pagination = paged(40, 20);
        assert_eq!(pagination.previous_page(), None);
        assert_eq!(pagination.next_page(), Some(20));
        assert_eq!(pagination.next_page(), None);
        assert_eq!(pagination.current_page(), 1);
        assert_eq!(pagination.previous_page(), Some(0));
    }

    #[test]
    fn test_state_tracks_first_page() {
        let mut pagination = paged(100, 20);
        assert_eq!(pagination.state(), PageState::AtFirstPage);
        pagination.next_page();
        assert_eq!(pagination.state(), PageState::AtOtherPage);
    }

    #[test]
    fn test_recalculate_resets_index_for_empty_content() {
        let mut pagination = paged(0, 20);
        assert_eq!(pagination.total_pages(), 0);
        assert_eq!(pagination.current_page(), 0);
        assert!(!pagination.can_go_next());
        assert!((pagination.progress() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_counts_current_page() {
        let mut pagination = paged(100, 20);
        assert_eq!(pagination.progress_percent(), 20);
        pagination.go_to_page(4);
        assert_eq!(pagination.progress_percent(), 100);
    }

    proptest! {
        #[test]
        fn prop_page_index_stays_in_range(
            content in 0usize..5000,
            viewport in 0usize..200,
            offset in 0usize..10_000,
        ) {
            let mut pagination = Pagination::new();
            pagination.recalculate(content, viewport, offset);
            if pagination.total_pages() > 0 {
                prop_assert!(pagination.current_page() < pagination.total_pages());
            } else {
                prop_assert_eq!(pagination.current_page(), 0);
            }
        }

        #[test]
        fn prop_go_to_page_round_trips(content in 1usize..5000, viewport in 1usize..200, page in 0usize..100) {
            let mut pagination = Pagination::new();
            pagination.recalculate(content, viewport, 0);
            match pagination.go_to_page(page) {
                Some(offset) => {
                    prop_assert!(page < pagination.total_pages());
                    prop_assert_eq!(page_for_offset(offset, content, pagination.total_pages()), page);
                }
                None => prop_assert!(page >= pagination.total_pages()),
            }
        }
    }
}
