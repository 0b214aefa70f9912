use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::document::{Document, LoadError, book_name, read_source};
use crate::gesture::Point;
use crate::pagination::Pagination;
use crate::search::{TocMatch, filter_headings};
use crate::settings::{FontSize, Theme};
use crate::store::{BookRecord, Library, StoreError};
use crate::ui::viewport::Viewport;

use super::update::closest_heading_to_line;

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Overlay panels. At most one is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Toc,
    Settings,
    Library,
    Help,
}

/// Rows of the settings panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettingsRow {
    #[default]
    Theme,
    FontSize,
}

impl SettingsRow {
    pub const fn toggle(self) -> Self {
        match self {
            Self::Theme => Self::FontSize,
            Self::FontSize => Self::Theme,
        }
    }
}

/// What the reading pane shows when no book is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Placeholder {
    #[default]
    Welcome,
    /// A load failed; the message is shown with the open action.
    Error(String),
}

/// A saved book as listed in the library panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub name: String,
    /// First load, milliseconds since the epoch
    pub timestamp: u64,
    pub last_read: Option<u64>,
}

impl From<&BookRecord> for LibraryEntry {
    fn from(record: &BookRecord) -> Self {
        Self {
            name: record.name.clone(),
            timestamp: record.timestamp,
            last_read: record.last_read,
        }
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug)]
pub struct Model {
    pub document: Document,
    pub viewport: Viewport,
    pub pagination: Pagination,
    pub library: Library,
    /// The open book's record, tracking the last saved position
    pub current_book: Option<BookRecord>,
    pub placeholder: Placeholder,
    pub panel: Option<Panel>,
    /// Index into [`Model::toc_entries`]
    pub toc_selected: Option<usize>,
    pub toc_scroll_offset: usize,
    /// `Some` while the TOC search input is active
    pub toc_query: Option<String>,
    pub settings_row: SettingsRow,
    pub help_scroll: usize,
    pub library_entries: Vec<LibraryEntry>,
    pub library_selected: usize,
    /// `Some` while the open-file prompt is active
    pub open_prompt: Option<String>,
    pub theme: Theme,
    pub font_size: FontSize,
    /// Where the current mouse drag began
    pub swipe_start: Option<Point>,
    pub config_global_path: Option<PathBuf>,
    pub config_local_path: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    pub should_quit: bool,
    toast: Option<Toast>,
}

impl Model {
    /// Create a model with no book open.
    pub fn new(library: Library, terminal_size: (u16, u16)) -> Self {
        Self {
            document: Document::empty(),
            viewport: Viewport::new(
                terminal_size.0,
                crate::ui::reading_pane_height(terminal_size.1),
                0,
            ),
            pagination: Pagination::new(),
            library,
            current_book: None,
            placeholder: Placeholder::Welcome,
            panel: None,
            toc_selected: None,
            toc_scroll_offset: 0,
            toc_query: None,
            settings_row: SettingsRow::Theme,
            help_scroll: 0,
            library_entries: Vec::new(),
            library_selected: 0,
            open_prompt: None,
            theme: Theme::default(),
            font_size: FontSize::default(),
            swipe_start: None,
            config_global_path: None,
            config_local_path: None,
            store_path: None,
            should_quit: false,
            toast: None,
        }
    }

    #[must_use]
    pub const fn with_preferences(mut self, theme: Theme, font_size: FontSize) -> Self {
        self.theme = theme;
        self.font_size = font_size;
        self
    }

    /// Name shown in the title bar.
    pub fn title(&self) -> &str {
        self.current_book
            .as_ref()
            .map_or("BookReader", |book| book.name.as_str())
    }

    pub const fn has_book(&self) -> bool {
        self.current_book.is_some()
    }

    pub fn is_panel_open(&self, panel: Panel) -> bool {
        self.panel == Some(panel)
    }

    /// Wrap width for the reading pane at the current font size.
    pub fn layout_width(&self) -> u16 {
        self.font_size
            .wrap_width(crate::ui::document_content_width(self.viewport.width()))
    }

    /// Read `path`, save it to the library, and show it.
    ///
    /// A file whose name already has a record keeps that record's reading
    /// position; only its content is replaced.
    pub fn open_file(&mut self, path: &Path) -> Result<(), LoadError> {
        let source = read_source(path)?;
        let name = book_name(path);
        let document = Document::from_markup(source.as_str(), self.layout_width())?;
        let record = match self.library.find_book(&name) {
            Some(mut existing) => {
                existing.content = source;
                existing
            }
            None => BookRecord::new(name, source),
        };
        if let Err(err) = self.library.save_book(&record) {
            self.report_store_error("Could not save book", &err);
        }
        self.remember_last_book(&record.name);
        tracing::debug!(path = %path.display(), name = %record.name, "opened file");
        self.display_book(record, document);
        Ok(())
    }

    /// Show a book from the library.
    pub fn open_saved_book(&mut self, name: &str) -> Result<(), LoadError> {
        let Some(record) = self.library.find_book(name) else {
            return Err(LoadError::Process(format!("no saved book named '{name}'")));
        };
        let document = Document::from_markup(record.content.as_str(), self.layout_width())?;
        self.remember_last_book(&record.name);
        self.display_book(record, document);
        Ok(())
    }

    fn remember_last_book(&mut self, name: &str) {
        if let Err(err) = self.library.set_last_book(name) {
            self.report_store_error("Could not remember book", &err);
        }
    }

    fn display_book(&mut self, record: BookRecord, document: Document) {
        self.document = document;
        self.viewport.set_total_lines(self.document.line_count());
        self.viewport.go_to_top();
        self.placeholder = Placeholder::Welcome;
        self.panel = None;
        self.toc_query = None;
        self.toc_selected = None;
        self.toc_scroll_offset = 0;
        self.current_book = Some(record);
        self.restore_reading_progress();
    }

    /// Scroll to the open book's saved position and recompute pages.
    pub fn restore_reading_progress(&mut self) {
        if let Some(book) = &self.current_book
            && book.last_position > 0
        {
            self.viewport.go_to_line(book.last_position);
        }
        self.recalculate_pages();
    }

    /// Persist the scroll offset for the open book.
    ///
    /// Returns whether anything was written; an unchanged offset is not
    /// saved again.
    pub fn save_reading_progress(&mut self) -> Result<bool, StoreError> {
        let offset = self.viewport.offset();
        let Some(book) = self.current_book.as_mut() else {
            return Ok(false);
        };
        if book.last_position == offset {
            return Ok(false);
        }
        book.last_position = offset;
        book.last_read = Some(crate::store::now_millis());
        self.library.save_book(book)?;
        Ok(true)
    }

    /// Persist theme and font size.
    pub fn save_preferences(&mut self) -> Result<(), StoreError> {
        self.library.set_theme(self.theme)?;
        self.library.set_font_size(self.font_size)
    }

    /// Remove a book from the library, closing it if it is on screen.
    pub fn delete_book(&mut self, name: &str) -> Result<bool, StoreError> {
        let removed = self.library.delete_book(name)?;
        if self
            .current_book
            .as_ref()
            .is_some_and(|book| book.name == name)
        {
            self.close_book();
        }
        self.refresh_library();
        Ok(removed)
    }

    /// Return the reading pane to the placeholder.
    pub fn close_book(&mut self) {
        self.document = Document::empty();
        self.current_book = None;
        self.placeholder = Placeholder::Welcome;
        self.toc_query = None;
        self.toc_selected = None;
        self.toc_scroll_offset = 0;
        self.viewport.set_total_lines(0);
        self.recalculate_pages();
    }

    /// Replace the view with an error placeholder for a failed load.
    pub fn show_load_error(&mut self, err: &LoadError) {
        tracing::warn!(%err, "load failed");
        self.close_book();
        self.panel = None;
        self.placeholder = Placeholder::Error(err.to_string());
    }

    pub fn refresh_library(&mut self) {
        self.library_entries = self
            .library
            .saved_books()
            .iter()
            .map(LibraryEntry::from)
            .collect();
        self.library_selected = self
            .library_selected
            .min(self.library_entries.len().saturating_sub(1));
    }

    pub fn selected_library_entry(&self) -> Option<&LibraryEntry> {
        self.library_entries.get(self.library_selected)
    }

    /// Recompute the page count and index from the current layout.
    pub fn recalculate_pages(&mut self) {
        self.pagination.recalculate(
            self.document.line_count(),
            self.viewport.height() as usize,
            self.viewport.offset(),
        );
    }

    /// Lay the book out again if the wrap width changed.
    ///
    /// The reading position is kept proportionally.
    pub fn reflow_layout(&mut self) {
        let width = self.layout_width();
        if !self.document.is_empty() && self.document.layout_width() != width {
            let ratio = self.viewport.position_ratio();
            self.document.relayout(width);
            self.viewport.set_total_lines(self.document.line_count());
            self.viewport.go_to_ratio(ratio);
            tracing::debug!(width, lines = self.document.line_count(), "reflowed");
        }
        self.recalculate_pages();
    }

    /// Outline entries currently listed in the TOC panel.
    ///
    /// The full outline unless a non-blank search query filters it.
    pub fn toc_entries(&self) -> Vec<TocMatch> {
        let headings = self.document.headings();
        self.toc_query
            .as_deref()
            .and_then(|query| filter_headings(headings, query))
            .unwrap_or_else(|| {
                (0..headings.len())
                    .map(|index| TocMatch {
                        index,
                        highlights: Vec::new(),
                    })
                    .collect()
            })
    }

    /// Whether the TOC list is narrowed by a search query.
    pub fn toc_is_filtered(&self) -> bool {
        self.toc_query
            .as_deref()
            .is_some_and(|query| !query.trim().is_empty())
    }

    /// Select the heading nearest the reading position.
    pub fn sync_toc_to_viewport(&mut self) {
        if self.toc_is_filtered() {
            return;
        }
        self.toc_selected =
            closest_heading_to_line(self.document.headings(), self.viewport.offset());
    }

    /// Rows available for TOC entries in the panel.
    pub fn toc_visible_rows(&self) -> usize {
        crate::ui::toc_list_rows(self.viewport.height(), self.toc_query.is_some())
    }

    pub fn max_toc_scroll_offset(&self) -> usize {
        self.toc_entries()
            .len()
            .saturating_sub(self.toc_visible_rows())
    }

    /// Scroll the TOC list so the selection is on screen.
    pub fn ensure_toc_selection_visible(&mut self) {
        let Some(sel) = self.toc_selected else {
            self.toc_scroll_offset = self.toc_scroll_offset.min(self.max_toc_scroll_offset());
            return;
        };
        let visible = self.toc_visible_rows().max(1);
        if sel < self.toc_scroll_offset {
            self.toc_scroll_offset = sel;
        } else if sel >= self.toc_scroll_offset + visible {
            self.toc_scroll_offset = sel + 1 - visible;
        }
        self.toc_scroll_offset = self.toc_scroll_offset.min(self.max_toc_scroll_offset());
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Log a failed store write and tell the reader.
    pub(super) fn report_store_error(&mut self, context: &str, err: &StoreError) {
        tracing::warn!(%err, "{context}");
        self.show_toast(ToastLevel::Warning, format!("{context}: {err}"));
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(Library::in_memory(), (80, 24))
    }
}
