use std::path::PathBuf;

use crate::app::Model;
use crate::app::model::{Panel, SettingsRow};
use crate::gesture::{Point, Swipe, classify_swipe};
use crate::settings::{FontSize, Theme};
use crate::toc::Heading;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Navigation
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    /// Scroll back one screenful
    ScreenUp,
    /// Scroll forward one screenful
    ScreenDown,
    /// Go to beginning of book
    GoToTop,
    /// Go to end of book
    GoToBottom,

    // Pages
    NextPage,
    PreviousPage,
    /// Jump to a page by index
    GoToPage(usize),
    /// Mouse button pressed in the reading pane
    SwipeStart(Point),
    /// Mouse button released; may complete a swipe
    SwipeEnd(Point),

    // Panels
    ToggleToc,
    ToggleSettings,
    ToggleLibrary,
    ToggleHelp,
    HelpScrollUp,
    HelpScrollDown,
    /// Close whichever panel is open
    ClosePanel,

    // TOC
    /// Move TOC selection up
    TocUp,
    /// Move TOC selection down
    TocDown,
    /// Scroll TOC list up
    TocScrollUp,
    /// Scroll TOC list down
    TocScrollDown,
    /// Jump to the selected TOC entry
    TocSelect,
    /// Select and jump to a TOC entry by list index
    TocClick(usize),
    /// Open the TOC search input
    StartTocSearch,
    /// Replace the TOC search query
    TocSearchInput(String),
    /// Leave search and show the full outline
    ClearTocSearch,

    // Settings
    SettingsUp,
    SettingsDown,
    /// Next value for the selected settings row
    SettingsNext,
    /// Previous value for the selected settings row
    SettingsPrevious,
    CycleTheme,
    SetTheme(Theme),
    IncreaseFontSize,
    DecreaseFontSize,
    SetFontSize(FontSize),

    // Library
    LibraryUp,
    LibraryDown,
    /// Open a saved book by name
    OpenBook(String),
    /// Delete a saved book by name
    DeleteBook(String),

    // Open prompt
    StartOpenPrompt,
    OpenPromptInput(String),
    CancelOpenPrompt,
    /// Load a file from disk
    OpenFile(PathBuf),

    // Window
    /// Terminal resized (debounced)
    Resize(u16, u16),
    Quit,
}

impl Message {
    /// Whether handling this message may move the reading position.
    pub const fn moves_reading_position(&self) -> bool {
        matches!(
            self,
            Self::ScrollUp(_)
                | Self::ScrollDown(_)
                | Self::ScreenUp
                | Self::ScreenDown
                | Self::GoToTop
                | Self::GoToBottom
                | Self::NextPage
                | Self::PreviousPage
                | Self::GoToPage(_)
                | Self::SwipeEnd(_)
                | Self::TocSelect
                | Self::TocClick(_)
                | Self::Resize(..)
        ) || self.changes_preferences()
    }

    /// Whether handling this message may change theme or font size.
    pub const fn changes_preferences(&self) -> bool {
        matches!(
            self,
            Self::SettingsNext
                | Self::SettingsPrevious
                | Self::CycleTheme
                | Self::SetTheme(_)
                | Self::IncreaseFontSize
                | Self::DecreaseFontSize
                | Self::SetFontSize(_)
        )
    }
}

/// Pure state transition. Side effects live in `App::handle_message_side_effects`.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Navigation
        Message::ScrollUp(n) => {
            model.viewport.scroll_up(n);
            sync_page(&mut model);
        }
        Message::ScrollDown(n) => {
            model.viewport.scroll_down(n);
            sync_page(&mut model);
        }
        Message::ScreenUp => {
            model.viewport.screen_up();
            sync_page(&mut model);
        }
        Message::ScreenDown => {
            model.viewport.screen_down();
            sync_page(&mut model);
        }
        Message::GoToTop => {
            model.viewport.go_to_top();
            sync_page(&mut model);
        }
        Message::GoToBottom => {
            model.viewport.go_to_bottom();
            sync_page(&mut model);
        }

        // Pages
        Message::NextPage => {
            let target = model.pagination.next_page();
            scroll_to_page(&mut model, target);
        }
        Message::PreviousPage => {
            let target = model.pagination.previous_page();
            scroll_to_page(&mut model, target);
        }
        Message::GoToPage(page) => {
            let target = model.pagination.go_to_page(page);
            scroll_to_page(&mut model, target);
        }
        Message::SwipeStart(point) => {
            model.swipe_start = Some(point);
        }
        Message::SwipeEnd(end) => {
            if let Some(start) = model.swipe_start.take() {
                let target = match classify_swipe(start, end) {
                    Some(Swipe::Previous) => model.pagination.previous_page(),
                    Some(Swipe::Next) => model.pagination.next_page(),
                    None => None,
                };
                scroll_to_page(&mut model, target);
            }
        }

        // Panels
        Message::ToggleToc => {
            if model.is_panel_open(Panel::Toc) {
                close_panel(&mut model);
            } else {
                model.panel = Some(Panel::Toc);
                model.toc_query = None;
                model.sync_toc_to_viewport();
                model.ensure_toc_selection_visible();
            }
        }
        Message::ToggleSettings => toggle_panel(&mut model, Panel::Settings),
        Message::ToggleLibrary => toggle_panel(&mut model, Panel::Library),
        Message::ToggleHelp => {
            model.help_scroll = 0;
            toggle_panel(&mut model, Panel::Help);
        }
        Message::HelpScrollUp => {
            model.help_scroll = model.help_scroll.saturating_sub(1);
        }
        Message::HelpScrollDown => {
            // Clamped against the content height when drawn.
            model.help_scroll = model.help_scroll.saturating_add(1);
        }
        Message::ClosePanel => close_panel(&mut model),

        // TOC
        Message::TocUp => {
            if let Some(sel) = model.toc_selected {
                let next = sel.saturating_sub(1);
                model.toc_selected = Some(next);
                if next < model.toc_scroll_offset {
                    model.toc_scroll_offset = next;
                }
            } else if !model.toc_entries().is_empty() {
                model.toc_selected = Some(0);
            }
        }
        Message::TocDown => {
            let count = model.toc_entries().len();
            if count > 0 {
                let next = model
                    .toc_selected
                    .map_or(0, |sel| (sel + 1).min(count - 1));
                model.toc_selected = Some(next);
                model.ensure_toc_selection_visible();
            }
        }
        Message::TocScrollUp => {
            model.toc_scroll_offset = model.toc_scroll_offset.saturating_sub(1);
        }
        Message::TocScrollDown => {
            model.toc_scroll_offset =
                (model.toc_scroll_offset + 1).min(model.max_toc_scroll_offset());
        }
        Message::TocSelect => {
            if let Some(sel) = model.toc_selected {
                jump_to_toc_entry(&mut model, sel);
            }
        }
        Message::TocClick(idx) => jump_to_toc_entry(&mut model, idx),
        Message::StartTocSearch => {
            model.panel = Some(Panel::Toc);
            let query = model.toc_query.take().unwrap_or_default();
            set_toc_query(&mut model, query);
        }
        Message::TocSearchInput(query) => set_toc_query(&mut model, query),
        Message::ClearTocSearch => {
            model.toc_query = None;
            model.sync_toc_to_viewport();
            model.ensure_toc_selection_visible();
        }

        // Settings
        Message::SettingsUp | Message::SettingsDown => {
            model.settings_row = model.settings_row.toggle();
        }
        Message::SettingsNext => match model.settings_row {
            SettingsRow::Theme => model.theme = model.theme.next(),
            SettingsRow::FontSize => {
                let size = model.font_size.larger();
                set_font_size(&mut model, size);
            }
        },
        Message::SettingsPrevious => match model.settings_row {
            SettingsRow::Theme => model.theme = model.theme.previous(),
            SettingsRow::FontSize => {
                let size = model.font_size.smaller();
                set_font_size(&mut model, size);
            }
        },
        Message::CycleTheme => {
            model.theme = model.theme.next();
        }
        Message::SetTheme(theme) => {
            model.theme = theme;
        }
        Message::IncreaseFontSize => {
            let size = model.font_size.larger();
            set_font_size(&mut model, size);
        }
        Message::DecreaseFontSize => {
            let size = model.font_size.smaller();
            set_font_size(&mut model, size);
        }
        Message::SetFontSize(size) => set_font_size(&mut model, size),

        // Library
        Message::LibraryUp => {
            model.library_selected = model.library_selected.saturating_sub(1);
        }
        Message::LibraryDown => {
            let max = model.library_entries.len().saturating_sub(1);
            model.library_selected = (model.library_selected + 1).min(max);
        }

        // Open prompt
        Message::StartOpenPrompt => {
            model.panel = None;
            model.open_prompt = Some(String::new());
        }
        Message::OpenPromptInput(text) => {
            model.open_prompt = Some(text);
        }
        Message::CancelOpenPrompt | Message::OpenFile(_) => {
            model.open_prompt = None;
        }

        // Window
        Message::Resize(width, height) => {
            model
                .viewport
                .resize(width, crate::ui::reading_pane_height(height));
            model.reflow_layout();
            model.ensure_toc_selection_visible();
        }
        Message::Quit => {
            model.should_quit = true;
        }
        // Handled in effects
        Message::OpenBook(_) | Message::DeleteBook(_) => {}
    }

    model
}

fn sync_page(model: &mut Model) {
    model.pagination.sync_to_offset(model.viewport.offset());
}

/// Scroll to a page start chosen by the page model.
///
/// The page index is not re-derived from the clamped offset, so the last
/// page stays selected even when the book cannot scroll that far.
fn scroll_to_page(model: &mut Model, target: Option<usize>) {
    if let Some(offset) = target {
        model.viewport.go_to_line(offset);
    }
}

fn toggle_panel(model: &mut Model, panel: Panel) {
    if model.is_panel_open(panel) {
        close_panel(model);
    } else {
        model.panel = Some(panel);
        model.toc_query = None;
    }
}

fn close_panel(model: &mut Model) {
    model.panel = None;
    model.toc_query = None;
}

fn set_toc_query(model: &mut Model, query: String) {
    model.toc_query = Some(query);
    model.toc_scroll_offset = 0;
    model.toc_selected = (!model.toc_entries().is_empty()).then_some(0);
}

/// Jump to the heading listed at `idx`, then close the panel and the search.
fn jump_to_toc_entry(model: &mut Model, idx: usize) {
    let Some(entry) = model.toc_entries().into_iter().nth(idx) else {
        return;
    };
    let Some(line) = model.document.headings().get(entry.index).map(|h| h.line) else {
        return;
    };
    model.viewport.go_to_line(line);
    sync_page(model);
    model.toc_selected = Some(entry.index);
    close_panel(model);
}

fn set_font_size(model: &mut Model, size: FontSize) {
    if model.font_size == size {
        return;
    }
    model.font_size = size;
    model.reflow_layout();
}

/// Index of the heading nearest `line`, preferring the earlier one on ties.
pub(super) fn closest_heading_to_line(headings: &[Heading], line: usize) -> Option<usize> {
    if headings.is_empty() {
        return None;
    }
    let next = headings.partition_point(|h| h.line < line);
    if next == 0 {
        return Some(0);
    }
    if next >= headings.len() {
        return Some(headings.len() - 1);
    }
    let prev_idx = next - 1;
    let prev_dist = line.saturating_sub(headings[prev_idx].line);
    let next_dist = headings[next].line.saturating_sub(line);
    if prev_dist <= next_dist {
        Some(prev_idx)
    } else {
        Some(next)
    }
}
