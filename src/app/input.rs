use std::path::PathBuf;

use crossterm::event::{self, Event, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::model::Panel;
use crate::app::{App, Message, Model};
use crate::gesture::Point;

use super::event_loop::ResizeDebouncer;

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: event::KeyEvent, model: &Model) -> Option<Message> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Message::Quit);
        }

        if let Some(path) = model.open_prompt.as_ref() {
            return match key.code {
                KeyCode::Esc => Some(Message::CancelOpenPrompt),
                KeyCode::Enter => {
                    let path = path.trim();
                    if path.is_empty() {
                        Some(Message::CancelOpenPrompt)
                    } else {
                        Some(Message::OpenFile(PathBuf::from(path)))
                    }
                }
                KeyCode::Backspace => {
                    let mut next = path.clone();
                    next.pop();
                    Some(Message::OpenPromptInput(next))
                }
                KeyCode::Char(c) if is_text_input(key) => {
                    let mut next = path.clone();
                    next.push(c);
                    Some(Message::OpenPromptInput(next))
                }
                _ => None,
            };
        }

        match model.panel {
            Some(Panel::Help) => match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Message::HelpScrollDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::HelpScrollUp),
                _ => Some(Message::ClosePanel),
            },
            Some(Panel::Toc) => model.toc_query.as_ref().map_or_else(
                || Self::handle_toc_key(key),
                |query| Self::handle_toc_search_key(key, query),
            ),
            Some(Panel::Settings) => Self::handle_settings_key(key),
            Some(Panel::Library) => Self::handle_library_key(key, model),
            None => Self::handle_reading_key(key, model),
        }
    }

    fn handle_toc_search_key(key: event::KeyEvent, query: &str) -> Option<Message> {
        match key.code {
            KeyCode::Esc => Some(Message::ClearTocSearch),
            KeyCode::Enter => Some(Message::TocSelect),
            KeyCode::Down => Some(Message::TocDown),
            KeyCode::Up => Some(Message::TocUp),
            KeyCode::Backspace => {
                let mut next = query.to_string();
                next.pop();
                Some(Message::TocSearchInput(next))
            }
            KeyCode::Char(c) if is_text_input(key) => {
                let mut next = query.to_string();
                next.push(c);
                Some(Message::TocSearchInput(next))
            }
            _ => None,
        }
    }

    fn handle_toc_key(key: event::KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Message::TocDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::TocUp),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Message::TocSelect),
            KeyCode::Char('/') => Some(Message::StartTocSearch),
            KeyCode::Left => Some(Message::PreviousPage),
            KeyCode::Right => Some(Message::NextPage),
            KeyCode::Char('s') => Some(Message::ToggleSettings),
            KeyCode::Char('L') => Some(Message::ToggleLibrary),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char('t') => Some(Message::ToggleToc),
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Esc => Some(Message::ClosePanel),
            _ => None,
        }
    }

    fn handle_settings_key(key: event::KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Message::SettingsDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::SettingsUp),
            KeyCode::Char('h' | '-') | KeyCode::Left => Some(Message::SettingsPrevious),
            KeyCode::Char('l' | '+' | '=') | KeyCode::Right | KeyCode::Enter => {
                Some(Message::SettingsNext)
            }
            KeyCode::Char('T') => Some(Message::CycleTheme),
            KeyCode::Char('t') => Some(Message::ToggleToc),
            KeyCode::Char('L') => Some(Message::ToggleLibrary),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('s') | KeyCode::Esc => Some(Message::ClosePanel),
            _ => None,
        }
    }

    fn handle_library_key(key: event::KeyEvent, model: &Model) -> Option<Message> {
        let selected = || model.selected_library_entry().map(|entry| entry.name.clone());
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Message::LibraryDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::LibraryUp),
            KeyCode::Enter => selected().map(Message::OpenBook),
            KeyCode::Char('d') | KeyCode::Delete => selected().map(Message::DeleteBook),
            KeyCode::Char('o') => Some(Message::StartOpenPrompt),
            KeyCode::Left => Some(Message::PreviousPage),
            KeyCode::Right => Some(Message::NextPage),
            KeyCode::Char('t') => Some(Message::ToggleToc),
            KeyCode::Char('s') => Some(Message::ToggleSettings),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('L') | KeyCode::Esc => Some(Message::ClosePanel),
            _ => None,
        }
    }

    fn handle_reading_key(key: event::KeyEvent, model: &Model) -> Option<Message> {
        let viewport = &model.viewport;
        match key.code {
            // Navigation
            KeyCode::Char('j') | KeyCode::Down => {
                viewport.can_scroll_down().then_some(Message::ScrollDown(1))
            }
            KeyCode::Char('k') | KeyCode::Up => {
                viewport.can_scroll_up().then_some(Message::ScrollUp(1))
            }
            KeyCode::Char(' ') | KeyCode::PageDown => {
                viewport.can_scroll_down().then_some(Message::ScreenDown)
            }
            KeyCode::Char('b') | KeyCode::PageUp => {
                viewport.can_scroll_up().then_some(Message::ScreenUp)
            }
            KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
            KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),

            // Pages
            KeyCode::Left => model
                .pagination
                .can_go_previous()
                .then_some(Message::PreviousPage),
            KeyCode::Right => model.pagination.can_go_next().then_some(Message::NextPage),

            // Panels
            KeyCode::Char('t') => Some(Message::ToggleToc),
            KeyCode::Char('/') => Some(Message::StartTocSearch),
            KeyCode::Char('s') => Some(Message::ToggleSettings),
            KeyCode::Char('L') => Some(Message::ToggleLibrary),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char('o') => Some(Message::StartOpenPrompt),

            // Preferences
            KeyCode::Char('+' | '=') => Some(Message::IncreaseFontSize),
            KeyCode::Char('-') => Some(Message::DecreaseFontSize),
            KeyCode::Char('T') => Some(Message::CycleTheme),

            KeyCode::Char('q') => Some(Message::Quit),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        let doc_area = crate::ui::document_area(screen_area(model));
        let released = matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left));

        match model.panel {
            Some(Panel::Toc) => {
                let panel = crate::ui::toc_panel_rect(doc_area);
                let inside = point_in_rect(mouse.column, mouse.row, panel);
                match mouse.kind {
                    MouseEventKind::ScrollDown if inside => Some(Message::TocScrollDown),
                    MouseEventKind::ScrollUp if inside => Some(Message::TocScrollUp),
                    MouseEventKind::Up(MouseButton::Left) if inside => {
                        toc_entry_at_row(model, panel, mouse.row).map(Message::TocClick)
                    }
                    _ if released => Some(Message::ClosePanel),
                    _ => None,
                }
            }
            Some(panel) => {
                let rect = crate::ui::panel_rect(panel, doc_area, model);
                (released && !point_in_rect(mouse.column, mouse.row, rect))
                    .then_some(Message::ClosePanel)
            }
            None => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left)
                    if point_in_rect(mouse.column, mouse.row, doc_area) =>
                {
                    Some(Message::SwipeStart(Point::from_cell(mouse.column, mouse.row)))
                }
                MouseEventKind::Up(MouseButton::Left) if model.swipe_start.is_some() => {
                    Some(Message::SwipeEnd(Point::from_cell(mouse.column, mouse.row)))
                }
                MouseEventKind::ScrollDown => model
                    .viewport
                    .can_scroll_down()
                    .then_some(Message::ScrollDown(WHEEL_LINES)),
                MouseEventKind::ScrollUp => model
                    .viewport
                    .can_scroll_up()
                    .then_some(Message::ScrollUp(WHEEL_LINES)),
                _ => None,
            },
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

fn is_text_input(key: event::KeyEvent) -> bool {
    !key.modifiers.contains(KeyModifiers::CONTROL) && !key.modifiers.contains(KeyModifiers::ALT)
}

/// The whole terminal, rebuilt from the viewport size.
fn screen_area(model: &Model) -> Rect {
    Rect::new(
        0,
        0,
        model.viewport.width(),
        model
            .viewport
            .height()
            .saturating_add(crate::ui::CHROME_ROWS),
    )
}

fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

/// List index of the TOC entry drawn at `row`, if any.
fn toc_entry_at_row(model: &Model, panel: Rect, row: u16) -> Option<usize> {
    let top = crate::ui::toc_list_top(panel, model.toc_query.is_some());
    let bottom = panel.y + panel.height.saturating_sub(1);
    if row < top || row >= bottom {
        return None;
    }
    let idx = model.toc_scroll_offset + usize::from(row - top);
    (idx < model.toc_entries().len()).then_some(idx)
}
