use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::tempdir;

use crate::gesture::Point;
use crate::pagination::offset_for_page;
use crate::settings::{FontSize, Theme};
use crate::store::{BookRecord, Library};
use crate::toc::Heading;

use super::event_loop::ResizeDebouncer;
use super::model::{Panel, Placeholder, SettingsRow};
use super::update::closest_heading_to_line;
use super::{App, Message, Model, ToastLevel, update};

const SHORT_BOOK: &str = "<p>1. Intro</p><p>Hello world</p>";

/// Five numbered chapters of ten short paragraphs each.
fn long_book() -> String {
    let mut html = String::new();
    for chapter in 1..=5 {
        write!(html, "<p>{chapter}. Chapter {chapter}</p>").unwrap();
        for para in 1..=10 {
            write!(html, "<p>Paragraph {para} of chapter {chapter}.</p>").unwrap();
        }
    }
    html
}

fn model_with_book(html: &str) -> Model {
    let mut library = Library::in_memory();
    library.save_book(&BookRecord::new("novel", html)).unwrap();
    let mut model = Model::new(library, (80, 24));
    model.open_saved_book("novel").unwrap();
    model
}

fn create_long_test_model() -> Model {
    model_with_book(&long_book())
}

fn key(code: KeyCode) -> event::KeyEvent {
    event::KeyEvent::new(code, KeyModifiers::NONE)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn dispatch(model: Model, msg: Message) -> Model {
    let mut model = update(model, msg.clone());
    App::handle_message_side_effects(&mut model, &msg);
    model
}

fn heading_line(model: &Model, index: usize) -> usize {
    model.document.headings()[index].line
}

#[test]
fn test_scroll_down_updates_viewport_and_page() {
    let model = create_long_test_model();
    assert!(model.pagination.total_pages() > 2);

    let model = update(model, Message::ScrollDown(30));
    assert_eq!(model.viewport.offset(), 30);
    assert!(model.pagination.current_page() >= 1);
}

#[test]
fn test_scroll_up_updates_viewport() {
    let mut model = create_long_test_model();
    model.viewport.scroll_down(10);
    let model = update(model, Message::ScrollUp(3));
    assert_eq!(model.viewport.offset(), 7);
}

#[test]
fn test_go_to_top_and_bottom_sync_page() {
    let model = update(create_long_test_model(), Message::GoToBottom);
    assert_eq!(model.viewport.offset(), model.viewport.max_offset());
    assert_eq!(
        model.pagination.current_page(),
        model.pagination.total_pages() - 1
    );

    let model = update(model, Message::GoToTop);
    assert_eq!(model.viewport.offset(), 0);
    assert_eq!(model.pagination.current_page(), 0);
}

#[test]
fn test_next_page_scrolls_to_page_start() {
    let model = update(create_long_test_model(), Message::NextPage);
    let lines = model.document.line_count();
    let total = model.pagination.total_pages();
    assert_eq!(model.pagination.current_page(), 1);
    assert_eq!(model.viewport.offset(), offset_for_page(1, lines, total));
}

#[test]
fn test_previous_page_on_first_page_does_nothing() {
    let model = update(create_long_test_model(), Message::PreviousPage);
    assert_eq!(model.pagination.current_page(), 0);
    assert_eq!(model.viewport.offset(), 0);
}

#[test]
fn test_go_to_last_page_keeps_index_when_scroll_is_clamped() {
    let model = create_long_test_model();
    let last = model.pagination.total_pages() - 1;
    let model = update(model, Message::GoToPage(last));
    assert_eq!(model.pagination.current_page(), last);
    assert!(model.viewport.offset() <= model.viewport.max_offset());
    assert!(!model.pagination.can_go_next());
}

#[test]
fn test_go_to_page_out_of_range_is_ignored() {
    let model = create_long_test_model();
    let total = model.pagination.total_pages();
    let model = update(model, Message::GoToPage(total));
    assert_eq!(model.pagination.current_page(), 0);
    assert_eq!(model.viewport.offset(), 0);
}

#[test]
fn test_swipe_left_turns_forward() {
    let model = update(
        create_long_test_model(),
        Message::SwipeStart(Point::from_cell(60, 10)),
    );
    assert!(model.swipe_start.is_some());

    let model = update(model, Message::SwipeEnd(Point::from_cell(20, 10)));
    assert!(model.swipe_start.is_none());
    assert_eq!(model.pagination.current_page(), 1);
}

#[test]
fn test_swipe_right_turns_back() {
    let model = update(create_long_test_model(), Message::NextPage);
    let model = update(model, Message::SwipeStart(Point::from_cell(20, 10)));
    let model = update(model, Message::SwipeEnd(Point::from_cell(60, 10)));
    assert_eq!(model.pagination.current_page(), 0);
    assert_eq!(model.viewport.offset(), 0);
}

#[test]
fn test_vertical_drag_is_not_a_swipe() {
    let model = update(
        create_long_test_model(),
        Message::SwipeStart(Point::from_cell(60, 5)),
    );
    let model = update(model, Message::SwipeEnd(Point::from_cell(20, 15)));
    assert!(model.swipe_start.is_none());
    assert_eq!(model.pagination.current_page(), 0);
}

#[test]
fn test_swipe_end_without_start_is_ignored() {
    let model = update(
        create_long_test_model(),
        Message::SwipeEnd(Point::from_cell(0, 10)),
    );
    assert_eq!(model.viewport.offset(), 0);
}

#[test]
fn test_toggle_toc_changes_visibility() {
    let model = create_long_test_model();
    assert!(model.panel.is_none());

    let model = update(model, Message::ToggleToc);
    assert_eq!(model.panel, Some(Panel::Toc));

    let model = update(model, Message::ToggleToc);
    assert!(model.panel.is_none());
}

#[test]
fn test_toggle_toc_selects_heading_near_reading_position() {
    let mut model = create_long_test_model();
    let line = heading_line(&model, 2);
    model.viewport.go_to_line(line + 1);

    let model = update(model, Message::ToggleToc);
    assert_eq!(model.toc_selected, Some(2));
}

#[test]
fn test_toc_select_jumps_and_closes_panel() {
    let mut model = update(create_long_test_model(), Message::ToggleToc);
    assert_eq!(model.toc_selected, Some(0));
    model = update(model, Message::TocDown);
    model = update(model, Message::TocDown);
    model = update(model, Message::TocSelect);

    assert_eq!(model.viewport.offset(), heading_line(&model, 2));
    assert!(model.panel.is_none());
    assert_eq!(model.toc_selected, Some(2));
    assert_eq!(model.pagination.current_page(), 2);
}

#[test]
fn test_toc_up_stops_at_first_entry() {
    let mut model = update(create_long_test_model(), Message::ToggleToc);
    model = update(model, Message::TocUp);
    assert_eq!(model.toc_selected, Some(0));
}

#[test]
fn test_toc_down_stops_at_last_entry() {
    let mut model = update(create_long_test_model(), Message::ToggleToc);
    for _ in 0..10 {
        model = update(model, Message::TocDown);
    }
    assert_eq!(model.toc_selected, Some(4));
}

#[test]
fn test_toc_click_jumps_to_entry() {
    let model = update(create_long_test_model(), Message::ToggleToc);
    let model = update(model, Message::TocClick(1));
    assert_eq!(model.viewport.offset(), heading_line(&model, 1));
    assert!(model.panel.is_none());
}

#[test]
fn test_toc_click_out_of_range_keeps_position() {
    let model = update(create_long_test_model(), Message::ToggleToc);
    let selected = model.toc_selected;
    let model = update(model, Message::TocClick(99));
    assert_eq!(model.viewport.offset(), 0);
    assert_eq!(model.toc_selected, selected);
    assert_eq!(model.panel, Some(Panel::Toc));
}

#[test]
fn test_toc_search_filters_and_selects_match() {
    let mut model = update(create_long_test_model(), Message::StartTocSearch);
    assert_eq!(model.panel, Some(Panel::Toc));
    assert_eq!(model.toc_query.as_deref(), Some(""));
    assert_eq!(model.toc_entries().len(), 5);

    model = update(model, Message::TocSearchInput("chapter 4".to_string()));
    let entries = model.toc_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].index, 3);
    assert_eq!(model.toc_selected, Some(0));

    model = update(model, Message::TocSelect);
    assert_eq!(model.viewport.offset(), heading_line(&model, 3));
    assert!(model.toc_query.is_none());
    assert_eq!(model.toc_selected, Some(3));
}

#[test]
fn test_toc_search_without_matches_has_no_selection() {
    let mut model = update(create_long_test_model(), Message::StartTocSearch);
    model = update(model, Message::TocSearchInput("epilogue".to_string()));
    assert!(model.toc_entries().is_empty());
    assert!(model.toc_selected.is_none());

    model = update(model, Message::TocSelect);
    assert_eq!(model.viewport.offset(), 0);
}

#[test]
fn test_clear_toc_search_restores_outline() {
    let mut model = update(create_long_test_model(), Message::StartTocSearch);
    model = update(model, Message::TocSearchInput("chapter 3".to_string()));
    model = update(model, Message::ClearTocSearch);
    assert!(model.toc_query.is_none());
    assert_eq!(model.panel, Some(Panel::Toc));
    assert_eq!(model.toc_entries().len(), 5);
    assert_eq!(model.toc_selected, Some(0));
}

#[test]
fn test_toc_scroll_is_bounded() {
    let mut model = create_long_test_model();
    model = update(model, Message::Resize(80, 6));
    model = update(model, Message::ToggleToc);
    for _ in 0..20 {
        model = update(model, Message::TocScrollDown);
    }
    assert_eq!(model.toc_scroll_offset, model.max_toc_scroll_offset());
    for _ in 0..20 {
        model = update(model, Message::TocScrollUp);
    }
    assert_eq!(model.toc_scroll_offset, 0);
}

#[test]
fn test_panels_are_mutually_exclusive() {
    let mut model = update(create_long_test_model(), Message::ToggleSettings);
    assert_eq!(model.panel, Some(Panel::Settings));

    model = update(model, Message::ToggleLibrary);
    assert_eq!(model.panel, Some(Panel::Library));

    model = update(model, Message::ToggleHelp);
    assert_eq!(model.panel, Some(Panel::Help));

    model = update(model, Message::ClosePanel);
    assert!(model.panel.is_none());
}

#[test]
fn test_help_scroll_resets_when_reopened() {
    let mut model = update(Model::default(), Message::ToggleHelp);
    model = update(model, Message::HelpScrollDown);
    model = update(model, Message::HelpScrollDown);
    model = update(model, Message::HelpScrollUp);
    assert_eq!(model.help_scroll, 1);

    model = update(model, Message::ToggleHelp);
    model = update(model, Message::ToggleHelp);
    assert_eq!(model.help_scroll, 0);
}

#[test]
fn test_cycle_theme() {
    let model = update(Model::default(), Message::CycleTheme);
    assert_eq!(model.theme, Theme::default().next());

    let model = update(model, Message::SetTheme(Theme::Sepia));
    assert_eq!(model.theme, Theme::Sepia);
}

#[test]
fn test_settings_rows_change_selected_value() {
    let mut model = update(create_long_test_model(), Message::ToggleSettings);
    assert_eq!(model.settings_row, SettingsRow::Theme);

    model = update(model, Message::SettingsPrevious);
    assert_eq!(model.theme, Theme::default().previous());

    model = update(model, Message::SettingsDown);
    assert_eq!(model.settings_row, SettingsRow::FontSize);
    model = update(model, Message::SettingsNext);
    assert_eq!(model.font_size, FontSize::DEFAULT.larger());

    model = update(model, Message::SettingsUp);
    assert_eq!(model.settings_row, SettingsRow::Theme);
}

#[test]
fn test_font_size_reflows_and_keeps_position() {
    let mut html = String::new();
    for i in 1..=40 {
        write!(html, "<p>{}</p>", format!("word{i} ").repeat(30)).unwrap();
    }
    let mut model = model_with_book(&html);
    let old_width = model.document.layout_width();
    let middle = model.document.line_count() / 2;
    model = update(model, Message::ScrollDown(middle));
    let ratio = model.viewport.position_ratio();

    model = update(model, Message::IncreaseFontSize);
    assert_eq!(model.font_size, FontSize::DEFAULT.larger());
    assert_eq!(model.document.layout_width(), model.layout_width());
    assert!(model.document.layout_width() < old_width);
    assert!((model.viewport.position_ratio() - ratio).abs() < 0.05);
    assert_eq!(model.viewport.total_lines(), model.document.line_count());
}

#[test]
fn test_font_size_stops_at_bounds() {
    let mut model = Model::default();
    for _ in 0..20 {
        model = update(model, Message::DecreaseFontSize);
    }
    assert_eq!(model.font_size, FontSize::SMALLEST);
    for _ in 0..20 {
        model = update(model, Message::IncreaseFontSize);
    }
    assert_eq!(model.font_size, FontSize::LARGEST);
}

#[test]
fn test_resize_updates_viewport_and_pages() {
    let model = update(create_long_test_model(), Message::Resize(100, 30));
    assert_eq!(model.viewport.width(), 100);
    assert_eq!(model.viewport.height(), 28);
    let expected = model.document.line_count().div_ceil(28);
    assert_eq!(model.pagination.total_pages(), expected);
}

#[test]
fn test_open_prompt_flow() {
    let mut model = update(create_long_test_model(), Message::ToggleLibrary);
    model = update(model, Message::StartOpenPrompt);
    assert!(model.panel.is_none());
    assert_eq!(model.open_prompt.as_deref(), Some(""));

    model = update(model, Message::OpenPromptInput("a.html".to_string()));
    assert_eq!(model.open_prompt.as_deref(), Some("a.html"));

    model = update(model, Message::CancelOpenPrompt);
    assert!(model.open_prompt.is_none());
}

#[test]
fn test_quit_sets_flag() {
    let model = update(Model::default(), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_open_file_saves_record_and_last_book() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("novel.html");
    std::fs::write(&path, SHORT_BOOK).unwrap();

    let mut model = Model::default();
    model.open_file(&path).unwrap();

    assert_eq!(model.title(), "novel");
    assert!(model.has_book());
    assert_eq!(model.document.headings().len(), 1);
    assert!(model.library.find_book("novel").is_some());
    assert_eq!(model.library.last_book().as_deref(), Some("novel"));
}

#[test]
fn test_open_file_keeps_saved_position() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("novel.html");
    let html = long_book();
    std::fs::write(&path, &html).unwrap();

    let mut library = Library::in_memory();
    let mut record = BookRecord::new("novel", html);
    record.last_position = 30;
    library.save_book(&record).unwrap();

    let mut model = Model::new(library, (80, 24));
    model.open_file(&path).unwrap();
    assert_eq!(model.viewport.offset(), 30);
    assert_eq!(model.library.find_book("novel").unwrap().last_position, 30);
}

#[test]
fn test_open_missing_file_shows_error_placeholder() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.html");

    let model = dispatch(create_long_test_model(), Message::OpenFile(missing));
    assert!(!model.has_book());
    assert!(matches!(model.placeholder, Placeholder::Error(_)));
    assert_eq!(model.document.line_count(), 0);
}

#[test]
fn test_open_file_side_effect_reports_success() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("story.html");
    std::fs::write(&path, SHORT_BOOK).unwrap();

    let mut model = update(Model::default(), Message::StartOpenPrompt);
    model = dispatch(model, Message::OpenFile(PathBuf::from(&path)));
    assert!(model.open_prompt.is_none());
    assert_eq!(model.title(), "story");
    assert_eq!(
        model.active_toast(),
        Some(("Opened story", ToastLevel::Info))
    );
}

#[test]
fn test_open_binary_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("image.html");
    std::fs::write(&path, b"\x89PNG\0\0\0data").unwrap();

    let model = dispatch(Model::default(), Message::OpenFile(path));
    assert!(matches!(model.placeholder, Placeholder::Error(_)));
    assert!(model.library.saved_books().is_empty());
}

#[test]
fn test_open_saved_book_from_library() {
    let mut model = create_long_test_model();
    model
        .library
        .save_book(&BookRecord::new("other", SHORT_BOOK))
        .unwrap();

    let model = dispatch(model, Message::OpenBook("other".to_string()));
    assert_eq!(model.title(), "other");
    assert_eq!(model.library.last_book().as_deref(), Some("other"));
}

#[test]
fn test_delete_displayed_book_closes_it() {
    let model = dispatch(
        create_long_test_model(),
        Message::DeleteBook("novel".to_string()),
    );
    assert!(!model.has_book());
    assert_eq!(model.placeholder, Placeholder::Welcome);
    assert!(model.library.find_book("novel").is_none());
    assert!(model.library.last_book().is_none());
    assert_eq!(
        model.active_toast().map(|(_, level)| level),
        Some(ToastLevel::Info)
    );
}

#[test]
fn test_delete_other_book_keeps_current() {
    let mut model = create_long_test_model();
    model
        .library
        .save_book(&BookRecord::new("other", SHORT_BOOK))
        .unwrap();

    let model = dispatch(model, Message::DeleteBook("other".to_string()));
    assert_eq!(model.title(), "novel");
    assert_eq!(model.library.last_book().as_deref(), Some("novel"));
    assert_eq!(model.library_entries.len(), 1);
}

#[test]
fn test_delete_unknown_book_warns() {
    let model = dispatch(Model::default(), Message::DeleteBook("ghost".to_string()));
    assert_eq!(
        model.active_toast().map(|(_, level)| level),
        Some(ToastLevel::Warning)
    );
}

#[test]
fn test_library_selection_is_bounded() {
    let mut model = create_long_test_model();
    model
        .library
        .save_book(&BookRecord::new("other", SHORT_BOOK))
        .unwrap();
    model = dispatch(model, Message::ToggleLibrary);
    assert_eq!(model.library_entries.len(), 2);

    for _ in 0..5 {
        model = update(model, Message::LibraryDown);
    }
    assert_eq!(model.library_selected, 1);
    model = update(model, Message::LibraryUp);
    model = update(model, Message::LibraryUp);
    assert_eq!(model.library_selected, 0);
}

#[test]
fn test_save_reading_progress_only_when_changed() {
    let mut model = create_long_test_model();
    assert!(!model.save_reading_progress().unwrap());

    model.viewport.scroll_down(12);
    assert!(model.save_reading_progress().unwrap());
    assert!(!model.save_reading_progress().unwrap());

    let record = model.library.find_book("novel").unwrap();
    assert_eq!(record.last_position, 12);
    assert!(record.last_read.is_some());
}

#[test]
fn test_scrolling_persists_progress() {
    let model = dispatch(create_long_test_model(), Message::ScrollDown(5));
    assert_eq!(model.library.find_book("novel").unwrap().last_position, 5);
}

#[test]
fn test_preference_changes_are_saved() {
    let model = dispatch(Model::default(), Message::IncreaseFontSize);
    assert_eq!(model.library.font_size(), Some(model.font_size));

    let model = dispatch(model, Message::SetTheme(Theme::Dark));
    assert_eq!(model.library.theme(), Some(Theme::Dark));
}

#[test]
fn test_reopened_book_restores_position() {
    let model = dispatch(create_long_test_model(), Message::ScrollDown(20));
    let library = model.library;

    let mut model = Model::new(library, (80, 24));
    model.open_saved_book("novel").unwrap();
    assert_eq!(model.viewport.offset(), 20);
}

#[test]
fn test_initial_model_reopens_last_book() {
    let mut library = Library::in_memory();
    library.save_book(&BookRecord::new("novel", long_book())).unwrap();
    library.set_last_book("novel").unwrap();

    let mut app = App::new(library).with_toc_visible(true);
    let model = app.initial_model((80, 24));
    assert_eq!(model.title(), "novel");
    assert_eq!(model.panel, Some(Panel::Toc));
    assert_eq!(model.toc_selected, Some(0));
}

#[test]
fn test_initial_model_ignores_stale_last_book() {
    let mut library = Library::in_memory();
    library.set_last_book("gone").unwrap();

    let mut app = App::new(library).with_toc_visible(true);
    let model = app.initial_model((80, 24));
    assert!(!model.has_book());
    assert_eq!(model.placeholder, Placeholder::Welcome);
    assert!(model.panel.is_none());
}

#[test]
fn test_initial_model_reports_missing_file() {
    let dir = tempdir().unwrap();
    let mut app = App::new(Library::in_memory())
        .with_file(Some(dir.path().join("missing.html")))
        .with_theme(Theme::Sepia)
        .with_font_size(FontSize::LARGEST);
    let model = app.initial_model((80, 24));
    assert!(matches!(model.placeholder, Placeholder::Error(_)));
    assert_eq!(model.theme, Theme::Sepia);
    assert_eq!(model.font_size, FontSize::LARGEST);
}

#[test]
fn test_key_mapping_while_reading() {
    let model = create_long_test_model();
    assert_eq!(
        App::handle_key(key(KeyCode::Char('j')), &model),
        Some(Message::ScrollDown(1))
    );
    // Already at the top.
    assert_eq!(App::handle_key(key(KeyCode::Char('k')), &model), None);
    assert_eq!(
        App::handle_key(key(KeyCode::Right), &model),
        Some(Message::NextPage)
    );
    assert_eq!(App::handle_key(key(KeyCode::Left), &model), None);
    assert_eq!(
        App::handle_key(key(KeyCode::Char('t')), &model),
        Some(Message::ToggleToc)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('/')), &model),
        Some(Message::StartTocSearch)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('o')), &model),
        Some(Message::StartOpenPrompt)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('+')), &model),
        Some(Message::IncreaseFontSize)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('q')), &model),
        Some(Message::Quit)
    );
}

#[test]
fn test_scroll_keys_ignored_for_short_book() {
    let model = model_with_book(SHORT_BOOK);
    assert_eq!(App::handle_key(key(KeyCode::Char('j')), &model), None);
    assert_eq!(App::handle_key(key(KeyCode::Right), &model), None);
}

#[test]
fn test_ctrl_c_quits_from_any_mode() {
    let ctrl_c = event::KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    let model = update(Model::default(), Message::StartOpenPrompt);
    assert_eq!(App::handle_key(ctrl_c, &model), Some(Message::Quit));
}

#[test]
fn test_open_prompt_keys() {
    let mut model = update(Model::default(), Message::StartOpenPrompt);
    assert_eq!(
        App::handle_key(key(KeyCode::Enter), &model),
        Some(Message::CancelOpenPrompt)
    );

    model = update(model, Message::OpenPromptInput("book.htm".to_string()));
    assert_eq!(
        App::handle_key(key(KeyCode::Char('l')), &model),
        Some(Message::OpenPromptInput("book.html".to_string()))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Backspace), &model),
        Some(Message::OpenPromptInput("book.ht".to_string()))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Enter), &model),
        Some(Message::OpenFile(PathBuf::from("book.htm")))
    );
    // Panel shortcuts are typed into the prompt.
    assert_eq!(
        App::handle_key(key(KeyCode::Char('q')), &model),
        Some(Message::OpenPromptInput("book.htmq".to_string()))
    );
}

#[test]
fn test_toc_search_keys_edit_query() {
    let mut model = update(create_long_test_model(), Message::StartTocSearch);
    model = update(model, Message::TocSearchInput("ch".to_string()));
    assert_eq!(
        App::handle_key(key(KeyCode::Char('a')), &model),
        Some(Message::TocSearchInput("cha".to_string()))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Esc), &model),
        Some(Message::ClearTocSearch)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Enter), &model),
        Some(Message::TocSelect)
    );
}

#[test]
fn test_panel_key_mapping() {
    let model = update(create_long_test_model(), Message::ToggleSettings);
    assert_eq!(
        App::handle_key(key(KeyCode::Right), &model),
        Some(Message::SettingsNext)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Esc), &model),
        Some(Message::ClosePanel)
    );

    let model = update(model, Message::ToggleHelp);
    assert_eq!(
        App::handle_key(key(KeyCode::Char('j')), &model),
        Some(Message::HelpScrollDown)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('x')), &model),
        Some(Message::ClosePanel)
    );

    let model = dispatch(model, Message::ToggleLibrary);
    assert_eq!(
        App::handle_key(key(KeyCode::Enter), &model),
        Some(Message::OpenBook("novel".to_string()))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('d')), &model),
        Some(Message::DeleteBook("novel".to_string()))
    );
}

#[test]
fn test_mouse_drag_in_reading_pane_starts_swipe() {
    let model = create_long_test_model();
    let msg = App::handle_mouse(
        mouse(MouseEventKind::Down(MouseButton::Left), 40, 10),
        &model,
    );
    assert_eq!(msg, Some(Message::SwipeStart(Point::from_cell(40, 10))));

    // Title bar is outside the reading pane.
    let msg = App::handle_mouse(
        mouse(MouseEventKind::Down(MouseButton::Left), 40, 0),
        &model,
    );
    assert_eq!(msg, None);

    let model = update(model, Message::SwipeStart(Point::from_cell(40, 10)));
    let msg = App::handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 5, 10), &model);
    assert_eq!(msg, Some(Message::SwipeEnd(Point::from_cell(5, 10))));
}

#[test]
fn test_mouse_wheel_scrolls_document() {
    let model = create_long_test_model();
    assert_eq!(
        App::handle_mouse(mouse(MouseEventKind::ScrollDown, 40, 10), &model),
        Some(Message::ScrollDown(3))
    );
}

#[test]
fn test_click_on_toc_entry() {
    let model = update(create_long_test_model(), Message::ToggleToc);
    let panel = crate::ui::toc_panel_rect(crate::ui::document_area(Rect::new(0, 0, 80, 24)));
    let row = crate::ui::toc_list_top(panel, false) + 1;

    let msg = App::handle_mouse(
        mouse(MouseEventKind::Up(MouseButton::Left), panel.x + 2, row),
        &model,
    );
    assert_eq!(msg, Some(Message::TocClick(1)));

    let outside = panel.x + panel.width + 5;
    let msg = App::handle_mouse(
        mouse(MouseEventKind::Up(MouseButton::Left), outside, row),
        &model,
    );
    assert_eq!(msg, Some(Message::ClosePanel));
}

#[test]
fn test_click_outside_settings_closes_it() {
    let model = update(create_long_test_model(), Message::ToggleSettings);
    let msg = App::handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 1, 5), &model);
    assert_eq!(msg, Some(Message::ClosePanel));

    let msg = App::handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 78, 3), &model);
    assert_eq!(msg, None);
}

#[test]
fn test_resize_debouncer_waits_for_quiet_period() {
    let mut debouncer = ResizeDebouncer::new(100);
    debouncer.queue(100, 40, 0);
    assert!(debouncer.is_pending());
    assert_eq!(debouncer.take_ready(50), None);

    debouncer.queue(120, 50, 60);
    assert_eq!(debouncer.take_ready(120), None);
    assert_eq!(debouncer.take_ready(160), Some((120, 50)));
    assert!(!debouncer.is_pending());
}

#[test]
fn test_resize_event_is_debounced() {
    let model = Model::default();
    let mut debouncer = ResizeDebouncer::new(100);
    let msg = App::handle_event(&event::Event::Resize(90, 30), &model, 0, &mut debouncer);
    assert_eq!(msg, None);
    assert!(debouncer.is_pending());
}

#[test]
fn test_toast_expires() {
    let mut model = Model::default();
    model.show_toast(ToastLevel::Warning, "Could not save");
    assert!(!model.expire_toast(Instant::now()));
    assert_eq!(
        model.active_toast(),
        Some(("Could not save", ToastLevel::Warning))
    );

    assert!(model.expire_toast(Instant::now() + Duration::from_secs(5)));
    assert!(model.active_toast().is_none());
}

#[test]
fn test_closest_heading_to_line() {
    let heading = |line| Heading {
        id: format!("toc-heading-{line}"),
        text: format!("{line}. H"),
        position: line,
        level: 1,
        line,
    };
    let headings = vec![heading(10), heading(20), heading(40)];

    assert_eq!(closest_heading_to_line(&[], 5), None);
    assert_eq!(closest_heading_to_line(&headings, 0), Some(0));
    assert_eq!(closest_heading_to_line(&headings, 14), Some(0));
    assert_eq!(closest_heading_to_line(&headings, 15), Some(0));
    assert_eq!(closest_heading_to_line(&headings, 16), Some(1));
    assert_eq!(closest_heading_to_line(&headings, 99), Some(2));
}

#[test]
fn test_view_renders_into_terminal() {
    let model = create_long_test_model();
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal.draw(|frame| App::view(&model, frame)).unwrap();
    let buffer = terminal.backend().buffer();
    let title: String = (0..80).map(|col| buffer[(col, 0)].symbol()).collect();
    assert!(title.contains("novel"));
}
