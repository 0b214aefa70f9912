use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};
use crate::pagination::PageState;

use super::style::Palette;

/// Cells in the footer progress bar.
const PROGRESS_BAR_WIDTH: usize = 20;

pub fn render_title_bar(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(format!(" {}", model.title()))
        .style(palette.bar().add_modifier(Modifier::BOLD));
    frame.render_widget(title, area);

    let prefs = Paragraph::new(format!("{}  {}x ", model.theme, model.font_size))
        .style(palette.bar())
        .alignment(Alignment::Right);
    frame.render_widget(prefs, area);
}

pub fn render_status_bar(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let bar = palette.bar();
    if !model.has_book() {
        let status = Paragraph::new(" No book open  o:open  L:library  ?:help").style(bar);
        frame.render_widget(status, area);
        return;
    }

    let pagination = &model.pagination;
    let enabled = bar.add_modifier(Modifier::BOLD);
    let disabled = bar.fg(palette.muted);
    let previous_style = match pagination.state() {
        PageState::AtFirstPage => disabled,
        PageState::AtOtherPage => enabled,
    };
    let next_style = if pagination.can_go_next() {
        enabled
    } else {
        disabled
    };

    let line = Line::from(vec![
        Span::styled(" \u{25c0} ", previous_style),
        Span::styled(page_label(model), bar),
        Span::styled(" \u{25b6}  ", next_style),
        Span::styled(progress_bar(pagination.progress()), bar.fg(palette.accent)),
        Span::styled(format!(" {:>3}%", pagination.progress_percent()), bar),
        Span::styled("  t:contents  s:settings  ?:help", bar.fg(palette.muted)),
    ]);
    frame.render_widget(Paragraph::new(line).style(bar), area);
}

/// `Page X/Y`, one-based.
pub(super) fn page_label(model: &Model) -> String {
    let total = model.pagination.total_pages();
    if total == 0 {
        return "Page -/-".to_string();
    }
    format!("Page {}/{}", model.pagination.current_page() + 1, total)
}

/// Text gauge for `progress` in `0.0..=1.0`.
pub(super) fn progress_bar(progress: f64) -> String {
    // Bounded by PROGRESS_BAR_WIDTH.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let filled = ((progress.clamp(0.0, 1.0) * PROGRESS_BAR_WIDTH as f64).round() as usize)
        .min(PROGRESS_BAR_WIDTH);
    format!(
        "{}{}",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

pub fn render_open_prompt(model: &Model, frame: &mut Frame, area: Rect) {
    let path = model.open_prompt.as_deref().unwrap_or_default();
    let text = format!("Open: {path}\u{2502}  Enter: load  Esc: cancel");
    let bar = Paragraph::new(text).style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_widget(bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
