use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::app::{Model, Panel, Placeholder};

use super::style::{Palette, style_for_line_type};
use super::{CHROME_ROWS, DOCUMENT_LEFT_PADDING, overlays, status};

/// The reading pane: everything between the title and status rows.
pub fn document_area(area: Rect) -> Rect {
    Rect {
        y: area.y.saturating_add(1),
        height: area.height.saturating_sub(CHROME_ROWS),
        ..area
    }
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let palette = Palette::for_theme(model.theme);
    frame.render_widget(Block::default().style(palette.base()), area);

    let title_area = Rect { height: 1, ..area };
    let doc_area = document_area(area);
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    status::render_title_bar(model, &palette, frame, title_area);

    if model.has_book() {
        render_document(model, &palette, frame, doc_area);
    } else {
        render_placeholder(&model.placeholder, &palette, frame, doc_area);
    }

    if model.open_prompt.is_some() {
        status::render_open_prompt(model, frame, status_area);
    } else {
        status::render_status_bar(model, &palette, frame, status_area);
    }

    match model.panel {
        Some(Panel::Toc) => overlays::render_toc_panel(model, &palette, frame, doc_area),
        Some(Panel::Settings) => overlays::render_settings_panel(model, &palette, frame, doc_area),
        Some(Panel::Library) => overlays::render_library_panel(model, &palette, frame, doc_area),
        Some(Panel::Help) => overlays::render_help_panel(model, &palette, frame, doc_area),
        None => {}
    }

    if model.active_toast().is_some() && doc_area.height > 0 {
        let toast_area = Rect {
            y: doc_area.y + doc_area.height - 1,
            height: 1,
            ..doc_area
        };
        status::render_toast_bar(model, frame, toast_area);
    }
}

fn render_document(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let padding = " ".repeat(usize::from(DOCUMENT_LEFT_PADDING));
    let lines: Vec<Line> = model
        .document
        .visible_lines(model.viewport.offset(), usize::from(area.height))
        .iter()
        .map(|line| {
            let style = style_for_line_type(line.line_type(), palette);
            Line::from(vec![
                Span::raw(padding.clone()),
                Span::styled(line.content().to_string(), style),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).style(palette.base()), area);
}

fn render_placeholder(placeholder: &Placeholder, palette: &Palette, frame: &mut Frame, area: Rect) {
    let title_style = palette.heading(1);
    let hint_style = palette.muted();
    let lines = match placeholder {
        Placeholder::Welcome => vec![
            Line::styled("BookReader", title_style),
            Line::raw(""),
            Line::raw("Open a book to start reading."),
            Line::raw(""),
            Line::styled("o: open a file   L: library   ?: help   q: quit", hint_style),
        ],
        Placeholder::Error(message) => vec![
            Line::styled("Could not open the book", title_style),
            Line::raw(""),
            Line::raw(message.clone()),
            Line::raw(""),
            Line::styled("Press o to choose another file", hint_style),
        ],
    };
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let top = area.y + area.height.saturating_sub(height) / 3;
    let text_area = Rect {
        y: top,
        height: area.height.saturating_sub(top - area.y),
        ..area
    };
    let paragraph = Paragraph::new(lines)
        .style(palette.base())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, text_area);
}
