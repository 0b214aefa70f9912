use std::ops::Range;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::{Model, Panel, SettingsRow};

use super::TOC_WIDTH_PERCENT;
use super::style::Palette;

const TOC_MIN_WIDTH: u16 = 24;
const TOC_MAX_WIDTH: u16 = 60;
const SETTINGS_WIDTH: u16 = 34;
const SETTINGS_HEIGHT: u16 = 7;
const LIBRARY_MAX_WIDTH: u16 = 64;

/// The TOC panel: a left overlay over the full reading pane.
pub fn toc_panel_rect(area: Rect) -> Rect {
    let share = u32::from(area.width) * u32::from(TOC_WIDTH_PERCENT) / 100;
    let width = u16::try_from(share)
        .unwrap_or(u16::MAX)
        .clamp(TOC_MIN_WIDTH, TOC_MAX_WIDTH)
        .min(area.width);
    Rect { width, ..area }
}

/// First row of TOC entries inside the panel.
pub const fn toc_list_top(panel: Rect, searching: bool) -> u16 {
    panel.y + 1 + if searching { 1 } else { 0 }
}

/// Screen rectangle of `panel` over the reading pane `area`.
pub fn panel_rect(panel: Panel, area: Rect, model: &Model) -> Rect {
    match panel {
        Panel::Toc => toc_panel_rect(area),
        Panel::Settings => settings_panel_rect(area),
        Panel::Library => library_panel_rect(area, model.library_entries.len()),
        Panel::Help => help_panel_rect(area),
    }
}

fn settings_panel_rect(area: Rect) -> Rect {
    let width = SETTINGS_WIDTH.min(area.width);
    let height = SETTINGS_HEIGHT.min(area.height);
    Rect::new(area.x + area.width - width, area.y, width, height)
}

fn library_panel_rect(area: Rect, entries: usize) -> Rect {
    let width = area.width.saturating_sub(4).min(LIBRARY_MAX_WIDTH);
    // Borders, padding rows, and the footer hint.
    let rows = u16::try_from(entries.max(1)).unwrap_or(u16::MAX);
    let height = rows.saturating_add(5);
    centered_popup_rect(width, height, area)
}

fn help_panel_rect(area: Rect) -> Rect {
    let width = area.width.saturating_sub(8).max(48);
    let height = area.height.max(12);
    centered_popup_rect(width, height, area)
}

pub fn render_toc_panel(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let panel = toc_panel_rect(area);
    let block = Block::default()
        .title(" Contents ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(palette.panel());
    frame.render_widget(Clear, panel);
    frame.render_widget(block, panel);

    let inner_width = panel.width.saturating_sub(2);
    let searching = model.toc_query.is_some();
    if let Some(query) = model.toc_query.as_deref() {
        let search_area = Rect::new(panel.x + 1, panel.y + 1, inner_width, 1);
        let input = Line::from(vec![
            Span::styled("Search: ", palette.muted()),
            Span::raw(format!("{query}\u{2502}")),
        ]);
        frame.render_widget(Paragraph::new(input), search_area);
    }

    let top = toc_list_top(panel, searching);
    let rows = super::toc_list_rows(panel.height, searching);
    let list_area = Rect::new(
        panel.x + 1,
        top,
        inner_width,
        u16::try_from(rows).unwrap_or(u16::MAX),
    );

    let headings = model.document.headings();
    let entries = model.toc_entries();
    if entries.is_empty() {
        let message = if headings.is_empty() {
            "No table of contents found in this book"
        } else {
            "No results"
        };
        frame.render_widget(
            Paragraph::new(Line::styled(message, palette.muted())),
            list_area,
        );
        return;
    }

    let start = model
        .toc_scroll_offset
        .min(entries.len().saturating_sub(rows));
    let heading_styles = |level: u8| palette.panel().patch(palette.heading(level));
    let lines: Vec<Line> = entries
        .iter()
        .enumerate()
        .skip(start)
        .take(rows)
        .filter_map(|(i, entry)| {
            let heading = headings.get(entry.index)?;
            let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
            let selected = model.toc_selected == Some(i);
            let marker = if selected { ">" } else { " " };
            let mut base = if heading.level == 1 {
                heading_styles(1).remove_modifier(Modifier::UNDERLINED)
            } else {
                palette.panel()
            };
            if selected {
                base = base.add_modifier(Modifier::REVERSED);
            }
            let mut spans = vec![Span::styled(format!("{marker}{indent} "), base)];
            spans.extend(highlighted_spans(
                &heading.text,
                &entry.highlights,
                base,
                palette.search_match(),
            ));
            Some(Line::from(spans))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), list_area);
}

/// Split `text` into spans, styling each range in `highlights` as a match.
fn highlighted_spans(
    text: &str,
    highlights: &[Range<usize>],
    base: Style,
    hit: Style,
) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut cursor = 0;
    for range in highlights {
        if let Some(before) = text.get(cursor..range.start)
            && !before.is_empty()
        {
            spans.push(Span::styled(before.to_string(), base));
        }
        if let Some(matched) = text.get(range.clone()) {
            spans.push(Span::styled(matched.to_string(), hit));
        }
        cursor = range.end;
    }
    if let Some(rest) = text.get(cursor..)
        && !rest.is_empty()
    {
        spans.push(Span::styled(rest.to_string(), base));
    }
    spans
}

pub fn render_settings_panel(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let panel = settings_panel_rect(area);
    let block = Block::default()
        .title(" Settings ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .padding(Padding::horizontal(1))
        .style(palette.panel());

    let row = |label: &str, value: String, which: SettingsRow| {
        let style = if model.settings_row == which {
            palette.panel().add_modifier(Modifier::REVERSED)
        } else {
            palette.panel()
        };
        Line::styled(format!("{label:<10} \u{2039} {value} \u{203a}"), style)
    };
    let lines = vec![
        row("Theme", model.theme.to_string(), SettingsRow::Theme),
        row("Font size", model.font_size.to_string(), SettingsRow::FontSize),
        Line::raw(""),
        Line::styled("\u{2191}/\u{2193} select  \u{2190}/\u{2192} change", palette.muted()),
        Line::styled("Esc closes", palette.muted()),
    ];

    frame.render_widget(Clear, panel);
    frame.render_widget(Paragraph::new(lines).block(block), panel);
}

pub fn render_library_panel(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let panel = library_panel_rect(area, model.library_entries.len());
    let block = Block::default()
        .title(" Library ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .padding(Padding::new(1, 1, 1, 0))
        .style(palette.panel());

    let now = crate::store::now_millis();
    let inner_width = usize::from(panel.width.saturating_sub(4));
    let mut lines: Vec<Line> = if model.library_entries.is_empty() {
        vec![Line::styled(
            "No saved books yet. Press o to open a file.",
            palette.muted(),
        )]
    } else {
        let rows = usize::from(panel.height.saturating_sub(5)).max(1);
        let start = (model.library_selected + 1).saturating_sub(rows);
        model
            .library_entries
            .iter()
            .enumerate()
            .skip(start)
            .take(rows)
            .map(|(i, entry)| {
                let read_at = entry.last_read.unwrap_or(entry.timestamp);
                let age = format!("read {}", format_age(now.saturating_sub(read_at)));
                let name_width = inner_width.saturating_sub(age.len() + 1);
                let name = crate::document::truncate_to_width(&entry.name, name_width);
                let text = format!("{name:<name_width$} {age}");
                let style = if i == model.library_selected {
                    palette.panel().add_modifier(Modifier::REVERSED)
                } else {
                    palette.panel()
                };
                Line::styled(text, style)
            })
            .collect()
    };
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Enter open  d delete  o open file  Esc close",
        palette.muted(),
    ));

    frame.render_widget(Clear, panel);
    frame.render_widget(Paragraph::new(lines).block(block), panel);
}

/// Coarse, human-readable age for `elapsed_ms`.
pub fn format_age(elapsed_ms: u64) -> String {
    let minutes = elapsed_ms / 60_000;
    match minutes {
        0 => "just now".to_string(),
        1..=59 => format!("{minutes}m ago"),
        60..=1439 => format!("{}h ago", minutes / 60),
        _ => format!("{}d ago", minutes / 1440),
    }
}

pub fn render_help_panel(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let popup = help_panel_rect(area);

    let path_or = |path: Option<&std::path::PathBuf>, missing: &str| {
        path.map_or_else(|| missing.to_string(), |p| p.display().to_string())
    };
    let global_cfg = path_or(model.config_global_path.as_ref(), "<unknown>");
    let local_cfg = path_or(model.config_local_path.as_ref(), "<none>");
    let store = path_or(model.store_path.as_ref(), "<in memory>");

    let section_style = palette.panel().patch(palette.heading(2));

    let all_lines = vec![
        Line::styled("Reading", section_style),
        Line::raw("  j/k or Up/Down      Scroll"),
        Line::raw("  Space/PageDown      Screen down"),
        Line::raw("  b/PageUp            Screen up"),
        Line::raw("  Left/Right, swipe   Previous / next page"),
        Line::raw("  g / G               Top / bottom"),
        Line::raw(""),
        Line::styled("Panels", section_style),
        Line::raw("  t                   Table of contents"),
        Line::raw("  /                   Search the contents"),
        Line::raw("  s                   Settings"),
        Line::raw("  L                   Library"),
        Line::raw("  o                   Open a file"),
        Line::raw("  Esc, click outside  Close panel"),
        Line::raw(""),
        Line::styled("Display", section_style),
        Line::raw("  + / -               Font size"),
        Line::raw("  T                   Cycle theme"),
        Line::raw(""),
        Line::styled("Other", section_style),
        Line::raw("  q / Ctrl-c          Quit"),
        Line::raw("  ? / F1              Toggle help"),
        Line::raw(""),
        Line::styled("Files", section_style),
        Line::raw(format!("  Global config: {global_cfg}")),
        Line::raw(format!("  Local override: {local_cfg}")),
        Line::raw(format!("  Store: {store}")),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .style(palette.panel());

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + one column of padding on each side.
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 1,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(2),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height_u16 = inner.height.saturating_sub(1);
    let content_height = usize::from(content_height_u16);
    let max_scroll = all_lines.len().saturating_sub(content_height);
    let scroll = model.help_scroll.min(max_scroll);
    let end = (scroll + content_height).min(all_lines.len());

    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height_u16);
    frame.render_widget(Paragraph::new(all_lines[scroll..end].to_vec()), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height_u16, inner.width, 1);
    let footer = Line::styled("j/k scroll \u{2502} any other key closes", palette.muted());
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
