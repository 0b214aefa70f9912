//! Layout of blocks into display lines.
//!
//! Text is word-wrapped to the wrap width. Image placeholders, preformatted
//! lines and tables are kept within the width: nothing is ever wider than
//! the pane, so the reader never scrolls sideways.

use std::collections::HashMap;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{Block, BlockKind, LineType, RenderedLine};
use crate::toc::Heading;

const LIST_BULLET: &str = "• ";
const LIST_INDENT: &str = "  ";
const COLUMN_SEPARATOR: &str = " │ ";

/// Display lines plus the first line of every block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub lines: Vec<RenderedLine>,
    pub block_lines: Vec<usize>,
}

/// Lay out `blocks` at `width` columns.
///
/// Blocks matched as TOC headings are styled with their heading level.
pub fn layout_blocks(blocks: &[Block], headings: &[Heading], width: u16) -> Layout {
    let width = usize::from(width.max(1));
    let heading_levels: HashMap<usize, u8> =
        headings.iter().map(|h| (h.position, h.level)).collect();

    let mut layout = Layout {
        lines: Vec::new(),
        block_lines: Vec::with_capacity(blocks.len()),
    };
    let mut previous: Option<&BlockKind> = None;

    for block in blocks {
        let tight_list =
            matches!(previous, Some(BlockKind::ListItem)) && block.kind == BlockKind::ListItem;
        if previous.is_some() && !tight_list {
            layout.lines.push(RenderedLine::blank());
        }
        layout.block_lines.push(layout.lines.len());

        match &block.kind {
            BlockKind::Text => {
                let line_type = heading_levels
                    .get(&block.position)
                    .map_or_else(|| line_type_for_tag(&block.hint.tag), |level| {
                        LineType::Heading(*level)
                    });
                for source_line in block.text.split('\n') {
                    for wrapped in wrap_text(source_line, width) {
                        layout.lines.push(RenderedLine::new(wrapped, line_type));
                    }
                }
            }
            BlockKind::ListItem => {
                let line_type = heading_levels
                    .get(&block.position)
                    .map_or(LineType::ListItem, |level| LineType::Heading(*level));
                let inner = width.saturating_sub(LIST_BULLET.width()).max(1);
                let mut first = true;
                for source_line in block.text.split('\n') {
                    for wrapped in wrap_text(source_line, inner) {
                        let prefix = if first { LIST_BULLET } else { LIST_INDENT };
                        first = false;
                        layout
                            .lines
                            .push(RenderedLine::new(format!("{prefix}{wrapped}"), line_type));
                    }
                }
            }
            BlockKind::Preformatted => {
                let line_type = heading_levels
                    .get(&block.position)
                    .map_or(LineType::Preformatted, |level| LineType::Heading(*level));
                for source_line in block.text.split('\n') {
                    let expanded = source_line.replace('\t', "    ");
                    layout
                        .lines
                        .push(RenderedLine::new(truncate_to_width(&expanded, width), line_type));
                }
            }
            BlockKind::Image { alt, .. } => {
                let label = if alt.is_empty() {
                    "[image]".to_string()
                } else {
                    format!("[image: {alt}]")
                };
                layout.lines.push(RenderedLine::new(
                    truncate_to_width(&label, width),
                    LineType::Image,
                ));
            }
            BlockKind::Table { rows } => {
                for row in layout_table(rows, width) {
                    layout.lines.push(RenderedLine::new(row, LineType::Table));
                }
            }
            BlockKind::Rule => {
                layout
                    .lines
                    .push(RenderedLine::new("─".repeat(width), LineType::Rule));
            }
        }
        previous = Some(&block.kind);
    }

    layout
}

fn line_type_for_tag(tag: &str) -> LineType {
    match tag {
        "h1" => LineType::Heading(1),
        "h2" => LineType::Heading(2),
        "h3" | "h4" | "h5" | "h6" => LineType::Heading(3),
        _ => LineType::Body,
    }
}

/// Greedy word wrap by display width. Words wider than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let word_width = word.width();
        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + 1 + word_width
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }
        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cut `text` to `width` columns, marking the cut with an ellipsis.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width - 1 {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    out
}

/// Render table rows so the full row fits in `width`.
///
/// Columns keep their natural width when everything fits. Otherwise each
/// column is shrunk in proportion to its natural width and cells are
/// truncated.
fn layout_table(rows: &[Vec<String>], width: usize) -> Vec<String> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return Vec::new();
    }
    let mut natural = vec![0usize; columns];
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            natural[idx] = natural[idx].max(cell.width());
        }
    }
    let separators = COLUMN_SEPARATOR.width() * (columns - 1);
    let available = width.saturating_sub(separators).max(columns);
    let total: usize = natural.iter().sum();
    let widths: Vec<usize> = if total <= available {
        natural
    } else {
        natural
            .iter()
            .map(|w| (w * available / total.max(1)).max(1))
            .collect()
    };

    rows.iter()
        .map(|row| {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(idx, col_width)| {
                    let cell = row.get(idx).map_or("", String::as_str);
                    let cut = truncate_to_width(cell, *col_width);
                    let pad = col_width.saturating_sub(cut.width());
                    format!("{cut}{}", " ".repeat(pad))
                })
                .collect();
            truncate_to_width(cells.join(COLUMN_SEPARATOR).trim_end(), width)
        })
        .collect()
}
