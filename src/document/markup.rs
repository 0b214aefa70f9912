//! Block extraction from HTML markup.
//!
//! The markup is parsed with `scraper` and flattened into a document-ordered
//! sequence of [`Block`]s. Inline elements contribute text to the block of
//! their nearest block-level ancestor. Images, tables, rules and
//! preformatted text become blocks of their own. Blocks whose text is empty
//! after whitespace normalization are pruned.

use scraper::node::Node;
use scraper::{ElementRef, Html};

use super::types::{Block, BlockKind, StructuralHint};

/// Elements whose content is never displayed.
const SKIPPED_TAGS: &[&str] = &[
    "head", "script", "style", "title", "noscript", "template", "meta", "link", "iframe",
    "object",
];

/// Elements that start a new block.
const BLOCK_TAGS: &[&str] = &[
    "html", "body", "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "dl",
    "dt", "dd", "blockquote", "section", "article", "header", "footer", "nav", "aside", "main",
    "figure", "figcaption", "address", "center", "form", "fieldset", "caption", "details",
    "summary",
];

/// Whether `source` looks like markup rather than plain text.
pub fn looks_like_markup(source: &str) -> bool {
    source.as_bytes().windows(2).any(|pair| {
        pair[0] == b'<' && (pair[1].is_ascii_alphabetic() || pair[1] == b'!' || pair[1] == b'/')
    })
}

/// Extract blocks from a document, choosing markup or plain-text handling.
pub fn extract_blocks(source: &str) -> Vec<Block> {
    if looks_like_markup(source) {
        extract_markup_blocks(source)
    } else {
        extract_plain_text_blocks(source)
    }
}

/// Each non-blank line of a plain-text document is one block.
pub fn extract_plain_text_blocks(source: &str) -> Vec<Block> {
    source
        .lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(position, text)| Block {
            position,
            hint: StructuralHint::plain_text(),
            kind: BlockKind::Text,
            text,
        })
        .collect()
}

/// Parse HTML and flatten it into blocks.
pub fn extract_markup_blocks(source: &str) -> Vec<Block> {
    let html = Html::parse_document(source);
    let mut extractor = Extractor::default();
    let root = html.root_element();
    let hint = hint_for(root);
    extractor.visit(root, &hint);
    extractor.flush(&hint);
    tracing::debug!(
        blocks = extractor.blocks.len(),
        pruned = extractor.pruned,
        "extracted markup blocks"
    );
    extractor.blocks
}

#[derive(Debug, Default)]
struct Extractor {
    blocks: Vec<Block>,
    /// Pending inline text for the current block; `\n` marks a `<br>`
    inline: String,
    /// Empty text blocks dropped so far
    pruned: usize,
}

impl Extractor {
    fn visit(&mut self, element: ElementRef<'_>, hint: &StructuralHint) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.push_text(text),
                Node::Element(_) => {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        self.visit_element(child_el, hint);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_element(&mut self, element: ElementRef<'_>, parent_hint: &StructuralHint) {
        let name = element.value().name();
        if SKIPPED_TAGS.contains(&name) {
            return;
        }
        match name {
            "br" => self.inline.push('\n'),
            "img" => {
                self.flush(parent_hint);
                let alt = element.value().attr("alt").unwrap_or_default();
                let src = element.value().attr("src").unwrap_or_default();
                self.push_block(
                    hint_for(element),
                    BlockKind::Image {
                        alt: collapse_whitespace(alt),
                        src: src.trim().to_string(),
                    },
                    collapse_whitespace(alt),
                );
            }
            "hr" => {
                self.flush(parent_hint);
                self.push_block(hint_for(element), BlockKind::Rule, String::new());
            }
            "table" => {
                self.flush(parent_hint);
                let rows = table_rows(element);
                if rows.iter().all(|row| row.iter().all(String::is_empty)) {
                    self.pruned += 1;
                    return;
                }
                let text = rows
                    .iter()
                    .map(|row| row.join(" "))
                    .collect::<Vec<_>>()
                    .join("\n");
                self.push_block(hint_for(element), BlockKind::Table { rows }, text);
            }
            "pre" => {
                self.flush(parent_hint);
                let raw: String = element.text().collect();
                let text = raw.trim_matches('\n').trim_end().to_string();
                if text.trim().is_empty() {
                    self.pruned += 1;
                    return;
                }
                self.push_block(hint_for(element), BlockKind::Preformatted, text);
            }
            _ if BLOCK_TAGS.contains(&name) => {
                self.flush(parent_hint);
                let hint = hint_for(element);
                self.visit(element, &hint);
                self.flush(&hint);
            }
            // Inline element: its text belongs to the enclosing block.
            _ => self.visit(element, parent_hint),
        }
    }

    fn push_text(&mut self, text: &str) {
        // Source newlines are ordinary whitespace; only <br> breaks a line.
        self.inline
            .extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
    }

    /// Turn pending inline text into a block owned by `hint`.
    fn flush(&mut self, hint: &StructuralHint) {
        if self.inline.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.inline);
        let lines: Vec<String> = pending.split('\n').map(collapse_whitespace).collect();
        let first = lines.iter().position(|line| !line.is_empty());
        let last = lines.iter().rposition(|line| !line.is_empty());
        let (Some(first), Some(last)) = (first, last) else {
            self.pruned += 1;
            return;
        };
        let text = lines[first..=last].join("\n");
        let kind = if hint.tag == "li" {
            BlockKind::ListItem
        } else {
            BlockKind::Text
        };
        self.push_block(hint.clone(), kind, text);
    }

    fn push_block(&mut self, hint: StructuralHint, kind: BlockKind, text: String) {
        let position = self.blocks.len();
        self.blocks.push(Block {
            position,
            hint,
            kind,
            text,
        });
    }
}

fn hint_for(element: ElementRef<'_>) -> StructuralHint {
    StructuralHint::new(
        element.value().name().to_ascii_lowercase(),
        element.value().attr("class").unwrap_or_default(),
    )
}

fn table_rows(table: ElementRef<'_>) -> Vec<Vec<String>> {
    table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                .map(|cell| collapse_whitespace(&cell.text().collect::<String>()))
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect()
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
