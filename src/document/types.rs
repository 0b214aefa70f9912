//! Core document types.

use crate::toc::Heading;

/// Tag and class attribute of the element a block came from.
///
/// This is all the TOC builder knows about markup structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuralHint {
    /// Lowercase tag name (`"p"`, `"h1"`), or `"#text"` for plain text lines
    pub tag: String,
    /// Raw `class` attribute value
    pub class: String,
}

impl StructuralHint {
    pub fn new(tag: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: class.into(),
        }
    }

    /// Hint for a line of a plain-text document.
    pub fn plain_text() -> Self {
        Self::new("#text", "")
    }

    /// Whether the class list contains `class` as a whole word.
    pub fn has_class(&self, class: &str) -> bool {
        self.class.split_whitespace().any(|c| c == class)
    }

    /// Whether the raw class attribute contains `needle` anywhere.
    pub fn class_contains(&self, needle: &str) -> bool {
        self.class.contains(needle)
    }
}

/// What a block holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// Flowing text; lines inside are explicit breaks
    Text,
    /// List item text
    ListItem,
    /// Whitespace-preserving text
    Preformatted,
    /// Image reference; shown as a sized placeholder
    Image { alt: String, src: String },
    /// Table cells by row
    Table { rows: Vec<Vec<String>> },
    /// Horizontal rule
    Rule,
}

/// One rendered unit of content, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Index of this block in the document's block sequence
    pub position: usize,
    pub hint: StructuralHint,
    pub kind: BlockKind,
    /// Whitespace-normalized text (alt text for images, empty for rules)
    pub text: String,
}

impl Block {
    /// Whether the heading scan should look at this block's text.
    pub const fn is_scannable(&self) -> bool {
        matches!(
            self.kind,
            BlockKind::Text | BlockKind::ListItem | BlockKind::Preformatted
        )
    }
}

/// Visual role of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Body,
    /// Heading line, level 1-3
    Heading(u8),
    ListItem,
    Preformatted,
    Image,
    Table,
    Rule,
    Blank,
}

/// A single display line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    content: String,
    line_type: LineType,
}

impl RenderedLine {
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self { content, line_type }
    }

    pub const fn blank() -> Self {
        Self::new(String::new(), LineType::Blank)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn line_type(&self) -> &LineType {
        &self.line_type
    }
}

/// A loaded book: its blocks, outline, and current layout.
#[derive(Debug, Clone)]
pub struct Document {
    blocks: Vec<Block>,
    headings: Vec<Heading>,
    lines: Vec<RenderedLine>,
    layout_width: u16,
}

impl Document {
    /// Create an empty document.
    pub const fn empty() -> Self {
        Self {
            blocks: Vec::new(),
            headings: Vec::new(),
            lines: Vec::new(),
            layout_width: 0,
        }
    }

    pub(crate) const fn from_parts(blocks: Vec<Block>, headings: Vec<Heading>) -> Self {
        Self {
            blocks,
            headings,
            lines: Vec::new(),
            layout_width: 0,
        }
    }

    /// Lay the blocks out again at a new wrap width.
    ///
    /// Heading line numbers are refreshed to match.
    pub fn relayout(&mut self, width: u16) {
        let layout = super::layout::layout_blocks(&self.blocks, &self.headings, width);
        for heading in &mut self.headings {
            heading.line = layout
                .block_lines
                .get(heading.position)
                .copied()
                .unwrap_or_default();
        }
        self.lines = layout.lines;
        self.layout_width = width;
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Table of contents entries, in document order.
    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_at(&self, index: usize) -> Option<&RenderedLine> {
        self.lines.get(index)
    }

    /// Lines starting at `offset`, at most `count` of them.
    pub fn visible_lines(&self, offset: usize, count: usize) -> &[RenderedLine] {
        let start = offset.min(self.lines.len());
        let end = offset.saturating_add(count).min(self.lines.len());
        &self.lines[start..end]
    }

    pub const fn layout_width(&self) -> u16 {
        self.layout_width
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}
