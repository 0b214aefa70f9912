//! Table of contents generation.
//!
//! Books loaded from word-processor exports rarely carry real heading
//! elements, so the outline is inferred from numbered text: a block whose
//! text starts with `1.`, `1.1.` or `1.1.1.` followed by a title is a
//! heading at level 1, 2 or 3.
//!
//! Blocks styled like headings are scanned first, in priority order. If
//! that finds fewer than [`FALLBACK_THRESHOLD`] entries, every text block is
//! scanned. The outline never holds more than [`MAX_TOC_ENTRIES`] entries and
//! is always sorted by document position, whatever order the passes found
//! the entries in.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::document::{Block, StructuralHint};

/// Hard cap on outline length.
pub const MAX_TOC_ENTRIES: usize = 50;

/// Below this many priority matches, all blocks are scanned.
pub const FALLBACK_THRESHOLD: usize = 10;

/// Deepest heading level.
pub const MAX_HEADING_LEVEL: u8 = 3;

static HEADING_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^(\d{1,2})\.\s+(.+)").expect("valid level 1 heading pattern"),
        Regex::new(r"^(\d{1,2}\.\d{1,2})\.?\s+(.+)").expect("valid level 2 heading pattern"),
        Regex::new(r"^(\d{1,2}\.\d{1,2}\.\d{1,2})\.?\s+(.+)")
            .expect("valid level 3 heading pattern"),
    ]
});

/// One outline entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Stable id, `toc-heading-N` in discovery order
    pub id: String,
    /// Matched heading text (first line of the block)
    pub text: String,
    /// Position of the source block in the document
    pub position: usize,
    /// Level 1-3
    pub level: u8,
    /// First display line of the heading in the current layout
    pub line: usize,
}

/// A structural selector over block hints.
///
/// A tiny subset of CSS: enough to express the heading-like styles that
/// word processors emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintSelector {
    /// `h1`
    Tag(&'static str),
    /// `.A10`
    Class(&'static str),
    /// `p.A10`
    TagWithClass(&'static str, &'static str),
    /// `p[class*="A10"]`
    TagClassContains(&'static str, &'static str),
}

impl HintSelector {
    pub fn matches(self, hint: &StructuralHint) -> bool {
        match self {
            Self::Tag(tag) => hint.tag == tag,
            Self::Class(class) => hint.has_class(class),
            Self::TagWithClass(tag, class) => hint.tag == tag && hint.has_class(class),
            Self::TagClassContains(tag, needle) => hint.tag == tag && hint.class_contains(needle),
        }
    }
}

/// Selectors scanned before the full fallback pass, in order.
pub const PRIORITY_SELECTORS: [HintSelector; 8] = [
    HintSelector::TagWithClass("p", "A10"),
    HintSelector::Tag("h1"),
    HintSelector::Class("A10"),
    HintSelector::TagClassContains("p", "A10"),
    HintSelector::TagClassContains("p", "a1"),
    HintSelector::Tag("h2"),
    HintSelector::Tag("h3"),
    HintSelector::Class("MsoNormal"),
];

/// Match a numbered heading at the start of `text`.
///
/// Returns the matched text and its level.
pub fn match_heading(text: &str) -> Option<(String, u8)> {
    let text = text.trim();
    HEADING_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.captures(text)?;
        let prefix = caps.get(1)?.as_str();
        let components = prefix.split('.').count();
        let level = u8::try_from(components)
            .unwrap_or(MAX_HEADING_LEVEL)
            .min(MAX_HEADING_LEVEL);
        let matched = caps.get(0)?.as_str().trim_end();
        Some((matched.to_string(), level))
    })
}

/// Build the outline for a block sequence.
pub fn build_toc(blocks: &[Block]) -> Vec<Heading> {
    let mut builder = TocBuilder::default();

    'selectors: for selector in PRIORITY_SELECTORS {
        for block in blocks
            .iter()
            .filter(|b| b.is_scannable() && selector.matches(&b.hint))
        {
            if builder.is_full() {
                break 'selectors;
            }
            builder.consider(block);
        }
    }
    let priority_matches = builder.headings.len();

    if priority_matches < FALLBACK_THRESHOLD {
        for block in blocks.iter().filter(|b| b.is_scannable()) {
            if builder.is_full() {
                break;
            }
            builder.consider(block);
        }
    }

    let mut headings = builder.headings;
    headings.sort_by_key(|h| h.position);
    tracing::debug!(
        priority = priority_matches,
        total = headings.len(),
        "built table of contents"
    );
    headings
}

#[derive(Debug, Default)]
struct TocBuilder {
    headings: Vec<Heading>,
    taken: HashSet<usize>,
}

impl TocBuilder {
    fn is_full(&self) -> bool {
        self.headings.len() >= MAX_TOC_ENTRIES
    }

    fn consider(&mut self, block: &Block) {
        if self.taken.contains(&block.position) {
            return;
        }
        let Some((text, level)) = match_heading(&block.text) else {
            return;
        };
        self.taken.insert(block.position);
        self.headings.push(Heading {
            id: format!("toc-heading-{}", self.headings.len()),
            text,
            position: block.position,
            level,
            line: 0,
        });
    }
}
