//! TOC search.
//!
//! A linear, case-insensitive substring filter over the outline. Every
//! occurrence of the query in a heading is reported as a byte range so the
//! panel can highlight it.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::toc::Heading;

/// A heading that matched the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocMatch {
    /// Index into the outline
    pub index: usize,
    /// Byte ranges of each occurrence in the heading text
    pub highlights: Vec<Range<usize>>,
}

/// Filter `headings` by `query`.
///
/// Returns `None` when the query is blank, meaning the full list applies.
pub fn filter_headings(headings: &[Heading], query: &str) -> Option<Vec<TocMatch>> {
    let pattern = query_pattern(query)?;
    let matches = headings
        .iter()
        .enumerate()
        .filter_map(|(index, heading)| {
            let highlights = highlight_ranges(&pattern, &heading.text);
            (!highlights.is_empty()).then_some(TocMatch { index, highlights })
        })
        .collect();
    Some(matches)
}

/// Case-insensitive literal pattern for a trimmed, non-blank `query`.
pub fn query_pattern(query: &str) -> Option<Regex> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .map_err(|err| tracing::warn!(%err, "unusable search query"))
        .ok()
}

/// Byte ranges of every occurrence of `pattern` in `text`.
pub fn highlight_ranges(pattern: &Regex, text: &str) -> Vec<Range<usize>> {
    pattern.find_iter(text).map(|m| m.range()).collect()
}
