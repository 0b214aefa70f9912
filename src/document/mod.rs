//! Book loading and layout.
//!
//! This module handles:
//! - Reading a file and decoding it as Windows-1252 (a BOM wins)
//! - Extracting content blocks from the markup with scraper
//! - Building the table of contents for those blocks
//! - Wrapping blocks into display lines at the current width

mod layout;
mod markup;
mod types;

pub use layout::{Layout, layout_blocks, truncate_to_width, wrap_text};
pub use markup::{collapse_whitespace, extract_blocks, looks_like_markup};
pub use types::{Block, BlockKind, Document, LineType, RenderedLine, StructuralHint};

use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, WINDOWS_1252};
use thiserror::Error;

/// How far into a file to look for NUL bytes.
const BINARY_SNIFF_LEN: usize = 8192;

/// Failure to turn a file into a displayable book.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The content could not be turned into a view.
    #[error("could not process the book: {0}")]
    Process(String),
}

impl Document {
    /// Build a document from decoded source, laid out at `width` columns.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Process`] when the source holds binary data.
    ///
    /// # Example
    ///
    /// ```
    /// use bookreader::document::Document;
    ///
    /// let doc = Document::from_markup("<p>1. Intro</p><p>Hello</p>", 60).unwrap();
    /// assert_eq!(doc.headings().len(), 1);
    /// assert_eq!(doc.headings()[0].text, "1. Intro");
    /// ```
    pub fn from_markup(source: impl Into<String>, width: u16) -> Result<Self, LoadError> {
        let source = source.into();
        if source.contains('\0') {
            return Err(LoadError::Process("content is not text".to_string()));
        }
        let blocks = extract_blocks(&source);
        let headings = crate::toc::build_toc(&blocks);
        let mut document = Self::from_parts(blocks, headings);
        document.relayout(width);
        tracing::debug!(
            blocks = document.blocks().len(),
            headings = document.headings().len(),
            lines = document.line_count(),
            "built document"
        );
        Ok(document)
    }
}

/// Whether `bytes` look like binary data rather than text.
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_SNIFF_LEN).any(|b| *b == 0)
}

/// UTF-16 text is full of NUL bytes, so it skips the binary check.
fn has_utf16_bom(bytes: &[u8]) -> bool {
    Encoding::for_bom(bytes).is_some_and(|(encoding, _)| {
        encoding == UTF_16LE || encoding == UTF_16BE
    })
}

/// Decode file bytes as Windows-1252, honouring a UTF-8 or UTF-16 BOM.
pub fn decode_bytes(bytes: &[u8]) -> String {
    let (text, encoding, had_errors) = WINDOWS_1252.decode(bytes);
    if had_errors {
        tracing::debug!(encoding = encoding.name(), "replaced undecodable bytes");
    }
    text.into_owned()
}

/// Book name for a file: the file name without its extension.
pub fn book_name(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read and decode the file at `path`.
///
/// # Errors
///
/// Returns [`LoadError::Read`] if the file cannot be read and
/// [`LoadError::Process`] if it holds binary data.
pub fn read_source(path: &Path) -> Result<String, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if !has_utf16_bom(&bytes) && is_binary(&bytes) {
        return Err(LoadError::Process(format!(
            "{} is not a text document",
            path.display()
        )));
    }
    let source = decode_bytes(&bytes);
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read book");
    Ok(source)
}
