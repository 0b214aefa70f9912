// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. store::StoreError)
    clippy::module_name_repetitions
)]

//! # BookReader
//!
//! A terminal reader for HTML books.
//!
//! BookReader lays a book out as scrolling text and adds:
//! - A table of contents generated from numbered headings ("1.", "1.2", ...)
//! - Page-based navigation by keyboard or mouse swipe
//! - Saved reading position per book, and a library of opened books
//! - Light, dark and sepia themes with an adjustable font size
//!
//! ## Architecture
//!
//! BookReader uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`document`]: Markup loading and line layout
//! - [`toc`]: Heading detection
//! - [`search`]: TOC filtering
//! - [`pagination`]: Page model over the scroll offset
//! - [`gesture`]: Swipe detection
//! - [`store`]: Persisted books and preferences
//! - [`settings`]: Theme and font size
//! - [`config`]: Flag files and default paths
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod config;
pub mod document;
pub mod gesture;
pub mod pagination;
pub mod search;
pub mod settings;
pub mod store;
pub mod toc;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::Document;
    pub use crate::store::{BookRecord, Library};
    pub use crate::toc::Heading;
    pub use crate::ui::viewport::Viewport;
}
