//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Store writes and file loads run after `update`, in the side-effect step.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{LibraryEntry, Model, Panel, Placeholder, SettingsRow, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::settings::{FontSize, Theme};
use crate::store::Library;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    library: Library,
    toc_visible: bool,
    theme: Theme,
    font_size: FontSize,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
    store_path: Option<PathBuf>,
}

impl App {
    /// Create a new application over a book library.
    pub fn new(library: Library) -> Self {
        Self {
            file_path: None,
            library,
            toc_visible: false,
            theme: Theme::default(),
            font_size: FontSize::default(),
            config_global_path: None,
            config_local_path: None,
            store_path: None,
        }
    }

    /// Open this file on start instead of the last book.
    #[must_use]
    pub fn with_file(mut self, path: Option<PathBuf>) -> Self {
        self.file_path = path;
        self
    }

    /// Set initial TOC visibility.
    #[must_use]
    pub const fn with_toc_visible(mut self, visible: bool) -> Self {
        self.toc_visible = visible;
        self
    }

    #[must_use]
    pub const fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub const fn with_font_size(mut self, font_size: FontSize) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set config and store paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
        store_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self.store_path = store_path;
        self
    }
}

#[cfg(test)]
mod tests;
