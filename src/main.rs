//! BookReader - A terminal reader for HTML books.
//!
//! # Usage
//!
//! ```bash
//! bookreader novel.html
//! bookreader --toc --theme sepia novel.html
//! bookreader --list
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bookreader::app::App;
use bookreader::config::{
    ConfigFlags, clear_config_flags, data_store_path, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use bookreader::settings::{FontSize, Theme};
use bookreader::store::Library;

/// A terminal reader for HTML books
#[derive(Parser, Debug)]
#[command(name = "bookreader", version, about, long_about = None)]
struct Cli {
    /// Book to open; without one the last book is reopened
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Start with the table of contents open
    #[arg(long)]
    toc: bool,

    /// Color theme
    #[arg(long, value_enum)]
    theme: Option<Theme>,

    /// Font size multiplier (0.8 to 1.6)
    #[arg(long, value_name = "SIZE")]
    font_size: Option<FontSize>,

    /// Store file for saved books and preferences
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Print saved books and exit
    #[arg(long)]
    list: bool,

    /// Delete a saved book and exit
    #[arg(long, value_name = "NAME")]
    delete: Option<String>,

    /// Write debug logs to a file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// Send logs to `log_file`, or to stderr at WARN.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookreader=debug"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
                )
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn list_books(library: &Library) {
    let books = library.saved_books();
    if books.is_empty() {
        println!("No saved books.");
        return;
    }
    let last = library.last_book();
    for book in books {
        let marker = if last.as_deref() == Some(book.name.as_str()) {
            '*'
        } else {
            ' '
        };
        println!("{marker} {} (line {})", book.name, book.last_position);
    }
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;

    let store_path = effective.store.clone().unwrap_or_else(data_store_path);
    let mut library = Library::open(&store_path)
        .with_context(|| format!("Failed to open store {}", store_path.display()))?;

    if cli.list {
        list_books(&library);
        return Ok(());
    }
    if let Some(name) = &cli.delete {
        if !library.delete_book(name)? {
            anyhow::bail!("No saved book named {name}");
        }
        println!("Deleted {name}");
        return Ok(());
    }

    let theme = effective.theme.or_else(|| library.theme()).unwrap_or_default();
    let font_size = effective
        .font_size
        .or_else(|| library.font_size())
        .unwrap_or_default();

    let mut app = App::new(library)
        .with_file(cli.file)
        .with_toc_visible(effective.toc)
        .with_theme(theme)
        .with_font_size(font_size)
        .with_config_paths(
            Some(global_path),
            local_path.exists().then_some(local_path),
            Some(store_path),
        );

    app.run().context("Application error")
}
