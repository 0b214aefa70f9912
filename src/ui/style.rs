//! Theme palettes and line styles.
//!
//! Each [`Theme`] maps to a fixed RGB palette so the reading pane looks the
//! same regardless of the terminal's own colors.

use ratatui::style::{Color, Modifier, Style};

use crate::document::LineType;
use crate::settings::Theme;

/// Colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    /// Heading colors for levels 1-3
    pub headings: [Color; 3],
    pub accent: Color,
    pub bar_background: Color,
    pub bar_text: Color,
    pub panel_background: Color,
    pub panel_text: Color,
    pub match_background: Color,
    pub match_text: Color,
}

impl Palette {
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: Color::Rgb(0xff, 0xff, 0xff),
                text: Color::Rgb(0x33, 0x33, 0x33),
                muted: Color::Rgb(0x88, 0x88, 0x88),
                headings: [
                    Color::Rgb(0x1f, 0x4e, 0x79),
                    Color::Rgb(0x2e, 0x6d, 0x3e),
                    Color::Rgb(0x6b, 0x4f, 0x1d),
                ],
                accent: Color::Rgb(0x00, 0x7a, 0xcc),
                bar_background: Color::Rgb(0xe8, 0xe8, 0xe8),
                bar_text: Color::Rgb(0x33, 0x33, 0x33),
                panel_background: Color::Rgb(0xf7, 0xf7, 0xf7),
                panel_text: Color::Rgb(0x22, 0x22, 0x22),
                match_background: Color::Rgb(0xff, 0xe0, 0x66),
                match_text: Color::Rgb(0x00, 0x00, 0x00),
            },
            Theme::Dark => Self {
                background: Color::Rgb(0x1a, 0x1a, 0x1a),
                text: Color::Rgb(0xe0, 0xe0, 0xe0),
                muted: Color::Rgb(0x80, 0x80, 0x80),
                headings: [
                    Color::Rgb(0x7c, 0xc4, 0xf5),
                    Color::Rgb(0x8f, 0xd1, 0x9e),
                    Color::Rgb(0xe6, 0xc0, 0x7b),
                ],
                accent: Color::Rgb(0x4d, 0xa6, 0xff),
                bar_background: Color::Rgb(0x2d, 0x2d, 0x2d),
                bar_text: Color::Rgb(0xcc, 0xcc, 0xcc),
                panel_background: Color::Rgb(0x25, 0x25, 0x25),
                panel_text: Color::Rgb(0xe0, 0xe0, 0xe0),
                match_background: Color::Rgb(0x80, 0x6a, 0x00),
                match_text: Color::Rgb(0xff, 0xff, 0xff),
            },
            Theme::Sepia => Self {
                background: Color::Rgb(0xf4, 0xec, 0xd8),
                text: Color::Rgb(0x5c, 0x4b, 0x37),
                muted: Color::Rgb(0x9c, 0x8b, 0x74),
                headings: [
                    Color::Rgb(0x70, 0x42, 0x14),
                    Color::Rgb(0x5e, 0x50, 0x1c),
                    Color::Rgb(0x7a, 0x5c, 0x3a),
                ],
                accent: Color::Rgb(0x8b, 0x5a, 0x2b),
                bar_background: Color::Rgb(0xe6, 0xd8, 0xb8),
                bar_text: Color::Rgb(0x5c, 0x4b, 0x37),
                panel_background: Color::Rgb(0xef, 0xe4, 0xc9),
                panel_text: Color::Rgb(0x4a, 0x3b, 0x2a),
                match_background: Color::Rgb(0xe0, 0xb8, 0x5c),
                match_text: Color::Rgb(0x2a, 0x1e, 0x10),
            },
        }
    }

    /// Text on the reading pane background.
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn bar(&self) -> Style {
        Style::default().fg(self.bar_text).bg(self.bar_background)
    }

    pub fn panel(&self) -> Style {
        Style::default().fg(self.panel_text).bg(self.panel_background)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn search_match(&self) -> Style {
        Style::default()
            .fg(self.match_text)
            .bg(self.match_background)
            .add_modifier(Modifier::BOLD)
    }

    pub fn heading(&self, level: u8) -> Style {
        let index = usize::from(level.clamp(1, 3) - 1);
        let style = Style::default()
            .fg(self.headings[index])
            .add_modifier(Modifier::BOLD);
        if level == 1 {
            style.add_modifier(Modifier::UNDERLINED)
        } else {
            style
        }
    }
}

/// Style for a display line in the given palette.
pub fn style_for_line_type(line_type: &LineType, palette: &Palette) -> Style {
    let base = palette.base();
    match line_type {
        LineType::Heading(level) => base.patch(palette.heading(*level)),
        LineType::Preformatted => base.patch(palette.muted()),
        LineType::Image => base.fg(palette.accent).add_modifier(Modifier::ITALIC),
        LineType::Rule => base.patch(palette.muted()).add_modifier(Modifier::DIM),
        LineType::Table => base.fg(palette.text),
        LineType::Body | LineType::ListItem | LineType::Blank => base,
    }
}
