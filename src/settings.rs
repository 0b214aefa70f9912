//! Display preferences: color theme and font size.
//!
//! Both are persisted as plain strings in the preference store
//! (`"dark"`, `"1.2"`) and can be given on the command line.

use std::fmt;
use std::str::FromStr;

/// Color theme for the reading pane and panels.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Sepia,
}

impl Theme {
    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::Sepia];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Sepia => "sepia",
        }
    }

    /// The theme after this one, wrapping around.
    pub const fn next(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Sepia,
            Self::Sepia => Self::Light,
        }
    }

    pub const fn previous(self) -> Self {
        match self {
            Self::Light => Self::Sepia,
            Self::Dark => Self::Light,
            Self::Sepia => Self::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown theme '{s}' (expected light, dark or sepia)"))
    }
}

/// Font size steps in tenths of the base size.
const FONT_STEPS: [u8; 7] = [8, 9, 10, 11, 12, 14, 16];

/// Relative font size, stored as tenths (`12` is `1.2`).
///
/// A terminal cannot scale its glyphs, so the size narrows the wrap width
/// instead: larger text means fewer columns per line and more pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontSize(u8);

impl FontSize {
    pub const DEFAULT: Self = Self(10);
    pub const SMALLEST: Self = Self(FONT_STEPS[0]);
    pub const LARGEST: Self = Self(FONT_STEPS[FONT_STEPS.len() - 1]);

    /// Build a font size from tenths, accepting only the supported steps.
    pub fn from_tenths(tenths: u8) -> Option<Self> {
        FONT_STEPS.contains(&tenths).then_some(Self(tenths))
    }

    pub const fn tenths(self) -> u8 {
        self.0
    }

    /// Scale factor relative to the base size.
    pub fn scale(self) -> f32 {
        f32::from(self.0) / 10.0
    }

    /// Next larger step, or `self` at the top.
    pub fn larger(self) -> Self {
        FONT_STEPS
            .iter()
            .copied()
            .find(|step| *step > self.0)
            .map_or(self, Self)
    }

    /// Next smaller step, or `self` at the bottom.
    pub fn smaller(self) -> Self {
        FONT_STEPS
            .iter()
            .rev()
            .copied()
            .find(|step| *step < self.0)
            .map_or(self, Self)
    }

    /// Wrap width for a pane of `columns` at this size.
    pub fn wrap_width(self, columns: u16) -> u16 {
        // Narrowing only; result is at most `columns`.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let scaled = (f32::from(columns) / self.scale()).floor() as u16;
        scaled.clamp(MIN_WRAP_WIDTH.min(columns), columns.max(1))
    }
}

/// Narrowest wrap width the font scale may produce.
pub const MIN_WRAP_WIDTH: u16 = 20;

impl Default for FontSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f32 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid font size '{s}'"))?;
        let tenths = (value * 10.0).round();
        if !(0.0..=255.0).contains(&tenths) {
            return Err(format!("font size '{s}' is out of range"));
        }
        // Range checked above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self::from_tenths(tenths as u8).ok_or_else(|| {
            let steps = FONT_STEPS
                .iter()
                .map(|t| Self(*t).to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("unsupported font size '{s}' (expected one of {steps})")
        })
    }
}
