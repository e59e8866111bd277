// src/color/palette.rs

//! Display colors and the fixed palettes each environment draws from.

use crate::utils::error::{DebugError, Result};
use std::borrow::Cow;
use std::fmt;
use std::ops::Index;

/// A display color: an ANSI color number for terminals or a CSS color for
/// styled consoles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Color {
    Ansi(u8),
    Css(Cow<'static, str>),
}

impl Color {
    /// The escape sequence that selects this color as the foreground, without
    /// the trailing `m` so callers can append attributes (`;1m`).
    ///
    /// Returns `None` for CSS colors.
    pub fn ansi_code(&self) -> Option<String> {
        match self {
            Color::Ansi(c) if *c < 8 => Some(format!("\u{1b}[3{}", c)),
            Color::Ansi(c) => Some(format!("\u{1b}[38;5;{}", c)),
            Color::Css(_) => None,
        }
    }

    /// The `color: ...` declaration used with `%c` console styling.
    pub fn css_declaration(&self) -> String {
        format!("color: {}", self)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Ansi(c) => write!(f, "{}", c),
            Color::Css(css) => f.write_str(css),
        }
    }
}

/// Maximally distinct ANSI 256-color codes, for terminals that support them.
pub const ANSI_256: &[u8] = &[
    196, // red
    46,  // green
    21,  // blue
    129, // purple
    208, // orange
    201, // magenta
    142, // olive
    130, // brown
    30,  // teal
    245, // grey
];

/// The basic ANSI colors, for terminals limited to 16 colors.
pub const ANSI_BASIC: &[u8] = &[1, 2, 3, 4, 5, 6];

/// Kelly's colors of maximum contrast, legible on white backgrounds.
pub const KELLY: &[&str] = &[
    "#e6194b", // red
    "#4363d8", // blue
    "#3cb44b", // green
    "#911eb4", // purple
    "#f58231", // orange
    "#42d4f4", // cyan
    "#f032e6", // magenta
    "#bfef45", // lime
    "#469990", // teal
    "#9a6324", // brown
    "#800000", // maroon
    "#000075", // navy
    "#808000", // olive
    "#e6beff", // lavender
];

/// Flat palette for worker runtimes that have no styled console.
pub const WORKER: &[&str] = &[
    "#0066CC", "#CC0066", "#66CC00", "#CC6600", "#6600CC", "#00CC66", "#CC0000", "#0000CC",
    "#00CCCC", "#CCCC00", "#CC00CC", "#666666",
];

/// An ordered, non-empty sequence of colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Creates a palette, failing if `colors` is empty.
    pub fn new(colors: Vec<Color>) -> Result<Self> {
        if colors.is_empty() {
            return Err(DebugError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    pub fn ansi_256() -> Self {
        Self::from_ansi(ANSI_256)
    }

    pub fn ansi_basic() -> Self {
        Self::from_ansi(ANSI_BASIC)
    }

    pub fn kelly() -> Self {
        Self::from_css(KELLY)
    }

    pub fn worker() -> Self {
        Self::from_css(WORKER)
    }

    fn from_ansi(codes: &[u8]) -> Self {
        Self {
            colors: codes.iter().copied().map(Color::Ansi).collect(),
        }
    }

    fn from_css(colors: &'static [&'static str]) -> Self {
        Self {
            colors: colors.iter().map(|c| Color::Css(Cow::Borrowed(*c))).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors. Constructors reject that, so a
    /// built palette always returns false.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }
}

impl Index<usize> for Palette {
    type Output = Color;

    fn index(&self, index: usize) -> &Color {
        &self.colors[index]
    }
}
