//! Terminal color palette and ANSI escape codes.
//!
//! The output sink works with a foreground/background pair per stream, the
//! same model a console text-attribute API exposes. This module maps that
//! pair onto SGR sequences.

use std::io::IsTerminal;

use crate::types::{ColorMode, Level};

// ============================================================================
// ANSI Color Codes
// ============================================================================

pub const RESET: &str = "\x1b[0m";

const ESC: &str = "\x1b[";

// ============================================================================
// Palette
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightCyan,
    BrightWhite,
}

impl Color {
    /// SGR parameter selecting this color as foreground.
    pub fn fg_code(self) -> u8 {
        match self {
            Color::Default => 39,
            Color::Black => 30,
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Magenta => 35,
            Color::Cyan => 36,
            Color::White => 37,
            Color::Gray => 90,
            Color::BrightRed => 91,
            Color::BrightGreen => 92,
            Color::BrightYellow => 93,
            Color::BrightCyan => 96,
            Color::BrightWhite => 97,
        }
    }

    /// SGR parameter selecting this color as background.
    pub fn bg_code(self) -> u8 {
        // Background codes sit 10 above their foreground counterparts.
        self.fg_code() + 10
    }
}

/// Foreground/background pair used when a line is written without explicit colors.
pub fn level_colors(level: Level) -> (Color, Color) {
    let fg = match level {
        Level::Verbose => Color::Gray,
        Level::Normal => Color::Default,
        Level::Important => Color::BrightWhite,
        Level::Warning => Color::Yellow,
        Level::Error => Color::Red,
    };
    (fg, Color::Default)
}

/// Escape sequence switching a stream to the given pair.
pub fn sequence(fg: Color, bg: Color) -> String {
    if fg == Color::Default && bg == Color::Default {
        return RESET.to_string();
    }
    format!("{ESC}0;{};{}m", fg.fg_code(), bg.bg_code())
}

// ============================================================================
// Color State
// ============================================================================

/// Determines if colors should be used based on ColorMode and terminal detection.
pub fn is_enabled(mode: ColorMode, stream_is_terminal: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => stream_is_terminal,
    }
}

/// Terminal detection for stdout and stderr, in that order.
pub fn std_terminals() -> (bool, bool) {
    (
        std::io::stdout().is_terminal(),
        std::io::stderr().is_terminal(),
    )
}
