//! Common types shared by the parser, the output sink and the runner.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

// ============================================================================
// Exit codes
// ============================================================================

/// Everything went fine.
pub const EXIT_SUCCESS: i32 = 0;
/// Help was requested; nothing else ran.
pub const EXIT_HELP: i32 = 253;
/// An [`AppError`](crate::error::AppError) stopped the run.
pub const EXIT_HANDLED: i32 = 254;
/// Any other failure, including panics inside application hooks.
pub const EXIT_UNHANDLED: i32 = 255;

/// Character that introduces a switch name.
pub const SWITCH_MARKER: char = '/';
/// Token prefix that splices a parameter file into the argument stream.
pub const PARAMETER_FILE_MARKER: char = '@';
/// Token prefix that names the run's log file.
pub const LOG_FILE_MARKER: char = '!';

// ============================================================================
// Levels
// ============================================================================

/// Output severity, ordered from least to most important.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Verbose,
    #[default]
    Normal,
    Important,
    Warning,
    Error,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Verbose,
        Level::Normal,
        Level::Important,
        Level::Warning,
        Level::Error,
    ];

    /// Tag written in front of every log file line.
    pub fn tag(self) -> &'static str {
        match self {
            Level::Verbose => "VERBOSE",
            Level::Normal => "NORMAL",
            Level::Important => "IMPORTANT",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "verbose" => Ok(Level::Verbose),
            "normal" => Ok(Level::Normal),
            "important" => Ok(Level::Important),
            "warning" | "warn" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            other => Err(format!(
                "Invalid level '{}'. Use: verbose, normal, important, warning or error.",
                other
            )),
        }
    }
}

// ============================================================================
// Color mode
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" | "yes" | "true" => Ok(ColorMode::Always),
            "never" | "no" | "false" => Ok(ColorMode::Never),
            _ => Err(format!(
                "Invalid color mode '{}'. Use: auto, always, or never.",
                value
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(Level::Verbose < Level::Normal);
        assert!(Level::Normal < Level::Important);
        assert!(Level::Important < Level::Warning);
        assert!(Level::Warning < Level::Error);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("Warning".parse::<Level>(), Ok(Level::Warning));
        assert_eq!("warn".parse::<Level>(), Ok(Level::Warning));
        assert_eq!(" verbose ".parse::<Level>(), Ok(Level::Verbose));
        assert!("loud".parse::<Level>().is_err());
    }

    #[test]
    fn test_parse_color_mode() {
        assert!(matches!("auto".parse(), Ok(ColorMode::Auto)));
        assert!(matches!("always".parse(), Ok(ColorMode::Always)));
        assert!(matches!("yes".parse(), Ok(ColorMode::Always)));
        assert!(matches!("never".parse(), Ok(ColorMode::Never)));
        assert!(matches!("no".parse(), Ok(ColorMode::Never)));
        assert!("invalid".parse::<ColorMode>().is_err());
    }
}
