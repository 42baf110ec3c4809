//! Leveled output sink.
//!
//! Every user-visible line goes through [`Output`]: it drops lines below
//! the show level, routes errors to stderr, colors by level unless told
//! otherwise, and mirrors displayed lines into the run log when one is open.

pub mod logfile;
pub mod stream;

use std::path::Path;

use crate::colors::{Color, level_colors};
use crate::types::Level;

use self::logfile::LogFile;
use self::stream::{StyledStream, Target};

pub struct Output {
    stream: Box<dyn StyledStream>,
    show_level: Level,
    log: Option<LogFile>,
}

impl Output {
    pub fn new(stream: Box<dyn StyledStream>, show_level: Level) -> Self {
        Self {
            stream,
            show_level,
            log: None,
        }
    }

    pub fn show_level(&self) -> Level {
        self.show_level
    }

    pub fn set_show_level(&mut self, level: Level) {
        self.show_level = level;
    }

    pub fn is_shown(&self, level: Level) -> bool {
        level >= self.show_level
    }

    /// Write `text` in the level's colors. `None` writes nothing.
    pub fn write(&mut self, level: Level, text: Option<&str>) {
        self.emit(level, None, text);
    }

    /// Write `text` in explicit colors. `None` writes nothing.
    pub fn write_colored(&mut self, level: Level, fg: Color, bg: Color, text: Option<&str>) {
        self.emit(level, Some((fg, bg)), text);
    }

    fn emit(&mut self, level: Level, colors: Option<(Color, Color)>, text: Option<&str>) {
        if !self.is_shown(level) {
            return;
        }
        let Some(text) = text else {
            return;
        };

        let target = if level >= Level::Error {
            Target::Stderr
        } else {
            Target::Stdout
        };
        let (fg, bg) = colors.unwrap_or_else(|| level_colors(level));
        let (previous_fg, previous_bg) = self.stream.get_colors(target);
        self.stream.set_colors(target, fg, bg);
        self.stream.write_line(target, text);
        self.stream.set_colors(target, previous_fg, previous_bg);

        if let Some(log) = self.log.as_mut() {
            if let Err(err) = log.record(level, text) {
                tracing::warn!(path = %log.path().display(), %err, "failed to write log file");
            }
        }
    }

    // ========================================================================
    // Log file
    // ========================================================================

    /// Open the run log. A log that is already open is closed first.
    pub fn open_log(&mut self, path: &Path) -> std::io::Result<()> {
        let log = LogFile::open(path)?;
        self.close_log();
        tracing::debug!(path = %path.display(), "log file opened");
        self.log = Some(log);
        Ok(())
    }

    pub fn has_log(&self) -> bool {
        self.log.is_some()
    }

    /// Close the run log, writing its end marker. No-op without a log.
    pub fn close_log(&mut self) {
        if let Some(log) = self.log.take() {
            let path = log.path().to_path_buf();
            if let Err(err) = log.close() {
                tracing::warn!(path = %path.display(), %err, "failed to close log file");
            }
        }
    }
}

impl Drop for Output {
    fn drop(&mut self) {
        self.close_log();
    }
}

impl std::fmt::Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output")
            .field("show_level", &self.show_level)
            .field("log", &self.log)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::stream::{Recorder, Recording, StreamEvent};
    use tempfile::TempDir;

    fn recorded(level: Level) -> (Output, Recording) {
        let (recorder, recording) = Recorder::new();
        (Output::new(Box::new(recorder), level), recording)
    }

    #[test]
    fn test_below_show_level_is_noop() {
        let (mut out, recording) = recorded(Level::Warning);
        out.write(Level::Verbose, Some("hidden"));
        out.write(Level::Normal, Some("hidden too"));
        out.write(Level::Warning, Some("careful"));
        out.write(Level::Error, Some("broken"));
        assert_eq!(recording.lines(), vec!["careful", "broken"]);
    }

    #[test]
    fn test_absent_text_writes_nothing() {
        let (mut out, recording) = recorded(Level::Verbose);
        out.write(Level::Normal, None);
        out.write_colored(Level::Error, Color::Red, Color::Default, None);
        assert!(recording.events().is_empty());
    }

    #[test]
    fn test_errors_go_to_stderr() {
        let (mut out, recording) = recorded(Level::Verbose);
        out.write(Level::Warning, Some("warn"));
        out.write(Level::Error, Some("fail"));
        assert_eq!(recording.lines_on(Target::Stdout), vec!["warn"]);
        assert_eq!(recording.lines_on(Target::Stderr), vec!["fail"]);
    }

    #[test]
    fn test_level_colors_applied_and_restored() {
        let (mut out, recording) = recorded(Level::Verbose);
        out.write(Level::Warning, Some("warn"));
        assert_eq!(
            recording.events(),
            vec![
                StreamEvent::Colors {
                    target: Target::Stdout,
                    fg: Color::Yellow,
                    bg: Color::Default,
                },
                StreamEvent::Line {
                    target: Target::Stdout,
                    text: "warn".into(),
                },
                StreamEvent::Colors {
                    target: Target::Stdout,
                    fg: Color::Default,
                    bg: Color::Default,
                },
            ]
        );
    }

    #[test]
    fn test_explicit_colors_override_level() {
        let (mut out, recording) = recorded(Level::Verbose);
        out.write_colored(Level::Normal, Color::Cyan, Color::Blue, Some("fancy"));
        assert_eq!(
            recording.events()[0],
            StreamEvent::Colors {
                target: Target::Stdout,
                fg: Color::Cyan,
                bg: Color::Blue,
            }
        );
    }

    #[test]
    fn test_displayed_lines_are_logged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.log");
        let (mut out, _recording) = recorded(Level::Normal);

        out.open_log(&path).unwrap();
        out.write(Level::Verbose, Some("filtered"));
        out.write(Level::Normal, Some("kept"));
        out.write(Level::Error, Some("failed"));
        out.close_log();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[NORMAL] kept"));
        assert!(content.contains("[ERROR] failed"));
        assert!(!content.contains("filtered"));
        assert!(!out.has_log());
    }
}
