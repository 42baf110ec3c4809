//! Per-run context handed to every application hook.

use crate::cli::dispatch::RunState;
use crate::colors::Color;
use crate::messages::{Messages, keys};
use crate::output::Output;
use crate::types::{EXIT_SUCCESS, Level};

/// Output, messages and the exit code of one run.
#[derive(Debug)]
pub struct Context {
    pub(crate) output: Output,
    pub(crate) messages: Messages,
    pub(crate) state: RunState,
    return_value: i32,
}

impl Context {
    pub(crate) fn new(output: Output, messages: Messages) -> Self {
        Self {
            output,
            messages,
            state: RunState::default(),
            return_value: EXIT_SUCCESS,
        }
    }

    // ========================================================================
    // Output
    // ========================================================================

    pub fn write(&mut self, level: Level, text: &str) {
        self.output.write(level, Some(text));
    }

    /// Like [`write`](Self::write); `None` writes nothing.
    pub fn write_opt(&mut self, level: Level, text: Option<&str>) {
        self.output.write(level, text);
    }

    pub fn write_colored(&mut self, level: Level, fg: Color, bg: Color, text: &str) {
        self.output.write_colored(level, fg, bg, Some(text));
    }

    pub fn verbose(&mut self, text: impl AsRef<str>) {
        self.write(Level::Verbose, text.as_ref());
    }

    pub fn normal(&mut self, text: impl AsRef<str>) {
        self.write(Level::Normal, text.as_ref());
    }

    pub fn important(&mut self, text: impl AsRef<str>) {
        self.write(Level::Important, text.as_ref());
    }

    pub fn warning(&mut self, text: impl AsRef<str>) {
        self.write(Level::Warning, text.as_ref());
    }

    pub fn error(&mut self, text: impl AsRef<str>) {
        self.write(Level::Error, text.as_ref());
    }

    /// Write a catalog message with positional arguments.
    pub fn message<S: AsRef<str>>(&mut self, level: Level, key: &str, args: &[S]) {
        if !self.output.is_shown(level) {
            return;
        }
        let text = self.messages.format(key, args);
        self.output.write(level, Some(&text));
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn show_level(&self) -> Level {
        self.output.show_level()
    }

    pub fn is_shown(&self, level: Level) -> bool {
        self.output.is_shown(level)
    }

    // ========================================================================
    // Exit code
    // ========================================================================

    /// Exit code reported when the run finishes without an error.
    pub fn set_return_value(&mut self, value: i32) {
        self.return_value = value;
    }

    pub fn return_value(&self) -> i32 {
        self.return_value
    }

    // ========================================================================
    // Framework text
    // ========================================================================

    /// Print the logo unless it was printed already this run.
    pub(crate) fn print_logo(&mut self) {
        if self.state.logo_shown {
            return;
        }
        self.state.logo_shown = true;
        let logo = self.messages.get(keys::LOGO).to_string();
        self.output.write(Level::Important, Some(&logo));
    }

    /// Help was asked for explicitly, so `/q` does not hide it.
    pub(crate) fn print_help(&mut self) {
        let show_level = self.output.show_level();
        self.output.set_show_level(show_level.min(Level::Normal));
        if self.state.show_logo {
            self.print_logo();
        }
        for key in [keys::SYNTAX, keys::HELP, keys::HELP_COMMON] {
            let text = self.messages.get(key).to_string();
            self.output.write(Level::Normal, Some(&text));
        }
        self.output.set_show_level(show_level);
    }
}
