//! Single-pass tokenizer turning raw arguments into a [`CommandLine`].
//!
//! Tokens are consumed left to right with one piece of state, the parameter
//! currently collecting values:
//!
//! - empty (after trimming) tokens are dropped
//! - `@<path>` splices the lines of `<path>` into the stream at this point
//! - `!<path>` records the log file for the run
//! - `/<name>` closes the current parameter and opens a switch
//! - anything else is a value of the current parameter
//!
//! Values before the first switch form the argument group. The parser starts
//! in a "leading" state that is left on the first switch and never entered
//! again, so the argument group can only be filled once.

use std::fs;
use std::mem;
use std::path::{Path, PathBuf};

use crate::args::{CommandLine, Parameter};
use crate::error::AppError;
use crate::types::{LOG_FILE_MARKER, PARAMETER_FILE_MARKER, SWITCH_MARKER};

/// Bounds applied to parameter-file expansion.
#[derive(Clone, Copy, Debug)]
pub struct ParserLimits {
    /// Deepest allowed chain of `@file` inclusions.
    pub max_depth: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self { max_depth: 16 }
    }
}

/// Parse with default limits.
pub fn parse<I, S>(tokens: I) -> Result<CommandLine, AppError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_with(tokens, ParserLimits::default())
}

pub fn parse_with<I, S>(tokens: I, limits: ParserLimits) -> Result<CommandLine, AppError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut state = ParseState::new(limits);
    for token in tokens {
        state.feed(token.as_ref())?;
    }
    Ok(state.finish())
}

enum Current {
    Leading(Vec<String>),
    Switch(Parameter),
}

struct ParseState {
    line: CommandLine,
    current: Current,
    /// Parameter files being expanded, outermost first.
    includes: Vec<PathBuf>,
    limits: ParserLimits,
}

impl ParseState {
    fn new(limits: ParserLimits) -> Self {
        Self {
            line: CommandLine::default(),
            current: Current::Leading(Vec::new()),
            includes: Vec::new(),
            limits,
        }
    }

    fn feed(&mut self, raw: &str) -> Result<(), AppError> {
        let token = raw.trim();
        if token.is_empty() {
            return Ok(());
        }

        if let Some(path) = token.strip_prefix(PARAMETER_FILE_MARKER) {
            return self.splice(Path::new(path));
        }

        if let Some(path) = token.strip_prefix(LOG_FILE_MARKER) {
            if let Some(previous) = self.line.log_file.replace(PathBuf::from(path)) {
                tracing::debug!(previous = %previous.display(), "log file directive replaced");
            }
            tracing::debug!(path, "log file directive");
            return Ok(());
        }

        if token.starts_with(SWITCH_MARKER) {
            tracing::trace!(switch = token, "switch");
            let previous = mem::replace(&mut self.current, Current::Switch(Parameter::switch(token)));
            self.flush(previous);
        } else {
            match &mut self.current {
                Current::Leading(values) => values.push(token.to_string()),
                Current::Switch(param) => param.push_value(token.to_string()),
            }
        }
        Ok(())
    }

    fn splice(&mut self, path: &Path) -> Result<(), AppError> {
        let content = fs::read_to_string(path)
            .map_err(|err| AppError::parameter_file_unreadable(path, err))?;
        let identity = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        if self.includes.contains(&identity) {
            return Err(AppError::parameter_file_cycle(path));
        }
        if self.includes.len() >= self.limits.max_depth {
            return Err(AppError::parameter_file_too_deep(path, self.limits.max_depth));
        }

        tracing::debug!(path = %path.display(), depth = self.includes.len() + 1, "expanding parameter file");
        self.includes.push(identity);
        for (index, line) in content.lines().enumerate() {
            let tokens =
                split_line(line).ok_or_else(|| AppError::parameter_file_malformed(path, index + 1))?;
            for token in tokens {
                self.feed(&token)?;
            }
        }
        self.includes.pop();
        Ok(())
    }

    fn flush(&mut self, current: Current) {
        match current {
            Current::Leading(values) => {
                if !values.is_empty() {
                    self.line.arguments = Some(Parameter::arguments(values));
                }
            }
            Current::Switch(param) => self.line.switches.push(param),
        }
    }

    fn finish(mut self) -> CommandLine {
        let last = mem::replace(&mut self.current, Current::Leading(Vec::new()));
        self.flush(last);
        self.line
    }
}

/// Split one parameter-file line into tokens with shell quoting rules.
///
/// A line whose first non-blank character is `#` is a comment. `None` means
/// the line is malformed (an unclosed quote or a trailing backslash).
pub fn split_line(line: &str) -> Option<Vec<String>> {
    let line = line.trim();
    if line.starts_with('#') {
        return Some(Vec::new());
    }
    shlex::split(line)
}
