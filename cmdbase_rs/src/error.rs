//! Error types surfaced by parsing, dispatch and runner initialisation.
//!
//! [`AppError`] is the "handled" error: the runner prints its message (and
//! the messages of its causes) without any diagnostic dump and exits with
//! [`EXIT_HANDLED`](crate::types::EXIT_HANDLED). Anything else an
//! application hook returns is reported as unhandled.
//!
//! [`InitError`] never reaches the run-level handler; it is returned by the
//! [`Runner`](crate::cli::Runner) factory before any run starts.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::messages::{DefaultMessages, MessageProvider, keys, render_template};

type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// What went wrong, independent of the wording.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgumentCount,
    UnknownSwitch,
    InvalidArguments,
    ParameterFileUnreadable,
    ParameterFileCycle,
    ParameterFileMalformed,
    LogFileUnopenable,
}

/// A message-provider key plus its positional arguments.
///
/// The text is resolved when the error is reported, so an application
/// catalog can reword framework errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub key: Cow<'static, str>,
    pub args: Vec<String>,
    /// Positions in `args` that hold message keys instead of text.
    pub keyed_args: Vec<usize>,
}

impl Message {
    pub fn new(key: impl Into<Cow<'static, str>>, args: Vec<String>) -> Self {
        Self {
            key: key.into(),
            args,
            keyed_args: Vec::new(),
        }
    }

    /// Treat `args[index]` as a message key, looked up when rendering.
    pub fn with_keyed_arg(mut self, index: usize) -> Self {
        self.keyed_args.push(index);
        self
    }

    pub fn is_keyed_arg(&self, index: usize) -> bool {
        self.keyed_args.contains(&index)
    }

    /// Render through a single provider, leaving the key visible if unknown.
    pub fn render_with(&self, provider: &dyn MessageProvider) -> String {
        let lookup = |key: &str| provider.get(key).unwrap_or(key).to_string();
        let args: Vec<String> = self
            .args
            .iter()
            .enumerate()
            .map(|(index, arg)| {
                if self.is_keyed_arg(index) {
                    lookup(arg.as_str())
                } else {
                    arg.clone()
                }
            })
            .collect();
        render_template(&lookup(self.key.as_ref()), &args)
    }
}

/// Recoverable, user-facing error.
#[derive(Debug, Error)]
#[error("{}", .message.render_with(&DefaultMessages))]
pub struct AppError {
    kind: ErrorKind,
    message: Message,
    #[source]
    source: Option<BoxedCause>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: Message) -> Self {
        Self {
            kind,
            message,
            source: None,
        }
    }

    /// Attach an inner cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<BoxedCause>,
    {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Application-signalled invalid input, with free text.
    pub fn invalid_arguments(text: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::InvalidArguments,
            Message::new(keys::INVALID_ARGUMENTS, vec![text.into()]),
        )
    }

    /// Application-signalled invalid input, worded by a catalog key.
    pub fn invalid_arguments_keyed(key: impl Into<Cow<'static, str>>, args: Vec<String>) -> Self {
        Self::new(ErrorKind::InvalidArguments, Message::new(key, args))
    }

    pub fn parameter_file_unreadable(path: &Path, source: std::io::Error) -> Self {
        Self::new(
            ErrorKind::ParameterFileUnreadable,
            Message::new(keys::PARAMETER_FILE, vec![path.display().to_string()]),
        )
        .with_source(source)
    }

    pub fn parameter_file_cycle(path: &Path) -> Self {
        Self::new(
            ErrorKind::ParameterFileCycle,
            Message::new(keys::PARAMETER_FILE_CYCLE, vec![path.display().to_string()]),
        )
    }

    pub fn parameter_file_too_deep(path: &Path, max_depth: usize) -> Self {
        Self::new(
            ErrorKind::ParameterFileCycle,
            Message::new(
                keys::PARAMETER_FILE_DEPTH,
                vec![path.display().to_string(), max_depth.to_string()],
            ),
        )
    }

    /// A parameter-file line with an unclosed quote or a dangling escape.
    pub fn parameter_file_malformed(path: &Path, line: usize) -> Self {
        Self::new(
            ErrorKind::ParameterFileMalformed,
            Message::new(
                keys::PARAMETER_FILE_SYNTAX,
                vec![path.display().to_string(), line.to_string()],
            ),
        )
    }

    pub fn log_file_unopenable(path: &Path, source: std::io::Error) -> Self {
        Self::new(
            ErrorKind::LogFileUnopenable,
            Message::new(keys::LOG_FILE, vec![path.display().to_string()]),
        )
        .with_source(source)
    }
}

/// Configuration defects detected while building a runner.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("another application instance is already running in this process")]
    AlreadyRunning,

    #[error("message '{key}' is missing from both the application and the default catalog")]
    MissingMessage { key: String },

    #[error("invalid message catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Problems loading a TOML message catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("catalog entry '{key}' is not a string")]
    NotAString { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_default_wording() {
        let err = AppError::parameter_file_cycle(Path::new("args.txt"));
        assert_eq!(err.kind(), ErrorKind::ParameterFileCycle);
        assert!(err.to_string().contains("args.txt"));
    }

    #[test]
    fn test_source_chain_is_exposed() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AppError::parameter_file_unreadable(Path::new("missing.txt"), io);
        let cause = err.source().map(|c| c.to_string());
        assert_eq!(cause.as_deref(), Some("gone"));
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_invalid_arguments_keeps_text() {
        let err = AppError::invalid_arguments("source and destination are the same");
        assert_eq!(err.kind(), ErrorKind::InvalidArguments);
        assert_eq!(err.to_string(), "source and destination are the same");
    }
}
