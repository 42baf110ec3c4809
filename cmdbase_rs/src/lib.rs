//! # cmdbase
//!
//! **Base layer for slash-switch command-line tools.** cmdbase parses the
//! raw argument vector into positional arguments and `/switches`, applies
//! the framework's own switches, hands the rest to your [`Application`],
//! prints everything through one leveled, colored, optionally logged
//! output sink, and turns the outcome into a process exit code.
//!
//! ## Features
//!
//! - **Parameter files** - `@args.txt` splices the file's lines into the command line
//! - **Run logs** - `!run.log` appends every displayed line, timestamped and tagged
//! - **Built-in switches** - `/?`, `/h`, `/help`, `/v`, `/verbose`, `/q`, `/quiet`, `/nologo`
//! - **Message catalogs** - all wording comes from TOML catalogs with framework defaults
//! - **Exit codes** - `0` success, `253` help, `254` handled error, `255` unhandled error
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cmdbase::cli::{Application, Context, ensure_count, run_main};
//! use cmdbase::messages::{Catalog, MessageProvider};
//!
//! struct Hello {
//!     name: String,
//! }
//!
//! impl Application for Hello {
//!     fn catalog(&self) -> Box<dyn MessageProvider> {
//!         Box::new(Catalog::from_pairs([
//!             ("app.logo", "hello 1.0"),
//!             ("app.syntax", "hello <name>"),
//!             ("app.help", "Greets <name>."),
//!         ]))
//!     }
//!
//!     fn validate_arguments(
//!         &mut self,
//!         _ctx: &mut Context,
//!         arguments: Option<&[String]>,
//!     ) -> anyhow::Result<()> {
//!         ensure_count(arguments, 1, 1, None)?;
//!         self.name = arguments.unwrap_or_default()[0].clone();
//!         Ok(())
//!     }
//!
//!     fn run(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
//!         ctx.normal(format!("Hello, {}!", self.name));
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     run_main(Hello { name: String::new() })
//! }
//! ```

// ============================================================================
// Core Modules
// ============================================================================

/// Parsed command-line data.
///
/// Contains [`Parameter`](args::Parameter) and [`CommandLine`](args::CommandLine).
pub mod args;

/// Parsing, dispatch and the run lifecycle.
pub mod cli;

/// Color palette and ANSI sequences.
pub mod colors;

/// Settings for the output sink (TOML file and environment).
pub mod config;

/// Handled and initialisation error types.
pub mod error;

/// `tracing` subscriber setup for framework diagnostics.
pub mod logging;

/// Message providers and TOML catalogs.
pub mod messages;

/// Leveled output sink, styled streams and the run log.
pub mod output;

/// Levels, color modes, markers and exit codes.
pub mod types;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use args::{CommandLine, Parameter};
pub use cli::{Application, Context, Runner};
pub use config::Settings;
pub use error::{AppError, ErrorKind, InitError};
pub use types::{EXIT_HANDLED, EXIT_HELP, EXIT_SUCCESS, EXIT_UNHANDLED, Level};
