//! Command-line handling: parsing, switch dispatch and the run lifecycle.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     User Input (argv)                        │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  parser         @file splicing, !log capture                 │
//! │                 → argument group + switches (in order)       │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  dispatch       special switches (/? /v /q /nologo)          │
//! │                 then Application::validate_switch per switch │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  entrypoint     Runner: help short-circuit, Application::run,│
//! │                 error report, exit code                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Structure
//!
//! - [`parser`] - tokens → [`CommandLine`](crate::args::CommandLine)
//! - [`dispatch`] - special/application switch passes
//! - [`helpers`] - `ensure_count`, `unknown_switch` and friends for hooks
//! - [`context`] - the per-run [`Context`] hooks write through
//! - [`entrypoint`] - [`Application`] trait and [`Runner`]

pub mod context;
pub mod dispatch;
pub mod entrypoint;
pub mod helpers;
pub mod parser;

// Re-export main types for convenience
pub use context::Context;
pub use dispatch::{RunState, SpecialSwitch};
pub use entrypoint::{Application, Runner, exit_code, run_main};
pub use helpers::{ensure_count, suggest_switch, unknown_switch, unknown_switch_among};
pub use parser::{ParserLimits, parse, parse_with};
