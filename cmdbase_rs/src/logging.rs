//! Framework diagnostics via `tracing`.
//!
//! User-visible output never goes through here. These events describe what
//! the parser, dispatcher and runner decided, for whoever debugs a tool
//! built on cmdbase. They are written to stderr and filtered by
//! `CMDBASE_LOG` (an `EnvFilter` directive, default `warn`).

use tracing_subscriber::EnvFilter;

pub const ENV_FILTER: &str = "CMDBASE_LOG";

/// Install the stderr subscriber. Calling it again is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_env(ENV_FILTER).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
