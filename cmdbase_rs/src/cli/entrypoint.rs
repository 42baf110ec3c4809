//! Application lifecycle: parse, apply switches, run, report, clean up.
//!
//! ```text
//! parse ─▶ open log ─▶ special switches ─┬─ help wanted ─▶ logo + syntax + help (253)
//!                                        └─ logo ─▶ arguments ─▶ switches ─▶ run
//! any failure ─▶ logo (forced) ─▶ report (254 handled / 255 unhandled)
//! always ─▶ clean up (close log)
//! ```
//!
//! Only one [`Runner`] may be alive per process; a second
//! [`Runner::init`] fails with [`InitError::AlreadyRunning`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::args::{CommandLine, Parameter};
use crate::cli::context::Context;
use crate::cli::dispatch;
use crate::cli::helpers::{ensure_count, unknown_switch};
use crate::cli::parser::{self, ParserLimits};
use crate::config::Settings;
use crate::error::{AppError, InitError};
use crate::messages::{MessageProvider, Messages, keys};
use crate::output::Output;
use crate::output::stream::{StyledStream, Terminal};
use crate::types::{EXIT_HANDLED, EXIT_HELP, EXIT_UNHANDLED, Level};

/// What a concrete tool implements.
pub trait Application {
    /// The tool's messages. Must provide `app.logo`, `app.syntax` and
    /// `app.help`; may override any framework message.
    fn catalog(&self) -> Box<dyn MessageProvider>;

    /// Check the positional arguments (`None` when none were given).
    ///
    /// The default accepts no arguments at all.
    fn validate_arguments(
        &mut self,
        ctx: &mut Context,
        arguments: Option<&[String]>,
    ) -> anyhow::Result<()> {
        let _ = ctx;
        if let Some(values) = arguments {
            ensure_count(Some(values), 0, 0, None)?;
        }
        Ok(())
    }

    /// Accept one switch occurrence or fail. Called once per occurrence, in
    /// command-line order. The default knows no switches.
    fn validate_switch(
        &mut self,
        ctx: &mut Context,
        name: &str,
        values: &[String],
    ) -> anyhow::Result<()> {
        let _ = (ctx, values);
        Err(unknown_switch(name).into())
    }

    /// The tool's actual work.
    fn run(&mut self, ctx: &mut Context) -> anyhow::Result<()>;
}

// ============================================================================
// Single instance guard
// ============================================================================

static INSTANCE_ACTIVE: AtomicBool = AtomicBool::new(false);

#[derive(Debug)]
struct InstanceGuard;

impl InstanceGuard {
    fn acquire() -> Result<Self, InitError> {
        INSTANCE_ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| InstanceGuard)
            .map_err(|_| InitError::AlreadyRunning)
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        INSTANCE_ACTIVE.store(false, Ordering::SeqCst);
    }
}

// ============================================================================
// Runner
// ============================================================================

pub struct Runner<A: Application> {
    app: A,
    ctx: Context,
    limits: ParserLimits,
    _guard: InstanceGuard,
}

impl<A: Application> Runner<A> {
    /// Runner writing to the real terminal.
    pub fn init(app: A, settings: &Settings) -> Result<Self, InitError> {
        Self::init_with_stream(app, settings, Box::new(Terminal::new(settings.color)))
    }

    /// Runner writing to `stream`, e.g. a [`Recorder`](crate::output::stream::Recorder).
    pub fn init_with_stream(
        app: A,
        settings: &Settings,
        stream: Box<dyn StyledStream>,
    ) -> Result<Self, InitError> {
        let guard = InstanceGuard::acquire()?;
        let messages = Messages::with_defaults(app.catalog())?;
        let output = Output::new(stream, settings.show_level);
        tracing::debug!(show_level = %settings.show_level, "runner initialised");
        Ok(Self {
            app,
            ctx: Context::new(output, messages),
            limits: ParserLimits::default(),
            _guard: guard,
        })
    }

    pub fn with_limits(mut self, limits: ParserLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Run once over `args` (without the program name) and return the exit code.
    pub fn run<I, S>(mut self, args: I) -> i32
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        // The default hook would print straight to stderr, past the sink and the log.
        let location = Arc::new(Mutex::new(None));
        let previous_hook = panic::take_hook();
        let captured = Arc::clone(&location);
        panic::set_hook(Box::new(move |info| {
            if let (Some(at), Ok(mut slot)) = (info.location(), captured.lock()) {
                *slot = Some(at.to_string());
            }
        }));
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.pipeline(&tokens)));
        panic::set_hook(previous_hook);

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => self.report(err),
            Err(payload) => {
                let at = location.lock().ok().and_then(|mut slot| slot.take());
                self.report_panic(payload, at);
            }
        }

        self.clean_up();
        let code = self.ctx.return_value();
        tracing::debug!(code, "run finished");
        code
    }

    fn pipeline(&mut self, tokens: &[String]) -> anyhow::Result<()> {
        let CommandLine {
            mut arguments,
            switches,
            log_file,
        } = parser::parse_with(tokens, self.limits)?;

        if let Some(path) = log_file {
            self.ctx
                .output
                .open_log(&path)
                .map_err(|err| AppError::log_file_unopenable(&path, err))?;
        }

        let mut split = dispatch::partition(switches);
        dispatch::apply_special(&mut split.special, &mut self.ctx.state, &mut self.ctx.output);

        if self.ctx.state.help_wanted {
            tracing::debug!("help requested");
            self.ctx.print_help();
            self.ctx.set_return_value(EXIT_HELP);
            return Ok(());
        }

        if self.ctx.state.show_logo {
            self.ctx.print_logo();
        }

        let Self { app, ctx, .. } = self;
        app.validate_arguments(ctx, arguments.as_ref().map(Parameter::values))?;
        if let Some(group) = arguments.as_mut() {
            group.mark_applied();
        }

        dispatch::apply_switches(&mut split.application, |name, values| {
            app.validate_switch(ctx, name, values)
        })?;

        tracing::debug!("running application");
        app.run(ctx)
    }

    fn report(&mut self, err: anyhow::Error) {
        let ctx = &mut self.ctx;
        ctx.print_logo();

        match err.downcast_ref::<AppError>() {
            Some(handled) => {
                tracing::debug!(kind = ?handled.kind(), "handled error");
                let mut causes = Vec::new();
                let mut cause = std::error::Error::source(handled);
                while let Some(inner) = cause {
                    causes.push(inner.to_string());
                    cause = inner.source();
                }
                for text in causes.iter().rev() {
                    ctx.write(Level::Error, text);
                }
                let text = ctx.messages.render(handled.message());
                ctx.write(Level::Error, &text);
                ctx.message::<&str>(Level::Warning, keys::FOOTER, &[]);
                ctx.set_return_value(EXIT_HANDLED);
            }
            None => {
                ctx.message(Level::Error, keys::UNHANDLED, &[format!("{err:?}")]);
                ctx.set_return_value(EXIT_UNHANDLED);
            }
        }
    }

    fn report_panic(&mut self, payload: Box<dyn Any + Send>, location: Option<String>) {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic with a non-string payload".to_string());
        let detail = match location {
            Some(at) => format!("panic: {detail} (at {at})"),
            None => format!("panic: {detail}"),
        };
        tracing::debug!(%detail, "application panicked");
        self.ctx.print_logo();
        self.ctx.message(Level::Error, keys::UNHANDLED, &[detail]);
        self.ctx.set_return_value(EXIT_UNHANDLED);
    }

    fn clean_up(&mut self) {
        self.ctx.output.close_log();
    }
}

/// Convert a run result into a process exit code. Values outside 0..=255
/// become 255.
pub fn exit_code(value: i32) -> ExitCode {
    ExitCode::from(u8::try_from(value).unwrap_or(u8::MAX))
}

/// Shared `main()` body: diagnostics, settings file and environment, one
/// run over the process arguments.
pub fn run_main<A: Application>(app: A) -> ExitCode {
    crate::logging::init();
    let settings = Settings::load();
    match Runner::init(app, &settings) {
        Ok(runner) => exit_code(runner.run(std::env::args().skip(1))),
        Err(err) => {
            eprintln!("fatal: {err}");
            exit_code(EXIT_UNHANDLED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Catalog;
    use crate::output::stream::{Recorder, Recording};
    use serial_test::serial;

    struct Quiet;

    impl Application for Quiet {
        fn catalog(&self) -> Box<dyn MessageProvider> {
            Box::new(Catalog::from_pairs([
                (keys::LOGO, "quiet 1.0"),
                (keys::SYNTAX, "quiet"),
                (keys::HELP, "Does nothing."),
            ]))
        }

        fn run(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
            ctx.normal("done");
            Ok(())
        }
    }

    fn quiet_runner() -> (Runner<Quiet>, Recording) {
        let (recorder, recording) = Recorder::new();
        let runner =
            Runner::init_with_stream(Quiet, &Settings::default(), Box::new(recorder)).unwrap();
        (runner, recording)
    }

    #[test]
    #[serial]
    fn test_second_instance_is_refused() {
        let (first, _recording) = quiet_runner();
        let (recorder, _) = Recorder::new();
        let second = Runner::init_with_stream(Quiet, &Settings::default(), Box::new(recorder));
        assert!(matches!(second, Err(InitError::AlreadyRunning)));

        assert_eq!(first.run(Vec::<String>::new()), 0);
        let (again, _recording) = quiet_runner();
        drop(again);
    }

    #[test]
    #[serial]
    fn test_default_hooks() {
        let (runner, recording) = quiet_runner();
        assert_eq!(runner.run(Vec::<String>::new()), 0);
        assert_eq!(recording.lines(), vec!["quiet 1.0", "done"]);

        let (runner, recording) = quiet_runner();
        assert_eq!(runner.run(["stray"]), EXIT_HANDLED);
        assert!(recording.text().contains("Too many arguments"));

        let (runner, recording) = quiet_runner();
        assert_eq!(runner.run(["/what"]), EXIT_HANDLED);
        assert!(recording.text().contains("Unknown switch /what."));
    }
}
