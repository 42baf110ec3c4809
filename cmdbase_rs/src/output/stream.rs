//! Styled output streams.
//!
//! [`StyledStream`] is the seam between the output sink and whatever renders
//! text: [`Terminal`] writes to the process's stdout/stderr with ANSI
//! colors, [`Recorder`] keeps every call for inspection in tests.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use crate::colors::{self, Color};
use crate::types::ColorMode;

/// Destination stream of a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Stdout,
    Stderr,
}

pub trait StyledStream {
    fn set_colors(&mut self, target: Target, fg: Color, bg: Color);
    fn get_colors(&self, target: Target) -> (Color, Color);
    fn write_line(&mut self, target: Target, text: &str);
}

// ============================================================================
// Terminal
// ============================================================================

/// Real stdout/stderr.
#[derive(Debug)]
pub struct Terminal {
    stdout_colors: (Color, Color),
    stderr_colors: (Color, Color),
    stdout_enabled: bool,
    stderr_enabled: bool,
}

impl Terminal {
    pub fn new(mode: ColorMode) -> Self {
        let (stdout_tty, stderr_tty) = colors::std_terminals();
        Self {
            stdout_colors: (Color::Default, Color::Default),
            stderr_colors: (Color::Default, Color::Default),
            stdout_enabled: colors::is_enabled(mode, stdout_tty),
            stderr_enabled: colors::is_enabled(mode, stderr_tty),
        }
    }

    fn emit(&self, target: Target, text: &str, newline: bool) {
        let result = match target {
            Target::Stdout => write_to(&mut std::io::stdout().lock(), text, newline),
            Target::Stderr => write_to(&mut std::io::stderr().lock(), text, newline),
        };
        if let Err(err) = result {
            tracing::debug!(?target, %err, "console write failed");
        }
    }
}

fn write_to(out: &mut impl Write, text: &str, newline: bool) -> std::io::Result<()> {
    if newline {
        writeln!(out, "{text}")
    } else {
        write!(out, "{text}")?;
        out.flush()
    }
}

impl StyledStream for Terminal {
    fn set_colors(&mut self, target: Target, fg: Color, bg: Color) {
        let (slot, enabled) = match target {
            Target::Stdout => (&mut self.stdout_colors, self.stdout_enabled),
            Target::Stderr => (&mut self.stderr_colors, self.stderr_enabled),
        };
        if *slot == (fg, bg) {
            return;
        }
        *slot = (fg, bg);
        if enabled {
            self.emit(target, &colors::sequence(fg, bg), false);
        }
    }

    fn get_colors(&self, target: Target) -> (Color, Color) {
        match target {
            Target::Stdout => self.stdout_colors,
            Target::Stderr => self.stderr_colors,
        }
    }

    fn write_line(&mut self, target: Target, text: &str) {
        self.emit(target, text, true);
    }
}

// ============================================================================
// Recorder
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    Colors { target: Target, fg: Color, bg: Color },
    Line { target: Target, text: String },
}

/// Spy stream. Events are shared with the [`Recording`] handed out by
/// [`Recorder::new`], so they stay readable after the recorder moved into
/// an output sink.
#[derive(Debug)]
pub struct Recorder {
    events: Rc<RefCell<Vec<StreamEvent>>>,
    stdout_colors: (Color, Color),
    stderr_colors: (Color, Color),
}

impl Recorder {
    pub fn new() -> (Self, Recording) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let recorder = Self {
            events: Rc::clone(&events),
            stdout_colors: (Color::Default, Color::Default),
            stderr_colors: (Color::Default, Color::Default),
        };
        (recorder, Recording { events })
    }
}

impl StyledStream for Recorder {
    fn set_colors(&mut self, target: Target, fg: Color, bg: Color) {
        match target {
            Target::Stdout => self.stdout_colors = (fg, bg),
            Target::Stderr => self.stderr_colors = (fg, bg),
        }
        self.events
            .borrow_mut()
            .push(StreamEvent::Colors { target, fg, bg });
    }

    fn get_colors(&self, target: Target) -> (Color, Color) {
        match target {
            Target::Stdout => self.stdout_colors,
            Target::Stderr => self.stderr_colors,
        }
    }

    fn write_line(&mut self, target: Target, text: &str) {
        self.events.borrow_mut().push(StreamEvent::Line {
            target,
            text: text.to_string(),
        });
    }
}

/// Read side of a [`Recorder`].
#[derive(Clone, Debug)]
pub struct Recording {
    events: Rc<RefCell<Vec<StreamEvent>>>,
}

impl Recording {
    pub fn events(&self) -> Vec<StreamEvent> {
        self.events.borrow().clone()
    }

    /// Every written line, regardless of stream.
    pub fn lines(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                StreamEvent::Line { text, .. } => Some(text.clone()),
                StreamEvent::Colors { .. } => None,
            })
            .collect()
    }

    pub fn lines_on(&self, wanted: Target) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                StreamEvent::Line { target, text } if *target == wanted => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// All written text joined with newlines.
    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_tracks_colors_per_stream() {
        let (mut recorder, recording) = Recorder::new();
        recorder.set_colors(Target::Stderr, Color::Red, Color::Default);
        assert_eq!(recorder.get_colors(Target::Stderr), (Color::Red, Color::Default));
        assert_eq!(recorder.get_colors(Target::Stdout), (Color::Default, Color::Default));

        recorder.write_line(Target::Stderr, "boom");
        assert_eq!(recording.lines_on(Target::Stderr), vec!["boom"]);
        assert!(recording.lines_on(Target::Stdout).is_empty());
        assert_eq!(recording.events().len(), 2);
    }

    #[test]
    fn test_terminal_without_color_keeps_state() {
        let mut terminal = Terminal::new(ColorMode::Never);
        terminal.set_colors(Target::Stdout, Color::Yellow, Color::Default);
        assert_eq!(terminal.get_colors(Target::Stdout), (Color::Yellow, Color::Default));
    }
}
