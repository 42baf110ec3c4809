//! Parsed command-line data: parameters and the command line they form.

use std::path::PathBuf;

/// One parsed unit: the positional argument group or a single switch occurrence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parameter {
    name: Option<String>,
    values: Vec<String>,
    applied: bool,
}

impl Parameter {
    /// The unnamed argument group.
    pub fn arguments(values: Vec<String>) -> Self {
        Self {
            name: None,
            values,
            applied: false,
        }
    }

    /// A switch, named including its marker (`/x`).
    pub fn switch(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            values: Vec::new(),
            applied: false,
        }
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    /// Switch name including the marker, `None` for the argument group.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_switch(&self) -> bool {
        self.name.is_some()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub(crate) fn push_value(&mut self, value: String) {
        self.values.push(value);
    }

    pub fn applied(&self) -> bool {
        self.applied
    }

    /// Flag the parameter as consumed. Returns `false` if it already was.
    pub fn mark_applied(&mut self) -> bool {
        !std::mem::replace(&mut self.applied, true)
    }
}

/// Result of one parse: at most one argument group, switches in command-line order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandLine {
    pub arguments: Option<Parameter>,
    pub switches: Vec<Parameter>,
    /// Path captured from the last `!<path>` directive.
    pub log_file: Option<PathBuf>,
}

impl CommandLine {
    /// Values of the argument group, if one was given.
    pub fn argument_values(&self) -> Option<&[String]> {
        self.arguments.as_ref().map(Parameter::values)
    }

    /// Switch names in command-line order.
    pub fn switch_names(&self) -> Vec<&str> {
        self.switches.iter().filter_map(Parameter::name).collect()
    }
}
