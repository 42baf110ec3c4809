//! Message providers: key → text lookup with positional placeholders.
//!
//! Applications ship a [`Catalog`] (usually parsed from an embedded TOML
//! file). The framework's own wording lives in [`DefaultMessages`]. A bound
//! [`Messages`] looks a key up in the application catalog first and falls
//! back to the defaults.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{CatalogError, InitError, Message};

/// Keys the framework looks up.
pub mod keys {
    pub const LOGO: &str = "app.logo";
    pub const SYNTAX: &str = "app.syntax";
    pub const HELP: &str = "app.help";
    pub const HELP_COMMON: &str = "help.common";

    pub const LABEL_ARGUMENTS: &str = "label.arguments";

    pub const MISSING_VALUES: &str = "error.missing_values";
    pub const TOO_FEW: &str = "error.too_few";
    pub const TOO_MANY: &str = "error.too_many";
    pub const UNKNOWN_SWITCH: &str = "error.unknown_switch";
    pub const UNKNOWN_SWITCH_HINT: &str = "error.unknown_switch_hint";
    pub const INVALID_ARGUMENTS: &str = "error.invalid_arguments";
    pub const PARAMETER_FILE: &str = "error.parameter_file";
    pub const PARAMETER_FILE_CYCLE: &str = "error.parameter_file_cycle";
    pub const PARAMETER_FILE_DEPTH: &str = "error.parameter_file_depth";
    pub const PARAMETER_FILE_SYNTAX: &str = "error.parameter_file_syntax";
    pub const LOG_FILE: &str = "error.log_file";
    pub const FOOTER: &str = "error.footer";
    pub const UNHANDLED: &str = "error.unhandled";
}

/// Keys that must resolve from one of the bound providers.
pub const REQUIRED_KEYS: &[&str] = &[keys::LOGO, keys::SYNTAX, keys::HELP];

pub trait MessageProvider {
    fn get(&self, key: &str) -> Option<&str>;
}

// ============================================================================
// Default provider
// ============================================================================

/// Framework wording. Has no logo, syntax or help of its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultMessages;

impl MessageProvider for DefaultMessages {
    fn get(&self, key: &str) -> Option<&str> {
        let text = match key {
            keys::HELP_COMMON => {
                "Common switches:\n  \
                 /?, /h, /help   Show this help\n  \
                 /v, /verbose    Show verbose output\n  \
                 /q, /quiet      Show warnings and errors only\n  \
                 /nologo         Do not show the logo\n\
                 Directives:\n  \
                 @<file>         Read further arguments from <file>\n  \
                 !<file>         Append all output to the log <file>"
            }
            keys::LABEL_ARGUMENTS => "arguments",
            keys::MISSING_VALUES => "No {0} given; at least {1} expected.",
            keys::TOO_FEW => "Too few {0}: at least {1} expected, {2} given.",
            keys::TOO_MANY => "Too many {0}: at most {1} expected, {2} given.",
            keys::UNKNOWN_SWITCH => "Unknown switch {0}.",
            keys::UNKNOWN_SWITCH_HINT => "Unknown switch {0}. Did you mean {1}?",
            keys::INVALID_ARGUMENTS => "{0}",
            keys::PARAMETER_FILE => "Could not read parameter file '{0}'.",
            keys::PARAMETER_FILE_CYCLE => "Parameter file '{0}' includes itself.",
            keys::PARAMETER_FILE_DEPTH => {
                "Parameter file '{0}' is nested deeper than {1} levels."
            }
            keys::PARAMETER_FILE_SYNTAX => {
                "Parameter file '{0}', line {1}: unclosed quote or dangling escape."
            }
            keys::LOG_FILE => "Log file '{0}' could not be opened.",
            keys::FOOTER => "Something went wrong. Use /? to show the usage.",
            keys::UNHANDLED => "Unhandled error: {0}",
            _ => return None,
        };
        Some(text)
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Flat key → template table, typically loaded from TOML.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse a TOML document. Nested tables flatten to dotted keys.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let table: toml::Table = toml::from_str(content)?;
        let mut catalog = Self::new();
        catalog.flatten("", &table)?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn flatten(&mut self, prefix: &str, table: &toml::Table) -> Result<(), CatalogError> {
        for (name, value) in table {
            let key = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            match value {
                toml::Value::String(text) => {
                    self.entries.insert(key, text.clone());
                }
                toml::Value::Table(inner) => self.flatten(&key, inner)?,
                _ => return Err(CatalogError::NotAString { key }),
            }
        }
        Ok(())
    }
}

impl MessageProvider for Catalog {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

// ============================================================================
// Bound providers
// ============================================================================

/// Application provider with a fallback, checked for required keys.
pub struct Messages {
    primary: Box<dyn MessageProvider>,
    fallback: Box<dyn MessageProvider>,
}

impl Messages {
    pub fn bind(
        primary: Box<dyn MessageProvider>,
        fallback: Box<dyn MessageProvider>,
    ) -> Result<Self, InitError> {
        let messages = Self { primary, fallback };
        if let Some(key) = REQUIRED_KEYS.iter().find(|key| messages.lookup(key).is_none()) {
            return Err(InitError::MissingMessage {
                key: (*key).to_string(),
            });
        }
        Ok(messages)
    }

    /// Bind an application provider over [`DefaultMessages`].
    pub fn with_defaults(primary: Box<dyn MessageProvider>) -> Result<Self, InitError> {
        Self::bind(primary, Box::new(DefaultMessages))
    }

    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.primary.get(key).or_else(|| self.fallback.get(key))
    }

    /// Text for `key`, or the key itself when neither provider knows it.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        match self.lookup(key) {
            Some(text) => text,
            None => {
                tracing::warn!(key, "message key not found in any catalog");
                key
            }
        }
    }

    pub fn format<S: AsRef<str>>(&self, key: &str, args: &[S]) -> String {
        render_template(self.get(key), args)
    }

    /// Render `message`, resolving its keyed arguments through the same providers.
    pub fn render(&self, message: &Message) -> String {
        let args: Vec<&str> = message
            .args
            .iter()
            .enumerate()
            .map(|(index, arg)| {
                if message.is_keyed_arg(index) {
                    self.get(arg)
                } else {
                    arg.as_str()
                }
            })
            .collect();
        self.format(&message.key, &args)
    }
}

impl std::fmt::Debug for Messages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Messages").finish_non_exhaustive()
    }
}

/// Substitute `{0}`, `{1}`, … with `args`. Placeholders without a matching
/// argument are kept verbatim.
pub fn render_template<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg.as_ref(), close))
        });
        match substituted {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_catalog() -> Catalog {
        Catalog::from_pairs([
            (keys::LOGO, "demo 1.0"),
            (keys::SYNTAX, "demo <file>"),
            (keys::HELP, "Does things."),
        ])
    }

    #[test]
    fn test_render_template() {
        assert_eq!(render_template("{0} and {1}", &["a", "b"]), "a and b");
        assert_eq!(render_template("{1}{0}", &["a", "b"]), "ba");
        assert_eq!(render_template("keep {2} {x} {", &["a"]), "keep {2} {x} {");
        assert_eq!(render_template::<&str>("plain", &[]), "plain");
    }

    #[test]
    fn test_catalog_flattens_tables() {
        let catalog = Catalog::from_toml_str(
            r#"
            [app]
            logo = "demo"

            [error]
            footer = "Oops."
            "#,
        )
        .unwrap();
        assert_eq!(catalog.get("app.logo"), Some("demo"));
        assert_eq!(catalog.get("error.footer"), Some("Oops."));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_catalog_rejects_non_strings() {
        let err = Catalog::from_toml_str("[app]\nlogo = 3\n").unwrap_err();
        assert!(matches!(err, CatalogError::NotAString { key } if key == "app.logo"));
    }

    #[test]
    fn test_primary_overrides_fallback() {
        let mut catalog = app_catalog();
        catalog.insert(keys::FOOTER, "Custom footer.");
        let messages = Messages::with_defaults(Box::new(catalog)).unwrap();
        assert_eq!(messages.get(keys::FOOTER), "Custom footer.");
        assert_eq!(messages.get(keys::LABEL_ARGUMENTS), "arguments");
        assert_eq!(
            messages.format(keys::UNKNOWN_SWITCH, &["/x"]),
            "Unknown switch /x."
        );
    }

    #[test]
    fn test_missing_required_key_fails_bind() {
        let catalog = Catalog::from_pairs([(keys::LOGO, "demo"), (keys::SYNTAX, "demo")]);
        let err = Messages::with_defaults(Box::new(catalog)).unwrap_err();
        assert!(matches!(err, InitError::MissingMessage { key } if key == keys::HELP));
    }

    #[test]
    fn test_unknown_key_echoes_key() {
        let messages = Messages::with_defaults(Box::new(app_catalog())).unwrap();
        assert_eq!(messages.get("no.such.key"), "no.such.key");
    }
}
