//! Helpers for application switch and argument validation.
//!
//! - Value count checks
//! - Unknown switch errors
//! - Switch suggestion via Levenshtein distance

use strsim::levenshtein;

use crate::error::{AppError, ErrorKind, Message};
use crate::messages::keys;

/// Check that `values` holds between `min` and `max` entries.
///
/// `label` names the checked thing in the error (a switch name, usually);
/// without one the message uses the `label.arguments` text of the bound
/// catalogs.
pub fn ensure_count(
    values: Option<&[String]>,
    min: usize,
    max: usize,
    label: Option<&str>,
) -> Result<(), AppError> {
    let count_error = |key: &'static str, bound: usize, given: Option<usize>| {
        let mut args = vec![label.unwrap_or(keys::LABEL_ARGUMENTS).to_string(), bound.to_string()];
        args.extend(given.map(|n| n.to_string()));
        let mut message = Message::new(key, args);
        if label.is_none() {
            // Resolved at report time so a catalog can reword "arguments".
            message = message.with_keyed_arg(0);
        }
        AppError::new(ErrorKind::InvalidArgumentCount, message)
    };

    let Some(values) = values else {
        return Err(count_error(keys::MISSING_VALUES, min, None));
    };
    let given = values.len();
    if given < min {
        return Err(count_error(keys::TOO_FEW, min, Some(given)));
    }
    if given > max {
        return Err(count_error(keys::TOO_MANY, max, Some(given)));
    }
    Ok(())
}

/// Error for a switch the application does not know.
pub fn unknown_switch(name: &str) -> AppError {
    AppError::new(
        ErrorKind::UnknownSwitch,
        Message::new(keys::UNKNOWN_SWITCH, vec![name.to_string()]),
    )
}

/// Like [`unknown_switch`], with a "did you mean" hint when one of `known`
/// is close enough.
pub fn unknown_switch_among(name: &str, known: &[&str]) -> AppError {
    match suggest_switch(name, known) {
        Some(suggestion) => AppError::new(
            ErrorKind::UnknownSwitch,
            Message::new(
                keys::UNKNOWN_SWITCH_HINT,
                vec![name.to_string(), suggestion.to_string()],
            ),
        ),
        None => unknown_switch(name),
    }
}

/// Suggest a similar switch using Levenshtein distance.
/// Returns Some(suggestion) if a close match is found (distance <= 2).
pub fn suggest_switch<'a>(input: &str, known: &[&'a str]) -> Option<&'a str> {
    let input_lower = input.to_lowercase();
    let mut best_match: Option<(&str, usize)> = None;

    for &candidate in known {
        let distance = levenshtein(&input_lower, &candidate.to_lowercase());
        if distance > 2 {
            continue;
        }
        match best_match {
            Some((_, best_dist)) if distance >= best_dist => {}
            _ => best_match = Some((candidate, distance)),
        }
    }

    best_match.map(|(candidate, _)| candidate)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Catalog, Messages};

    fn values(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("v{i}")).collect()
    }

    #[test]
    fn test_ensure_count_exactly_one() {
        assert!(ensure_count(Some(&values(1)), 1, 1, Some("/A")).is_ok());

        let none = ensure_count(Some(&values(0)), 1, 1, Some("/A")).unwrap_err();
        assert_eq!(none.kind(), ErrorKind::InvalidArgumentCount);
        assert_eq!(none.to_string(), "Too few /A: at least 1 expected, 0 given.");

        let two = ensure_count(Some(&values(2)), 1, 1, Some("/A")).unwrap_err();
        assert_eq!(two.kind(), ErrorKind::InvalidArgumentCount);
        assert_eq!(two.to_string(), "Too many /A: at most 1 expected, 2 given.");
    }

    #[test]
    fn test_ensure_count_absent_values() {
        let err = ensure_count(None, 1, 2, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgumentCount);
        assert!(err.to_string().contains("arguments"));
        assert!(err.to_string().contains('1'));
    }

    #[test]
    fn test_ensure_count_default_label() {
        let err = ensure_count(Some(&values(3)), 1, 2, None).unwrap_err();
        assert_eq!(err.to_string(), "Too many arguments: at most 2 expected, 3 given.");
        assert!(ensure_count(Some(&values(2)), 1, 2, None).is_ok());
        assert!(ensure_count(Some(&values(0)), 0, usize::MAX, None).is_ok());
    }

    #[test]
    fn test_default_label_follows_the_catalog() {
        let catalog = Catalog::from_pairs([
            (keys::LOGO, "demo"),
            (keys::SYNTAX, "demo"),
            (keys::HELP, "demo"),
            (keys::LABEL_ARGUMENTS, "files"),
        ]);
        let messages = Messages::with_defaults(Box::new(catalog)).unwrap();

        let err = ensure_count(Some(&values(3)), 1, 2, None).unwrap_err();
        assert_eq!(
            messages.render(err.message()),
            "Too many files: at most 2 expected, 3 given."
        );

        let named = ensure_count(Some(&values(3)), 1, 2, Some("label.arguments")).unwrap_err();
        assert!(messages.render(named.message()).starts_with("Too many label.arguments:"));
    }

    #[test]
    fn test_unknown_switch_names_switch() {
        let err = unknown_switch("/bogus");
        assert_eq!(err.kind(), ErrorKind::UnknownSwitch);
        assert!(err.to_string().contains("/bogus"));
    }

    #[test]
    fn test_unknown_switch_with_hint() {
        let known = ["/EXCLUDE", "/S", "/Y"];
        let err = unknown_switch_among("/exlude", &known);
        assert_eq!(err.kind(), ErrorKind::UnknownSwitch);
        assert!(err.to_string().contains("Did you mean /EXCLUDE?"));

        let far = unknown_switch_among("/recursive", &known);
        assert!(!far.to_string().contains("Did you mean"));
    }

    #[test]
    fn test_suggest_switch() {
        let known = ["/verbose", "/quiet", "/help"];
        assert_eq!(suggest_switch("/verbos", &known), Some("/verbose"));
        assert_eq!(suggest_switch("/QUIET", &known), Some("/quiet"));
        assert_eq!(suggest_switch("/completely-different", &known), None);
    }
}
