//! Option resolution: caller-supplied value or widget default.
//!
//! Title and unit are taken whenever the key is present, even if empty.
//! List options (metrics, headers) only replace their default when the trimmed
//! value is non-empty; they are split on commas with each token trimmed and
//! the order kept.

use crate::types::{Options, OPTION_COMMAND, OPTION_HEADERS, OPTION_METRICS, OPTION_TITLE, OPTION_UNIT};

/// Read-only view over a widget's options.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    options: &'a Options,
}

impl<'a> Resolver<'a> {
    /// Wraps an option set.
    #[must_use]
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }

    /// The title override, or `default`.
    #[must_use]
    pub fn title(&self, default: impl Into<String>) -> String {
        match self.options.get(OPTION_TITLE) {
            Some(title) => title.clone(),
            None => default.into(),
        }
    }

    /// The unit override, or `default`.
    #[must_use]
    pub fn unit(&self, default: &str) -> String {
        self.options
            .get(OPTION_UNIT)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// The metrics list, if given and non-blank.
    #[must_use]
    pub fn metrics(&self) -> Option<Vec<String>> {
        self.list(OPTION_METRICS)
    }

    /// The headers list, if given and non-blank.
    #[must_use]
    pub fn headers(&self) -> Option<Vec<String>> {
        self.list(OPTION_HEADERS)
    }

    /// The shell command, if the key is present.
    #[must_use]
    pub fn command(&self) -> Option<&'a str> {
        self.options.get(OPTION_COMMAND).map(String::as_str)
    }

    fn list(&self, key: &str) -> Option<Vec<String>> {
        let raw = self.options.get(key)?.trim();
        if raw.is_empty() {
            return None;
        }
        Some(split_list(raw))
    }
}

/// Splits `"a, b,c"` into `["a", "b", "c"]`.
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|token| token.trim().to_string()).collect()
}

/// Titles embed the unit in upper case: `" Net I/O (KB) "`.
#[must_use]
pub fn unit_title(label: &str, unit: &str) -> String {
    format!(" {label} ({}) ", unit.to_uppercase())
}
