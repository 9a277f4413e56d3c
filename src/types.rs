//! Core types shared by configuration, builders and the rendering sink.
//!
//! - [`WidgetSpec`]: one dashboard tile as written in the configuration
//! - [`Options`]: the string-keyed option set attached to a tile
//! - [`Snapshot`]: the data fetched for one tile

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Option set attached to a widget. Keys the builders do not recognize are
/// passed through untouched to the rendering sink.
pub type Options = BTreeMap<String, String>;

/// Overrides the widget title. Accepted even when empty.
pub const OPTION_TITLE: &str = "title";
/// Byte unit used for I/O, memory and disk figures.
pub const OPTION_UNIT: &str = "unit";
/// Comma-separated metric keys (memory bar).
pub const OPTION_METRICS: &str = "metrics";
/// Comma-separated header labels.
pub const OPTION_HEADERS: &str = "headers";
/// Shell command whose output fills a generic table.
pub const OPTION_COMMAND: &str = "command";

/// Declarative description of one dashboard tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSpec {
    /// Widget identifier, e.g. `rh.box_uptime` or `lh.bar_memory`.
    #[serde(alias = "kind")]
    pub name: String,

    /// Widget options. Any YAML scalar is accepted and kept as a string.
    #[serde(default, deserialize_with = "scalar_map")]
    pub options: Options,
}

impl WidgetSpec {
    /// Creates a spec with no options.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), options: Options::new() }
    }

    /// Adds an option.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

fn scalar_map<'de, D>(deserializer: D) -> Result<Options, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml_ng::Value;

    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    let mut options = Options::new();

    for (key, value) in raw.unwrap_or_default() {
        let text = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            _ => {
                return Err(D::Error::custom(format!(
                    "option '{key}' must be a scalar value"
                )))
            }
        };
        options.insert(key, text);
    }

    Ok(options)
}

/// Data fetched for one widget, ready to hand to the rendering sink.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// Text for a text box.
    Text(String),

    /// Values and their labels for a bar chart, positionally aligned.
    Bars {
        /// Bar heights.
        values: Vec<u64>,
        /// One label per bar.
        labels: Vec<String>,
    },

    /// Table rows. When headers were requested they are the first row.
    Table(Vec<Vec<String>>),
}

impl Snapshot {
    /// Returns the text, if this is a text snapshot.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}
