//! Error types for the dashboard.
//!
//! Three layers of failure exist:
//!
//! - [`HostError`]: a metrics-service call failed (command, timeout, parsing).
//! - [`RenderError`]: the rendering sink refused a tile.
//! - [`DashboardError`]: everything a caller of this crate sees, including
//!   the two above wrapped with the identity of the widget that hit them.

use std::io;
use thiserror::Error;

/// Error type for metrics-service operations.
#[derive(Debug, Error)]
pub enum HostError {
    /// The command could not be started at all.
    #[error("failed to spawn '{command}'")]
    Spawn {
        /// Program that failed to start.
        command: String,
    },

    /// The command did not finish within the configured timeout.
    #[error("'{command}' timed out after {timeout_ms}ms")]
    Timeout {
        /// Script that timed out.
        command: String,
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The command exited with a non-zero status.
    #[error("'{command}' failed: {message}")]
    CommandFailed {
        /// Script that failed.
        command: String,
        /// Captured stderr, trimmed.
        message: String,
    },

    /// The command output could not be interpreted.
    #[error("failed to parse {source_name}: {message}")]
    Parse {
        /// What was being parsed (e.g. `/proc/meminfo`).
        source_name: &'static str,
        /// Error message describing the failure.
        message: String,
    },

    /// A requested metric key does not exist on the host.
    #[error("unknown metric '{0}'")]
    UnknownMetric(String),

    /// The unit option is not a recognized byte unit.
    #[error("unknown unit '{0}' (expected b, kb, mb, gb or tb)")]
    UnknownUnit(String),
}

/// Error type for rendering-sink operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A bar chart was given a different number of values and labels.
    #[error("bar chart has {values} values but {labels} labels")]
    LengthMismatch {
        /// Number of values.
        values: usize,
        /// Number of labels.
        labels: usize,
    },

    /// A pass-through option has a value the sink cannot use.
    #[error("invalid value '{value}' for option '{key}'")]
    InvalidOption {
        /// Option key.
        key: String,
        /// Rejected value.
        value: String,
    },
}

/// Error type for dashboard operations.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The widget identifier is not in the catalog. Carries the name as written
    /// in the configuration, before alias resolution.
    #[error("can't find the widget {0}")]
    UnknownWidgetKind(String),

    /// The metrics service failed while a widget was being built.
    #[error("widget '{widget}' failed to fetch metrics: {source}")]
    MetricFetch {
        /// Canonical identifier of the widget.
        widget: &'static str,
        /// Underlying service failure.
        #[source]
        source: HostError,
    },

    /// The rendering sink failed while a widget was being drawn.
    #[error("widget '{widget}' failed to render: {source}")]
    Render {
        /// Canonical identifier of the widget.
        widget: &'static str,
        /// Underlying sink failure.
        #[source]
        source: RenderError,
    },

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// Configuration file exists but could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    ConfigRead {
        /// Path of the file.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Invalid configuration value.
    #[error("invalid configuration value for '{key}': {message}")]
    ConfigInvalid {
        /// The configuration key with invalid value.
        key: String,
        /// Error message describing why the value is invalid.
        message: String,
    },

    /// Terminal initialization or drawing error.
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;
