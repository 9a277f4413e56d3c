//! Dashboard configuration.
//!
//! A YAML file lists the widgets to show, in order, plus the optional SSH host
//! that `rh.*` widgets read from.

use crate::error::{DashboardError, Result};
use crate::types::WidgetSpec;
use crate::widgets::{HostTarget, WidgetKind};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Global settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Seconds between two rebuilds of every widget.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,

    /// Timeout for a single metrics command, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_refresh_secs() -> u64 {
    60
}
fn default_timeout_ms() -> u64 {
    5000
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { refresh_secs: default_refresh_secs(), timeout_ms: default_timeout_ms() }
    }
}

/// SSH host for `rh.*` widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Login name. Empty uses the SSH client's default.
    #[serde(default)]
    pub username: String,

    /// Host name or IP address.
    pub address: String,

    /// SSH port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    22
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Remote host, required by `rh.*` widgets.
    #[serde(default)]
    pub host: Option<HostConfig>,

    /// Widgets, top to bottom.
    #[serde(default)]
    pub widgets: Vec<WidgetSpec>,
}

impl Config {
    /// Creates a configuration with default values and no widgets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration path: `<config dir>/hostdash/config.yaml`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("hostdash").join("config.yaml"))
            .unwrap_or_else(|| PathBuf::from("hostdash.yaml"))
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::ConfigNotFound`] if the file does not exist,
    /// or another error if it cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DashboardError::ConfigNotFound(path.display().to_string()),
            _ => DashboardError::ConfigRead { path: path.display().to_string(), source: e },
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            DashboardError::ConfigParse { line, message: e.to_string() }
        })
    }

    /// Loads configuration, falling back to defaults only if the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(path) {
            Err(DashboardError::ConfigNotFound(path)) => {
                crate::info!("config", "{} not found, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Checks settings that parse but cannot work.
    ///
    /// Unknown widget names are not rejected here; they surface per widget
    /// when the dashboard is built.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero refresh interval or timeout, or for a
    /// remote widget without a `host` section.
    pub fn validate(&self) -> Result<()> {
        if self.general.refresh_secs == 0 {
            return Err(DashboardError::ConfigInvalid {
                key: "general.refresh_secs".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.general.timeout_ms == 0 {
            return Err(DashboardError::ConfigInvalid {
                key: "general.timeout_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }

        if self.host.is_none() {
            let remote = self.widgets.iter().find(|w| {
                matches!(WidgetKind::resolve(&w.name), Ok((_, HostTarget::Remote)))
            });
            if let Some(widget) = remote {
                return Err(DashboardError::ConfigInvalid {
                    key: "host".to_string(),
                    message: format!("widget '{}' needs a remote host", widget.name),
                });
            }
        }

        Ok(())
    }

    /// Returns the refresh interval as a Duration.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.general.refresh_secs)
    }

    /// Returns the command timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.general.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r#"
general:
  refresh_secs: 30
  timeout_ms: 2000
host:
  username: deploy
  address: 10.0.0.5
widgets:
  - name: lh.box_uptime
    options:
      title: " Up "
  - name: rh.bar_memory
    options: { metrics: "MemTotal,MemFree", unit: mb, height: 10 }
"#;

    #[test]
    fn test_config_default() {
        let config = Config::new();

        assert_eq!(config.general.refresh_secs, 60);
        assert_eq!(config.general.timeout_ms, 5000);
        assert!(config.host.is_none());
        assert!(config.widgets.is_empty());
    }

    #[test]
    fn test_config_parse_full() {
        let config = Config::parse(FULL).unwrap();

        assert_eq!(config.general.refresh_secs, 30);
        assert_eq!(config.timeout(), Duration::from_millis(2000));
        let host = config.host.as_ref().unwrap();
        assert_eq!(host.username, "deploy");
        assert_eq!(host.port, 22);
        assert_eq!(config.widgets.len(), 2);
        assert_eq!(config.widgets[0].options["title"], " Up ");
        assert_eq!(config.widgets[1].options["height"], "10");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_error_includes_line() {
        let yaml = r#"
general:
  refresh_secs: 10
  timeout_ms: not_a_number
"#;

        let err = Config::parse(yaml).unwrap_err();
        assert!(matches!(err, DashboardError::ConfigParse { .. }));
        assert!(err.to_string().contains('4'), "Error should include line number: {err}");
    }

    #[test]
    fn test_validate_remote_widget_needs_host() {
        let config = Config::parse("widgets:\n  - name: rh.box_load\n").unwrap();
        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("rh.box_load"), "{err}");
    }

    #[test]
    fn test_validate_local_widgets_without_host() {
        let config = Config::parse("widgets:\n  - name: lh.box_load\n  - name: nonsense\n").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_refresh() {
        let config = Config::parse("general:\n  refresh_secs: 0\n").unwrap();
        assert!(matches!(config.validate(), Err(DashboardError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.refresh_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_load_missing() {
        assert!(matches!(
            Config::load("/nonexistent/hostdash.yaml"),
            Err(DashboardError::ConfigNotFound(_))
        ));
        let config = Config::load_or_default("/nonexistent/hostdash.yaml").unwrap();
        assert_eq!(config.general.refresh_secs, 60);
    }

    #[test]
    fn test_load_or_default_keeps_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"general:\n  refresh_secs: 10\n  timeout_ms: not_a_number\n").unwrap();

        let err = Config::load_or_default(file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::ConfigParse { line: 3, .. }), "{err}");
    }

    #[test]
    fn test_load_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_or_default(dir.path()).unwrap_err();
        assert!(matches!(err, DashboardError::ConfigRead { .. }), "{err}");
    }

    #[test]
    fn test_default_path_ends_with_file_name() {
        assert!(Config::default_path().ends_with("config.yaml") || Config::default_path().ends_with("hostdash.yaml"));
    }
}
