//! # hostdash
//!
//! Terminal dashboard of host metrics, read from the local machine or from a
//! remote one over SSH.
//!
//! A YAML file lists widgets by identifier (`rh.box_uptime`, `lh.bar_rates`,
//! ...). Each refresh, every widget fetches its figures through a
//! [`host::HostMetrics`] service and draws them into a
//! [`render::RenderSink`] as a text box, a bar chart or a table.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hostdash::prelude::*;
//!
//! let config = Config::parse("widgets:\n  - name: lh.box_load\n")?;
//! config.validate()?;
//! App::new(config).run()?;
//! ```
//!
//! ## Widget identifiers
//!
//! | Remote | Local | Shows |
//! |--------|-------|-------|
//! | `rh.box_uptime` | `lh.box_uptime` | time since boot |
//! | `rh.box_load` | `lh.box_load` | load averages |
//! | `rh.box_processes` | `lh.box_processes` | process count |
//! | `rh.box_cpu_rate` | `lh.box_cpu_rate` | CPU utilization |
//! | `rh.box_memory_rate` | `lh.box_memory_rate` | memory utilization |
//! | `rh.box_swap_rate` | `lh.box_swap_rate` | swap utilization |
//! | `rh.box_net_io` | `lh.box_net_io` | network traffic |
//! | `rh.box_disk_io` | `lh.box_disk_io` | disk traffic |
//! | `rh.bar_memory` | `lh.bar_memory` | meminfo values |
//! | `rh.bar_rates` | `lh.bar_rates` | CPU, memory and swap rates |
//! | `rh.table_disk` | `lh.table_disk` | filesystem usage |
//! | `rh.table` | `lh.table` | any command's output |

#![warn(missing_docs)]
// Allow unwrap() in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]

// ============================================================================
// Core Modules
// ============================================================================

/// Error types.
pub mod error;

/// Debug logging.
pub mod debug;

/// Shared data types.
pub mod types;

/// Value formatting.
pub mod format;

/// Configuration.
pub mod config;

// ============================================================================
// Metrics
// ============================================================================

/// Subprocess execution with timeouts.
pub mod subprocess;

/// Host metrics service.
pub mod host;

// ============================================================================
// Dashboard
// ============================================================================

/// Widget catalog and construction.
pub mod widgets;

/// Rendering sinks.
pub mod render;

/// Keyboard input.
pub mod input;

/// Main application loop.
pub mod app;

// Re-export ratatui for sink implementors
pub use ratatui;

pub use app::App;
pub use config::Config;
pub use error::{DashboardError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::app::App;
    pub use crate::config::Config;
    pub use crate::error::{DashboardError, HostError, RenderError, Result};
    pub use crate::host::{Host, HostMetrics};
    pub use crate::render::{RenderSink, Tui};
    pub use crate::types::{Options, Snapshot, WidgetSpec};
    pub use crate::widgets::{create_widget, HostTarget, RenderJob, WidgetKind};
}
