//! Widget construction.
//!
//! A [`WidgetSpec`] from the configuration goes through [`create_widget`]:
//!
//! 1. its identifier resolves to a [`WidgetKind`] (local aliases included),
//! 2. the matching builder fetches the data once,
//! 3. the result is a [`RenderJob`] the caller renders into a sink.
//!
//! ```rust,ignore
//! use hostdash::host::Host;
//! use hostdash::render::Tui;
//! use hostdash::types::WidgetSpec;
//! use hostdash::widgets::create_widget;
//!
//! let mut host = Host::local(std::time::Duration::from_secs(5));
//! let job = create_widget(&WidgetSpec::new("lh.box_uptime"), &mut host)?;
//! let mut tui = Tui::new();
//! job.render(&mut tui)?;
//! ```

pub mod builders;
pub mod job;
pub mod kind;
pub mod options;

pub use job::RenderJob;
pub use kind::{HostTarget, WidgetKind};

use crate::error::Result;
use crate::host::HostMetrics;
use crate::types::{Options, WidgetSpec};

/// Builds the render job for `spec` against `host`.
///
/// # Errors
///
/// Returns [`UnknownWidgetKind`](crate::error::DashboardError::UnknownWidgetKind)
/// with the configured name if it is not in the catalog, or
/// [`MetricFetch`](crate::error::DashboardError::MetricFetch) if the host call fails.
pub fn create_widget(spec: &WidgetSpec, host: &mut dyn HostMetrics) -> Result<RenderJob> {
    let (kind, target) = WidgetKind::resolve(&spec.name)?;
    crate::debug!("widgets", "building {} ({:?}) from '{}'", kind, target, spec.name);
    build(kind, &spec.options, host)
}

/// Runs the builder for `kind`.
///
/// # Errors
///
/// Returns an error if the host call fails.
pub fn build(kind: WidgetKind, options: &Options, host: &mut dyn HostMetrics) -> Result<RenderJob> {
    crate::time_scope!("widgets", kind.name());

    match kind {
        WidgetKind::Uptime => builders::box_uptime(options, host),
        WidgetKind::Load => builders::box_load(options, host),
        WidgetKind::Processes => builders::box_processes(options, host),
        WidgetKind::CpuRate => builders::box_cpu_rate(options, host),
        WidgetKind::MemoryRate => builders::box_memory_rate(options, host),
        WidgetKind::SwapRate => builders::box_swap_rate(options, host),
        WidgetKind::NetIo => builders::box_net_io(options, host),
        WidgetKind::DiskIo => builders::box_disk_io(options, host),
        WidgetKind::MemoryBar => builders::bar_memory(options, host),
        WidgetKind::RatesBar => builders::bar_rates(options, host),
        WidgetKind::DiskTable => builders::table_disk(options, host),
        WidgetKind::Table => builders::table(options, host),
    }
}
