//! Widget catalog and identifier resolution.

use crate::error::{DashboardError, Result};
use std::fmt;

/// Which host a widget reads its metrics from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostTarget {
    /// The machine running the dashboard (`lh.` identifiers).
    Local,
    /// The configured SSH host (`rh.` identifiers).
    Remote,
}

/// The twelve widgets the dashboard knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Time since boot.
    Uptime,
    /// 1/5/15 minute load averages.
    Load,
    /// Number of processes.
    Processes,
    /// CPU utilization.
    CpuRate,
    /// Memory utilization.
    MemoryRate,
    /// Swap utilization.
    SwapRate,
    /// Network bytes received and sent.
    NetIo,
    /// Disk bytes read and written.
    DiskIo,
    /// Bar chart of `/proc/meminfo` entries.
    MemoryBar,
    /// Bar chart of CPU, memory and swap utilization.
    RatesBar,
    /// Filesystem usage table.
    DiskTable,
    /// Table filled from a shell command.
    Table,
}

impl WidgetKind {
    /// Every kind, in catalog order.
    pub const ALL: [WidgetKind; 12] = [
        WidgetKind::Uptime,
        WidgetKind::Load,
        WidgetKind::Processes,
        WidgetKind::CpuRate,
        WidgetKind::MemoryRate,
        WidgetKind::SwapRate,
        WidgetKind::NetIo,
        WidgetKind::DiskIo,
        WidgetKind::MemoryBar,
        WidgetKind::RatesBar,
        WidgetKind::DiskTable,
        WidgetKind::Table,
    ];

    /// Canonical (remote host) identifier.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            WidgetKind::Uptime => "rh.box_uptime",
            WidgetKind::Load => "rh.box_load",
            WidgetKind::Processes => "rh.box_processes",
            WidgetKind::CpuRate => "rh.box_cpu_rate",
            WidgetKind::MemoryRate => "rh.box_memory_rate",
            WidgetKind::SwapRate => "rh.box_swap_rate",
            WidgetKind::NetIo => "rh.box_net_io",
            WidgetKind::DiskIo => "rh.box_disk_io",
            WidgetKind::MemoryBar => "rh.bar_memory",
            WidgetKind::RatesBar => "rh.bar_rates",
            WidgetKind::DiskTable => "rh.table_disk",
            WidgetKind::Table => "rh.table",
        }
    }

    /// Local host alias of [`name`](Self::name).
    #[must_use]
    pub fn local_name(self) -> &'static str {
        match self {
            WidgetKind::Uptime => "lh.box_uptime",
            WidgetKind::Load => "lh.box_load",
            WidgetKind::Processes => "lh.box_processes",
            WidgetKind::CpuRate => "lh.box_cpu_rate",
            WidgetKind::MemoryRate => "lh.box_memory_rate",
            WidgetKind::SwapRate => "lh.box_swap_rate",
            WidgetKind::NetIo => "lh.box_net_io",
            WidgetKind::DiskIo => "lh.box_disk_io",
            WidgetKind::MemoryBar => "lh.bar_memory",
            WidgetKind::RatesBar => "lh.bar_rates",
            WidgetKind::DiskTable => "lh.table_disk",
            WidgetKind::Table => "lh.table",
        }
    }

    /// Resolves a configured identifier to a kind and the host it targets.
    ///
    /// Only whole identifiers match; there is no prefix rewriting.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::UnknownWidgetKind`] carrying `name` unchanged.
    pub fn resolve(name: &str) -> Result<(WidgetKind, HostTarget)> {
        for kind in Self::ALL {
            if kind.name() == name {
                return Ok((kind, HostTarget::Remote));
            }
            if kind.local_name() == name {
                return Ok((kind, HostTarget::Local));
            }
        }
        Err(DashboardError::UnknownWidgetKind(name.to_string()))
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
