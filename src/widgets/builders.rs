//! One builder per widget kind.
//!
//! Each builder resolves its options, makes its metrics-service call(s), and
//! binds the result into a [`RenderJob`]. A failed fetch returns early, so no
//! job exists for a widget whose data could not be read.

use super::job::RenderJob;
use super::kind::WidgetKind;
use super::options::{unit_title, Resolver};
use crate::error::{DashboardError, Result};
use crate::format::{format_percent, format_seconds};
use crate::host::{HostMetrics, HostResult};
use crate::types::{Options, Snapshot};

/// Default unit for I/O and memory widgets.
pub const DEFAULT_UNIT: &str = "kb";
/// Default unit for the disk table.
pub const DEFAULT_DISK_UNIT: &str = "gb";
/// Metric keys the memory bar shows by default.
pub const DEFAULT_MEMORY_METRICS: [&str; 3] = ["MemTotal", "MemFree", "MemAvailable"];
/// Column headers of the disk table, also the generic table's default.
pub const DISK_HEADERS: [&str; 6] = ["Filesystem", "Size", "Used", "Available", "Use%", "Mount"];
/// Listing used by the generic table without a `command` option: filesystem
/// usage, header row stripped, virtual filesystems excluded.
pub const DEFAULT_TABLE_COMMAND: &str = "/bin/df -x devtmpfs -x tmpfs -x debugfs | tail -n +2";
/// Series labels of the rates bar, in bar order.
pub const RATE_LABELS: [&str; 3] = ["CPU", "Memory", "Swap"];

fn fetch<T>(kind: WidgetKind, result: HostResult<T>) -> Result<T> {
    result.map_err(|source| {
        crate::warn!("widgets", "{} fetch failed: {}", kind.name(), source);
        DashboardError::MetricFetch { widget: kind.name(), source }
    })
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn text_box(
    kind: WidgetKind,
    default_title: &str,
    options: &Options,
    content: impl FnOnce() -> HostResult<String>,
) -> Result<RenderJob> {
    let title = Resolver::new(options).title(default_title);
    let content = fetch(kind, content())?;
    Ok(RenderJob::new(kind, title, options, Snapshot::Text(content)))
}

/// `rh.box_uptime`: time since boot.
pub fn box_uptime(options: &Options, host: &mut dyn HostMetrics) -> Result<RenderJob> {
    let kind = WidgetKind::Uptime;
    text_box(kind, " Uptime ", options, || host.uptime().map(format_seconds))
}

/// `rh.box_load`: load averages.
pub fn box_load(options: &Options, host: &mut dyn HostMetrics) -> Result<RenderJob> {
    text_box(WidgetKind::Load, " Load ", options, || host.load())
}

/// `rh.box_processes`: process count.
pub fn box_processes(options: &Options, host: &mut dyn HostMetrics) -> Result<RenderJob> {
    text_box(WidgetKind::Processes, " Running processes ", options, || host.processes())
}

/// `rh.box_cpu_rate`: CPU utilization, e.g. `"42.00 %"`.
pub fn box_cpu_rate(options: &Options, host: &mut dyn HostMetrics) -> Result<RenderJob> {
    text_box(WidgetKind::CpuRate, " CPU usage ", options, || host.cpu_rate().map(format_percent))
}

/// `rh.box_memory_rate`: memory utilization.
pub fn box_memory_rate(options: &Options, host: &mut dyn HostMetrics) -> Result<RenderJob> {
    text_box(WidgetKind::MemoryRate, " Memory usage ", options, || {
        host.memory_rate().map(format_percent)
    })
}

/// `rh.box_swap_rate`: swap utilization.
pub fn box_swap_rate(options: &Options, host: &mut dyn HostMetrics) -> Result<RenderJob> {
    text_box(WidgetKind::SwapRate, " Swap usage ", options, || host.swap_rate().map(format_percent))
}

/// `rh.box_net_io`: network traffic in the chosen unit.
pub fn box_net_io(options: &Options, host: &mut dyn HostMetrics) -> Result<RenderJob> {
    let unit = Resolver::new(options).unit(DEFAULT_UNIT);
    let default_title = unit_title("Net I/O", &unit);
    text_box(WidgetKind::NetIo, &default_title, options, || host.net_io(&unit))
}

/// `rh.box_disk_io`: disk traffic in the chosen unit.
pub fn box_disk_io(options: &Options, host: &mut dyn HostMetrics) -> Result<RenderJob> {
    let unit = Resolver::new(options).unit(DEFAULT_UNIT);
    let default_title = unit_title("Disk I/O", &unit);
    text_box(WidgetKind::DiskIo, &default_title, options, || host.disk_io(&unit))
}

/// `rh.bar_memory`: one bar per meminfo key.
///
/// Bar labels come from `headers` and are independent of `metrics`; they
/// default to the metric keys.
pub fn bar_memory(options: &Options, host: &mut dyn HostMetrics) -> Result<RenderJob> {
    let kind = WidgetKind::MemoryBar;
    let resolver = Resolver::new(options);

    let metrics = resolver.metrics().unwrap_or_else(|| owned(&DEFAULT_MEMORY_METRICS));
    let labels = resolver.headers().unwrap_or_else(|| metrics.clone());
    let unit = resolver.unit(DEFAULT_UNIT);
    let title = resolver.title(unit_title("Memory", &unit));

    let values = fetch(kind, host.memory(&metrics, &unit))?;
    Ok(RenderJob::new(kind, title, options, Snapshot::Bars { values, labels }))
}

/// `rh.bar_rates`: CPU, memory and swap utilization as whole percentages.
///
/// Fetches run swap, then CPU, then memory.
pub fn bar_rates(options: &Options, host: &mut dyn HostMetrics) -> Result<RenderJob> {
    let kind = WidgetKind::RatesBar;
    let title = Resolver::new(options).title(" Resources usage (%) ");

    let swap = fetch(kind, host.swap_rate())?;
    let cpu = fetch(kind, host.cpu_rate())?;
    let memory = fetch(kind, host.memory_rate())?;

    let values = [cpu, memory, swap].into_iter().map(|rate| rate.max(0.0) as u64).collect();
    Ok(RenderJob::new(kind, title, options, Snapshot::Bars { values, labels: owned(&RATE_LABELS) }))
}

/// `rh.table_disk`: filesystem usage with fixed headers.
pub fn table_disk(options: &Options, host: &mut dyn HostMetrics) -> Result<RenderJob> {
    let kind = WidgetKind::DiskTable;
    let resolver = Resolver::new(options);

    let unit = resolver.unit(DEFAULT_DISK_UNIT);
    let title = resolver.title(" Disks ");
    let headers = owned(&DISK_HEADERS);

    let rows = fetch(kind, host.disk(&headers, &unit))?;
    Ok(RenderJob::new(kind, title, options, Snapshot::Table(rows)))
}

/// Headers the generic table asks for. A custom command drops the default
/// headers; an explicit `headers` option always wins.
#[must_use]
pub fn table_headers(options: &Options) -> Vec<String> {
    let resolver = Resolver::new(options);
    let fallback = if resolver.command().is_some() { Vec::new() } else { owned(&DISK_HEADERS) };
    resolver.headers().unwrap_or(fallback)
}

/// `rh.table`: any command's output as a table.
pub fn table(options: &Options, host: &mut dyn HostMetrics) -> Result<RenderJob> {
    let kind = WidgetKind::Table;
    let resolver = Resolver::new(options);

    let title = resolver.title(" Table ");
    let command = resolver.command().unwrap_or(DEFAULT_TABLE_COMMAND);
    let headers = table_headers(options);

    let rows = fetch(kind, host.table(command, &headers))?;
    Ok(RenderJob::new(kind, title, options, Snapshot::Table(rows)))
}
