//! Host metrics service.
//!
//! [`HostMetrics`] is what widget builders consume. [`Host`] implements it by
//! running small shell scripts through a [`Shell`], either locally or over
//! SSH, and parsing procfs/coreutils output with the functions in
//! [`procfs`]. Every method is one round trip to the host.

pub mod procfs;
pub mod shell;
pub mod unit;

pub use shell::Shell;
pub use unit::ByteUnit;

use crate::error::HostError;
use procfs::MemInfo;
use std::time::Duration;

/// Result type for metrics-service calls.
pub type HostResult<T> = std::result::Result<T, HostError>;

/// The metrics a dashboard can ask a host for.
///
/// Implementations may block on I/O; callers make exactly one call per
/// figure they need.
pub trait HostMetrics {
    /// 1, 5 and 15 minute load averages, space-separated.
    fn load(&mut self) -> HostResult<String>;

    /// Number of processes.
    fn processes(&mut self) -> HostResult<String>;

    /// Seconds since boot.
    fn uptime(&mut self) -> HostResult<u64>;

    /// CPU utilization in percent (0-100).
    fn cpu_rate(&mut self) -> HostResult<f64>;

    /// Memory utilization in percent (0-100).
    fn memory_rate(&mut self) -> HostResult<f64>;

    /// Swap utilization in percent (0-100).
    fn swap_rate(&mut self) -> HostResult<f64>;

    /// Network bytes received and sent, in `unit`.
    fn net_io(&mut self, unit: &str) -> HostResult<String>;

    /// Disk bytes read and written, in `unit`.
    fn disk_io(&mut self, unit: &str) -> HostResult<String>;

    /// Values for `metrics` (meminfo keys) in `unit`, one per key in order.
    fn memory(&mut self, metrics: &[String], unit: &str) -> HostResult<Vec<u64>>;

    /// Filesystem usage rows with `headers` as the first row.
    fn disk(&mut self, headers: &[String], unit: &str) -> HostResult<Vec<Vec<String>>>;

    /// Output of `command` split into cells, `headers` first when non-empty.
    fn table(&mut self, command: &str, headers: &[String]) -> HostResult<Vec<Vec<String>>>;
}

/// Metrics service backed by shell commands on a local or SSH host.
#[derive(Debug, Clone)]
pub struct Host {
    shell: Shell,
    timeout: Duration,
    cpu_sample: Duration,
}

impl Host {
    /// Creates a service for the machine running the dashboard.
    #[must_use]
    pub fn local(timeout: Duration) -> Self {
        Self::new(Shell::Local, timeout)
    }

    /// Creates a service that reaches `username@address:port` over SSH.
    #[must_use]
    pub fn ssh(username: impl Into<String>, address: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self::new(
            Shell::Ssh { username: username.into(), address: address.into(), port },
            timeout,
        )
    }

    /// Creates a service on an arbitrary shell.
    #[must_use]
    pub fn new(shell: Shell, timeout: Duration) -> Self {
        Self { shell, timeout, cpu_sample: Duration::from_millis(200) }
    }

    /// Sets the gap between the two `/proc/stat` samples of [`cpu_rate`](HostMetrics::cpu_rate).
    #[must_use]
    pub fn with_cpu_sample(mut self, gap: Duration) -> Self {
        self.cpu_sample = gap;
        self
    }

    fn run(&self, script: &str) -> HostResult<String> {
        self.shell.run(script, self.timeout + self.cpu_sample)
    }

    fn meminfo(&self) -> HostResult<MemInfo> {
        MemInfo::parse(&self.run("cat /proc/meminfo")?)
    }
}

fn with_headers(headers: &[String], mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    if !headers.is_empty() {
        rows.insert(0, headers.to_vec());
    }
    rows
}

impl HostMetrics for Host {
    fn load(&mut self) -> HostResult<String> {
        procfs::parse_loadavg(&self.run("cat /proc/loadavg")?)
    }

    fn processes(&mut self) -> HostResult<String> {
        procfs::parse_count("ps", &self.run("ps -e --no-headers | wc -l")?)
    }

    fn uptime(&mut self) -> HostResult<u64> {
        procfs::parse_uptime(&self.run("cat /proc/uptime")?)
    }

    fn cpu_rate(&mut self) -> HostResult<f64> {
        let script = format!(
            "head -n 1 /proc/stat; sleep {:.3}; head -n 1 /proc/stat",
            self.cpu_sample.as_secs_f64()
        );
        procfs::parse_cpu_samples(&self.run(&script)?)
    }

    fn memory_rate(&mut self) -> HostResult<f64> {
        self.meminfo()?.memory_rate()
    }

    fn swap_rate(&mut self) -> HostResult<f64> {
        self.meminfo()?.swap_rate()
    }

    fn net_io(&mut self, unit: &str) -> HostResult<String> {
        let unit: ByteUnit = unit.parse()?;
        let (rx, tx) = procfs::parse_net_dev(&self.run("cat /proc/net/dev")?)?;
        Ok(format!("RX {} / TX {}", unit.from_bytes(rx), unit.from_bytes(tx)))
    }

    fn disk_io(&mut self, unit: &str) -> HostResult<String> {
        let unit: ByteUnit = unit.parse()?;
        let (read, written) = procfs::parse_diskstats(&self.run("cat /proc/diskstats")?)?;
        Ok(format!("R {} / W {}", unit.from_bytes(read), unit.from_bytes(written)))
    }

    fn memory(&mut self, metrics: &[String], unit: &str) -> HostResult<Vec<u64>> {
        let unit: ByteUnit = unit.parse()?;
        self.meminfo()?.values(metrics, unit)
    }

    fn disk(&mut self, headers: &[String], unit: &str) -> HostResult<Vec<Vec<String>>> {
        let unit: ByteUnit = unit.parse()?;
        let output = self.run(
            "df -B1 --output=source,size,used,avail,pcent,target -x devtmpfs -x tmpfs -x debugfs",
        )?;
        Ok(with_headers(headers, procfs::parse_df(&output, unit)?))
    }

    fn table(&mut self, command: &str, headers: &[String]) -> HostResult<Vec<Vec<String>>> {
        let output = self.run(command)?;
        Ok(with_headers(headers, procfs::split_rows(&output)))
    }
}
