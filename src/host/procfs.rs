//! Parsers for procfs and coreutils output.
//!
//! All functions here are pure: they take the text a command printed and
//! return figures, so they work the same whether the text came from this
//! machine or over SSH.

use crate::error::HostError;
use crate::host::unit::ByteUnit;
use std::collections::HashMap;

type Result<T> = std::result::Result<T, HostError>;

fn parse_error(source_name: &'static str, message: impl Into<String>) -> HostError {
    HostError::Parse { source_name, message: message.into() }
}

/// `"0.52 0.58 0.59 1/523 12345"` -> `"0.52 0.58 0.59"`.
pub fn parse_loadavg(content: &str) -> Result<String> {
    let fields: Vec<&str> = content.split_whitespace().take(3).collect();
    if fields.len() < 3 {
        return Err(parse_error("/proc/loadavg", format!("expected 3 fields in '{}'", content.trim())));
    }
    Ok(fields.join(" "))
}

/// Whole seconds from `/proc/uptime`.
pub fn parse_uptime(content: &str) -> Result<u64> {
    content
        .split_whitespace()
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|secs| *secs >= 0.0)
        .map(|secs| secs as u64)
        .ok_or_else(|| parse_error("/proc/uptime", format!("unexpected content '{}'", content.trim())))
}

/// A positive integer count, e.g. the output of `wc -l`.
pub fn parse_count(source_name: &'static str, content: &str) -> Result<String> {
    let trimmed = content.trim();
    trimmed
        .parse::<u64>()
        .map(|n| n.to_string())
        .map_err(|e| parse_error(source_name, format!("'{trimmed}': {e}")))
}

/// Aggregate CPU times from one `cpu` line of `/proc/stat`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuStats {
    user: u64,
    nice: u64,
    system: u64,
    idle: u64,
    iowait: u64,
    irq: u64,
    softirq: u64,
    steal: u64,
}

impl CpuStats {
    fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }

    fn idle_time(&self) -> u64 {
        self.idle + self.iowait
    }

    /// Parses `cpu  user nice system idle iowait irq softirq steal ...`.
    pub fn parse(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 5 || !parts[0].starts_with("cpu") {
            return Err(parse_error("/proc/stat", format!("invalid cpu line '{line}'")));
        }

        let field = |i: usize| parts.get(i).and_then(|s| s.parse().ok()).unwrap_or(0);
        Ok(CpuStats {
            user: field(1),
            nice: field(2),
            system: field(3),
            idle: field(4),
            iowait: field(5),
            irq: field(6),
            softirq: field(7),
            steal: field(8),
        })
    }

    /// Busy percentage between two samples; 0 when no time elapsed.
    #[must_use]
    pub fn busy_percent(prev: &CpuStats, curr: &CpuStats) -> f64 {
        let total_delta = curr.total().saturating_sub(prev.total());
        let idle_delta = curr.idle_time().saturating_sub(prev.idle_time());

        if total_delta == 0 {
            return 0.0;
        }

        let used_delta = total_delta.saturating_sub(idle_delta);
        (used_delta as f64 / total_delta as f64) * 100.0
    }
}

/// CPU rate from output holding two aggregate `cpu ` lines, oldest first.
pub fn parse_cpu_samples(content: &str) -> Result<f64> {
    let samples: Vec<CpuStats> = content
        .lines()
        .filter(|line| line.starts_with("cpu "))
        .map(CpuStats::parse)
        .collect::<Result<_>>()?;

    match samples.as_slice() {
        [prev, curr, ..] => Ok(CpuStats::busy_percent(prev, curr)),
        _ => Err(parse_error("/proc/stat", format!("expected 2 samples, got {}", samples.len()))),
    }
}

/// Entries of `/proc/meminfo`. Values carrying a `kB` suffix are stored in
/// bytes; unitless entries (`HugePages_Total`) are stored as-is.
#[derive(Debug, Clone, Default)]
pub struct MemInfo {
    entries: HashMap<String, u64>,
}

impl MemInfo {
    /// Parses `/proc/meminfo`.
    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = HashMap::new();

        for line in content.lines() {
            let Some((key, rest)) = line.split_once(':') else {
                continue;
            };
            let mut parts = rest.split_whitespace();
            let Some(value) = parts.next().and_then(|v| v.parse::<u64>().ok()) else {
                continue;
            };
            let value = if parts.next() == Some("kB") { value.saturating_mul(1024) } else { value };
            entries.insert(key.trim().to_string(), value);
        }

        if entries.is_empty() {
            return Err(parse_error("/proc/meminfo", "no entries found"));
        }
        Ok(Self { entries })
    }

    /// Returns an entry by its `/proc/meminfo` key, e.g. `MemTotal`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries.get(key).copied()
    }

    /// Looks up `keys` in order and converts each to `unit`.
    pub fn values(&self, keys: &[String], unit: ByteUnit) -> Result<Vec<u64>> {
        keys.iter()
            .map(|key| {
                self.get(key)
                    .map(|bytes| unit.from_bytes(bytes))
                    .ok_or_else(|| HostError::UnknownMetric(key.clone()))
            })
            .collect()
    }

    fn required(&self, key: &str) -> Result<u64> {
        self.get(key)
            .ok_or_else(|| parse_error("/proc/meminfo", format!("missing {key}")))
    }

    /// `(MemTotal - MemAvailable) / MemTotal * 100`.
    pub fn memory_rate(&self) -> Result<f64> {
        let total = self.required("MemTotal")?;
        let available = self.required("MemAvailable")?;
        Ok(ratio(total.saturating_sub(available), total))
    }

    /// `(SwapTotal - SwapFree) / SwapTotal * 100`, 0 without swap.
    pub fn swap_rate(&self) -> Result<f64> {
        let total = self.required("SwapTotal")?;
        let free = self.required("SwapFree")?;
        Ok(ratio(total.saturating_sub(free), total))
    }
}

fn ratio(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (used as f64 / total as f64) * 100.0
}

/// Total received and transmitted bytes over non-loopback interfaces.
pub fn parse_net_dev(content: &str) -> Result<(u64, u64)> {
    let mut rx = 0u64;
    let mut tx = 0u64;
    let mut seen = 0usize;

    for line in content.lines().skip(2) {
        let Some((name, data)) = line.trim().split_once(':') else {
            continue;
        };
        if name.trim() == "lo" {
            continue;
        }

        let values: Vec<u64> = data.split_whitespace().filter_map(|s| s.parse().ok()).collect();
        if values.len() < 16 {
            continue;
        }

        rx = rx.saturating_add(values[0]);
        tx = tx.saturating_add(values[8]);
        seen += 1;
    }

    if seen == 0 && !content.lines().skip(2).any(|l| l.trim().starts_with("lo:")) {
        return Err(parse_error("/proc/net/dev", "no interfaces found"));
    }
    Ok((rx, tx))
}

const SECTOR_BYTES: u64 = 512;

/// `sda`, `vda`, `nvme0n1` are disks; `sda1`, `nvme0n1p1`, `dm-0` are not.
fn is_whole_disk(name: &str) -> bool {
    if name.starts_with("loop") || name.starts_with("ram") || name.starts_with("zram") {
        return false;
    }
    if name.starts_with("nvme") || name.starts_with("mmcblk") {
        return match name.rfind('p') {
            Some(pos) => !name[pos + 1..].chars().all(|c| c.is_ascii_digit()) || pos + 1 == name.len(),
            None => true,
        };
    }
    !name.chars().last().is_some_and(|c| c.is_ascii_digit())
}

/// Total bytes read and written by whole disks.
pub fn parse_diskstats(content: &str) -> Result<(u64, u64)> {
    let mut read = 0u64;
    let mut written = 0u64;
    let mut rows = 0usize;

    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 14 {
            continue;
        }
        rows += 1;
        if !is_whole_disk(fields[2]) {
            continue;
        }

        let sectors = |i: usize| fields[i].parse::<u64>().unwrap_or(0);
        read = read.saturating_add(sectors(5).saturating_mul(SECTOR_BYTES));
        written = written.saturating_add(sectors(9).saturating_mul(SECTOR_BYTES));
    }

    if rows == 0 {
        return Err(parse_error("/proc/diskstats", "no devices found"));
    }
    Ok((read, written))
}

/// Rows of `df -B1 --output=source,size,used,avail,pcent,target`, header
/// line dropped and the three size columns converted to `unit`.
pub fn parse_df(content: &str, unit: ByteUnit) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    for line in content.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 6 {
            return Err(parse_error("df", format!("expected 6 columns in '{line}'")));
        }

        let mut row = Vec::with_capacity(6);
        row.push(fields[0].to_string());
        for size in &fields[1..4] {
            let bytes: u64 = size
                .parse()
                .map_err(|_| parse_error("df", format!("invalid size '{size}'")))?;
            row.push(unit.from_bytes(bytes).to_string());
        }
        row.push(fields[4].to_string());
        // Mount points may contain spaces.
        row.push(fields[5..].join(" "));
        rows.push(row);
    }

    Ok(rows)
}

/// Splits command output into whitespace-separated cells, one row per
/// non-blank line.
#[must_use]
pub fn split_rows(content: &str) -> Vec<Vec<String>> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MEMINFO: &str = "\
MemTotal:       16000000 kB
MemFree:         4000000 kB
MemAvailable:    8000000 kB
Buffers:          500000 kB
SwapTotal:       2000000 kB
SwapFree:        1500000 kB
HugePages_Total:       0
";

    #[test]
    fn test_parse_loadavg() {
        assert_eq!(parse_loadavg("0.52 0.58 0.59 1/523 12345\n").unwrap(), "0.52 0.58 0.59");
        assert!(parse_loadavg("0.52\n").is_err());
    }

    #[test]
    fn test_parse_uptime_truncates() {
        assert_eq!(parse_uptime("90061.87 123456.00\n").unwrap(), 90061);
        assert!(parse_uptime("garbage").is_err());
        assert!(parse_uptime("").is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("ps", "  312\n").unwrap(), "312");
        assert!(parse_count("ps", "n/a").is_err());
    }

    #[test]
    fn test_cpu_line() {
        let stats = CpuStats::parse("cpu  100 0 50 800 50 0 0 0 0 0").unwrap();
        assert_eq!(stats.total(), 1000);
        assert_eq!(stats.idle_time(), 850);
        assert!(CpuStats::parse("intr 1 2 3 4 5").is_err());
    }

    #[test]
    fn test_cpu_samples() {
        let content = "cpu  100 0 100 800 0 0 0 0\ncpu  150 0 150 900 0 0 0 0\n";
        // 100 busy out of 200 elapsed.
        assert_relative_eq!(parse_cpu_samples(content).unwrap(), 50.0);
    }

    #[test]
    fn test_cpu_samples_zero_delta() {
        let content = "cpu  1 2 3 4\ncpu  1 2 3 4\n";
        assert_relative_eq!(parse_cpu_samples(content).unwrap(), 0.0);
    }

    #[test]
    fn test_cpu_samples_ignores_per_core_lines() {
        let content = "cpu  0 0 0 100\ncpu0 0 0 0 100\ncpu  100 0 0 100\ncpu0 50 0 0 50\n";
        assert_relative_eq!(parse_cpu_samples(content).unwrap(), 100.0);
        assert!(parse_cpu_samples("cpu  1 2 3 4\n").is_err());
    }

    #[test]
    fn test_meminfo_values_in_unit() {
        let info = MemInfo::parse(MEMINFO).unwrap();
        let keys = vec!["MemTotal".to_string(), "MemFree".to_string()];

        assert_eq!(info.values(&keys, ByteUnit::Kb).unwrap(), vec![16_000_000, 4_000_000]);
        assert_eq!(info.values(&keys, ByteUnit::Mb).unwrap(), vec![15_625, 3_906]);
        assert_eq!(info.get("HugePages_Total"), Some(0));
    }

    #[test]
    fn test_meminfo_unknown_key() {
        let info = MemInfo::parse(MEMINFO).unwrap();
        let err = info.values(&["Nope".to_string()], ByteUnit::Kb).unwrap_err();
        assert!(matches!(err, HostError::UnknownMetric(k) if k == "Nope"));
    }

    #[test]
    fn test_memory_and_swap_rates() {
        let info = MemInfo::parse(MEMINFO).unwrap();
        assert_relative_eq!(info.memory_rate().unwrap(), 50.0);
        assert_relative_eq!(info.swap_rate().unwrap(), 25.0);
    }

    #[test]
    fn test_swap_rate_without_swap() {
        let info = MemInfo::parse("MemTotal: 10 kB\nSwapTotal: 0 kB\nSwapFree: 0 kB\n").unwrap();
        assert_relative_eq!(info.swap_rate().unwrap(), 0.0);
        assert!(info.memory_rate().is_err());
    }

    #[test]
    fn test_meminfo_empty() {
        assert!(MemInfo::parse("").is_err());
    }

    #[test]
    fn test_meminfo_huge_kb_value_saturates() {
        let info = MemInfo::parse("MemTotal: 18446744073709551615 kB\nMemFree: 1 kB\n").unwrap();
        assert_eq!(info.get("MemTotal"), Some(u64::MAX));
        assert_eq!(info.get("MemFree"), Some(1024));
    }

    #[test]
    fn test_net_dev_skips_loopback() {
        let content = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 9999 10 0 0 0 0 0 0 9999 10 0 0 0 0 0 0
  eth0: 2048 20 0 0 0 0 0 0 1024 10 0 0 0 0 0 0
 wlan0: 1024 20 0 0 0 0 0 0 1024 10 0 0 0 0 0 0
";
        assert_eq!(parse_net_dev(content).unwrap(), (3072, 2048));
    }

    #[test]
    fn test_net_dev_garbage() {
        assert!(parse_net_dev("nothing here").is_err());
    }

    #[test]
    fn test_whole_disk_detection() {
        assert!(is_whole_disk("sda"));
        assert!(is_whole_disk("vda"));
        assert!(is_whole_disk("nvme0n1"));
        assert!(is_whole_disk("mmcblk0"));
        assert!(!is_whole_disk("sda1"));
        assert!(!is_whole_disk("nvme0n1p2"));
        assert!(!is_whole_disk("mmcblk0p1"));
        assert!(!is_whole_disk("loop0"));
        assert!(!is_whole_disk("dm-0"));
    }

    #[test]
    fn test_diskstats_sums_whole_disks() {
        let content = "\
   8       0 sda 100 0 2000 0 50 0 1000 0 0 0 0
   8       1 sda1 90 0 1800 0 40 0 900 0 0 0 0
 259       0 nvme0n1 10 0 20 0 5 0 10 0 0 0 0
   7       0 loop0 5 0 999 0 0 0 0 0 0 0 0
";
        let (read, written) = parse_diskstats(content).unwrap();
        assert_eq!(read, (2000 + 20) * 512);
        assert_eq!(written, (1000 + 10) * 512);
        assert!(parse_diskstats("").is_err());
    }

    #[test]
    fn test_diskstats_huge_sector_counts_saturate() {
        let content = "\
   8       0 sda 1 0 18446744073709551615 0 1 0 36028797018963968 0 0 0 0
   8      16 sdb 1 0 1 0 1 0 1 0 0 0 0
";
        assert_eq!(parse_diskstats(content).unwrap(), (u64::MAX, u64::MAX));
    }

    #[test]
    fn test_parse_df_converts_sizes() {
        let gib = 1024u64 * 1024 * 1024;
        let content = format!(
            "Filesystem 1B-blocks Used Avail Use% Mounted on\n/dev/sda1 {} {} {} 50% /\n/dev/sdb1 {} 0 {} 0% /mnt/my disk\n",
            100 * gib,
            50 * gib,
            50 * gib,
            10 * gib,
            10 * gib
        );
        let rows = parse_df(&content, ByteUnit::Gb).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["/dev/sda1", "100", "50", "50", "50%", "/"]);
        assert_eq!(rows[1][5], "/mnt/my disk");
    }

    #[test]
    fn test_parse_df_rejects_short_rows() {
        assert!(parse_df("header\n/dev/sda1 1 2\n", ByteUnit::Gb).is_err());
    }

    #[test]
    fn test_split_rows() {
        let rows = split_rows("a b  c\n\n  d e\n");
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["d", "e"]]);
    }
}
