//! Debug logging for the dashboard.
//!
//! Enabled via the `--debug` flag or `HOSTDASH_DEBUG=1`. Lines go to stderr
//! unless a log file was attached with [`log_to_file`]. While the terminal UI
//! is up, stderr lines are held in memory ([`hold_stderr`]) and written out
//! once the terminal is restored ([`release_stderr`]).

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Environment variable that enables debug logging.
pub const ENV_VAR: &str = "HOSTDASH_DEBUG";

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Start time stored as millis since UNIX epoch.
static START_TIME_MS: AtomicU64 = AtomicU64::new(0);

static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

/// Most lines kept while stderr is held; older lines are dropped first.
pub const BACKLOG_CAPACITY: usize = 10_000;

static BACKLOG: Mutex<Option<Backlog>> = Mutex::new(None);

/// Bounded buffer of log lines.
#[derive(Debug)]
struct Backlog {
    lines: VecDeque<String>,
    dropped: usize,
    capacity: usize,
}

impl Backlog {
    fn new(capacity: usize) -> Self {
        Self { lines: VecDeque::new(), dropped: 0, capacity }
    }

    fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
            self.dropped += 1;
        }
        self.lines.push_back(line);
    }

    fn write_to(self, out: &mut impl Write) -> io::Result<()> {
        if self.dropped > 0 {
            writeln!(out, "[{} earlier log lines dropped]", self.dropped)?;
        }
        for line in self.lines {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Enables debug mode globally.
pub fn enable() {
    START_TIME_MS.store(now_ms(), Ordering::SeqCst);
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}

/// Disables debug mode globally.
pub fn disable() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}

/// Enables debug mode if `HOSTDASH_DEBUG` is set to a truthy value.
pub fn enable_from_env() {
    if let Ok(value) = std::env::var(ENV_VAR) {
        if matches!(value.trim(), "1" | "true" | "yes") {
            enable();
        }
    }
}

/// Returns true if debug mode is enabled.
#[inline]
pub fn is_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Appends log lines to `path` instead of stderr.
///
/// # Errors
///
/// Returns an error if the file cannot be opened for appending.
pub fn log_to_file(path: impl AsRef<Path>) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    if let Ok(mut slot) = LOG_FILE.lock() {
        *slot = Some(file);
    }
    Ok(())
}

/// Buffers stderr log lines until [`release_stderr`].
pub fn hold_stderr() {
    if let Ok(mut slot) = BACKLOG.lock() {
        slot.get_or_insert_with(|| Backlog::new(BACKLOG_CAPACITY));
    }
}

/// Writes buffered lines to stderr and stops buffering.
pub fn release_stderr() {
    let backlog = BACKLOG.lock().ok().and_then(|mut slot| slot.take());
    if let Some(backlog) = backlog {
        let _ = backlog.write_to(&mut io::stderr().lock());
    }
}

fn elapsed_ms() -> u64 {
    let start = START_TIME_MS.load(Ordering::Relaxed);
    if start == 0 {
        return 0;
    }
    now_ms().saturating_sub(start)
}

/// Debug log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Tracing entry/exit of functions
    Trace,
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

fn format_line(level: Level, component: &str, message: &str) -> String {
    format!("[+{:04}ms] [{:5}] [{}] {}", elapsed_ms(), level.as_str(), component, message)
}

/// Logs a message if debug mode is enabled.
pub fn log(level: Level, component: &str, message: &str) {
    if !is_enabled() {
        return;
    }

    let line = format_line(level, component, message);

    if let Ok(mut slot) = LOG_FILE.lock() {
        if let Some(file) = slot.as_mut() {
            let _ = writeln!(file, "{line}");
            return;
        }
    }
    if let Ok(mut slot) = BACKLOG.lock() {
        if let Some(backlog) = slot.as_mut() {
            backlog.push(line);
            return;
        }
    }
    let _ = writeln!(io::stderr(), "{line}");
}

/// Logs with format arguments.
#[macro_export]
macro_rules! debug_log {
    ($level:expr, $component:expr, $($arg:tt)*) => {
        if $crate::debug::is_enabled() {
            $crate::debug::log($level, $component, &format!($($arg)*));
        }
    };
}

/// Convenience macro for trace level.
#[macro_export]
macro_rules! trace {
    ($component:expr, $($arg:tt)*) => {
        $crate::debug_log!($crate::debug::Level::Trace, $component, $($arg)*)
    };
}

/// Convenience macro for debug level.
#[macro_export]
macro_rules! debug {
    ($component:expr, $($arg:tt)*) => {
        $crate::debug_log!($crate::debug::Level::Debug, $component, $($arg)*)
    };
}

/// Convenience macro for info level.
#[macro_export]
macro_rules! info {
    ($component:expr, $($arg:tt)*) => {
        $crate::debug_log!($crate::debug::Level::Info, $component, $($arg)*)
    };
}

/// Convenience macro for warn level.
#[macro_export]
macro_rules! warn {
    ($component:expr, $($arg:tt)*) => {
        $crate::debug_log!($crate::debug::Level::Warn, $component, $($arg)*)
    };
}

/// Convenience macro for error level.
#[macro_export]
macro_rules! error {
    ($component:expr, $($arg:tt)*) => {
        $crate::debug_log!($crate::debug::Level::Error, $component, $($arg)*)
    };
}

/// RAII guard that logs how long a scope took.
pub struct TimingGuard {
    component: &'static str,
    operation: String,
    start: Instant,
}

impl TimingGuard {
    /// Creates a new timing guard.
    pub fn new(component: &'static str, operation: impl Into<String>) -> Self {
        let operation = operation.into();
        if is_enabled() {
            log(Level::Trace, component, &format!("-> {operation}"));
        }
        Self { component, operation, start: Instant::now() }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if is_enabled() {
            let elapsed = self.start.elapsed();
            log(
                Level::Trace,
                self.component,
                &format!("<- {} ({:.2}ms)", self.operation, elapsed.as_secs_f64() * 1000.0),
            );
        }
    }
}

/// Creates a timing guard for the rest of the enclosing scope.
#[macro_export]
macro_rules! time_scope {
    ($component:expr, $operation:expr) => {
        let _guard = $crate::debug::TimingGuard::new($component, $operation);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_as_str() {
        assert_eq!(Level::Trace.as_str(), "TRACE");
        assert_eq!(Level::Debug.as_str(), "DEBUG");
        assert_eq!(Level::Info.as_str(), "INFO");
        assert_eq!(Level::Warn.as_str(), "WARN");
        assert_eq!(Level::Error.as_str(), "ERROR");
    }

    #[test]
    fn test_format_line_layout() {
        let line = format_line(Level::Warn, "host", "slow command");
        assert!(line.starts_with("[+"));
        assert!(line.contains("[WARN ]"), "{line}");
        assert!(line.ends_with("[host] slow command"), "{line}");
    }

    #[test]
    fn test_log_when_disabled_does_nothing() {
        disable();
        log(Level::Debug, "test", "message");
    }

    #[test]
    fn test_log_to_file_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hostdash.log");
        log_to_file(&path).unwrap();

        enable();
        log(Level::Info, "test", "hello file");
        crate::info!("test", "formatted {}", 42);
        {
            let _guard = TimingGuard::new("test", "scope");
        }
        disable();

        if let Ok(mut slot) = LOG_FILE.lock() {
            *slot = None;
        }

        // Other tests may toggle the global flag concurrently, so only check
        // that whatever landed in the file is well-formed.
        let content = std::fs::read_to_string(&path).unwrap();
        for line in content.lines() {
            assert!(line.starts_with("[+"), "{line}");
        }
    }

    #[test]
    fn test_backlog_keeps_newest_lines() {
        let mut backlog = Backlog::new(2);
        backlog.push("one".to_string());
        backlog.push("two".to_string());
        backlog.push("three".to_string());

        let mut out = Vec::new();
        backlog.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[1 earlier log lines dropped]\ntwo\nthree\n");
    }

    #[test]
    fn test_backlog_without_drops() {
        let mut backlog = Backlog::new(BACKLOG_CAPACITY);
        backlog.push("only".to_string());

        let mut out = Vec::new();
        backlog.write_to(&mut out).unwrap();
        assert_eq!(out, b"only\n");
    }

    #[test]
    fn test_release_without_hold_is_noop() {
        release_stderr();
        assert!(BACKLOG.lock().unwrap().is_none());
    }

    #[test]
    fn test_timing_guard_when_disabled() {
        disable();
        let guard = TimingGuard::new("test", "noop");
        assert_eq!(guard.component, "test");
        assert_eq!(guard.operation, "noop");
    }
}
