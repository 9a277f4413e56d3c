//! Subprocess execution with timeout support.
//!
//! Every metrics fetch ends up here, and a remote fetch is an `ssh` process
//! that can block for as long as the network lets it. A command that outlives
//! its deadline is killed and reaped, so a hung host costs one process per
//! fetch for at most the timeout.

use crate::error::HostError;
use std::io::Read;
use std::process::{Child, Command, Output, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is checked for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Extra time given to the pipe readers once the child has exited.
const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// Result of a subprocess execution with timeout.
#[derive(Debug)]
pub enum SubprocessResult {
    /// Command completed successfully with output.
    Success(Output),
    /// Command timed out and was killed.
    Timeout,
    /// Command failed to spawn.
    SpawnError,
    /// Command exited with non-zero status.
    Failed(Output),
}

impl SubprocessResult {
    /// Returns true if command completed successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts the outcome into stdout or a [`HostError`].
    ///
    /// `label` names the command in error messages.
    ///
    /// # Errors
    ///
    /// Returns an error for anything but a successful exit.
    pub fn into_stdout(self, label: &str, timeout: Duration) -> Result<String, HostError> {
        match self {
            Self::Success(output) => Ok(String::from_utf8_lossy(&output.stdout).to_string()),
            Self::Failed(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                let message = if stderr.is_empty() {
                    format!("exited with {}", output.status)
                } else {
                    stderr
                };
                Err(HostError::CommandFailed { command: label.to_string(), message })
            }
            Self::Timeout => Err(HostError::Timeout {
                command: label.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
            Self::SpawnError => Err(HostError::Spawn { command: label.to_string() }),
        }
    }
}

/// Reads a pipe to the end on a background thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> mpsc::Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(buf);
    });
    rx
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Runs a command with a timeout.
///
/// Stdout and stderr are drained on background threads so a chatty command
/// never blocks on a full pipe; this thread polls the child until it exits
/// or the deadline passes, then kills and reaps it. Stdin is closed so `ssh`
/// never waits for a password prompt.
pub fn run_with_timeout(cmd: &str, args: &[&str], timeout: Duration) -> SubprocessResult {
    let spawned = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();
    let Ok(mut child) = spawned else {
        return SubprocessResult::SpawnError;
    };

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());
    let deadline = Instant::now() + timeout;

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                kill(&mut child);
                return SubprocessResult::Timeout;
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(_) => {
                kill(&mut child);
                return SubprocessResult::SpawnError;
            }
        }
    };

    // A background grandchild may keep the pipes open; don't wait on it forever.
    let wait = deadline.saturating_duration_since(Instant::now()) + DRAIN_GRACE;
    let output = Output {
        status,
        stdout: stdout.recv_timeout(wait).unwrap_or_default(),
        stderr: stderr.recv_timeout(wait).unwrap_or_default(),
    };

    if output.status.success() {
        SubprocessResult::Success(output)
    } else {
        SubprocessResult::Failed(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_command() {
        let result = run_with_timeout("echo", &["hello"], Duration::from_secs(5));
        assert!(result.is_success());
        assert_eq!(result.into_stdout("echo", Duration::from_secs(5)).unwrap().trim(), "hello");
    }

    #[test]
    fn test_shell_pipeline() {
        let result = run_with_timeout("sh", &["-c", "printf 'a b\\nc d\\n' | wc -l"], Duration::from_secs(5));
        assert_eq!(result.into_stdout("wc", Duration::from_secs(5)).unwrap().trim(), "2");
    }

    #[test]
    fn test_timeout_returns_quickly() {
        let start = Instant::now();
        let result = run_with_timeout("sleep", &["10"], Duration::from_millis(100));
        let elapsed = start.elapsed();

        assert!(matches!(result, SubprocessResult::Timeout));
        assert!(elapsed < Duration::from_secs(1), "Should timeout quickly, took {:?}", elapsed);
    }

    #[test]
    fn test_timed_out_command_is_killed() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("finished");
        let script = format!("sleep 1; touch '{}'", marker.display());

        let result = run_with_timeout("sh", &["-c", &script], Duration::from_millis(100));
        assert!(matches!(result, SubprocessResult::Timeout));

        thread::sleep(Duration::from_millis(1500));
        assert!(!marker.exists(), "command kept running after its timeout");
    }

    #[test]
    fn test_large_output_is_not_truncated() {
        let result = run_with_timeout("sh", &["-c", "seq 1 100000"], Duration::from_secs(5));
        let stdout = result.into_stdout("seq", Duration::from_secs(5)).unwrap();
        assert_eq!(stdout.lines().count(), 100_000);
        assert_eq!(stdout.lines().last(), Some("100000"));
    }

    #[test]
    fn test_timeout_maps_to_host_error() {
        let result = run_with_timeout("sleep", &["10"], Duration::from_millis(50));
        let err = result.into_stdout("sleep 10", Duration::from_millis(50)).unwrap_err();
        assert!(matches!(err, HostError::Timeout { timeout_ms: 50, .. }));
    }

    #[test]
    fn test_nonexistent_command() {
        let result = run_with_timeout("this_command_does_not_exist_12345", &[], Duration::from_secs(5));
        assert!(matches!(result, SubprocessResult::SpawnError));

        let err = result.into_stdout("missing", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, HostError::Spawn { .. }));
    }

    #[test]
    fn test_failed_command_carries_stderr() {
        let result = run_with_timeout("sh", &["-c", "echo boom >&2; exit 3"], Duration::from_secs(5));
        assert!(matches!(result, SubprocessResult::Failed(_)));

        match result.into_stdout("boom", Duration::from_secs(5)) {
            Err(HostError::CommandFailed { message, .. }) => assert_eq!(message, "boom"),
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }
}
