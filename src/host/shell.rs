//! Where metric commands run: this machine or an SSH host.

use crate::error::HostError;
use crate::subprocess::run_with_timeout;
use std::time::{Duration, Instant};

/// Executes shell scripts on a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shell {
    /// `sh -c SCRIPT` on the machine running the dashboard.
    Local,
    /// `ssh USER@ADDRESS SCRIPT` with key-based, non-interactive auth.
    Ssh {
        /// Login name; omitted from the destination when empty.
        username: String,
        /// Host name or IP address.
        address: String,
        /// SSH port.
        port: u16,
    },
}

impl Shell {
    /// Returns the `ssh` destination, or `localhost` for the local shell.
    #[must_use]
    pub fn destination(&self) -> String {
        match self {
            Shell::Local => "localhost".to_string(),
            Shell::Ssh { username, address, .. } if username.is_empty() => address.clone(),
            Shell::Ssh { username, address, .. } => format!("{username}@{address}"),
        }
    }

    /// Program and arguments that run `script` on this shell.
    #[must_use]
    pub fn command_line(&self, script: &str) -> (&'static str, Vec<String>) {
        match self {
            Shell::Local => ("sh", vec!["-c".to_string(), script.to_string()]),
            Shell::Ssh { port, .. } => (
                "ssh",
                vec![
                    "-o".to_string(),
                    "BatchMode=yes".to_string(),
                    "-p".to_string(),
                    port.to_string(),
                    self.destination(),
                    script.to_string(),
                ],
            ),
        }
    }

    /// Runs `script` and returns its stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot start, exits non-zero, or
    /// outlives `timeout`.
    pub fn run(&self, script: &str, timeout: Duration) -> Result<String, HostError> {
        let (program, args) = self.command_line(script);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let start = Instant::now();
        let result = run_with_timeout(program, &args, timeout);
        crate::trace!(
            "shell",
            "{} `{}` -> {} in {:.1}ms",
            self.destination(),
            script,
            if result.is_success() { "ok" } else { "failed" },
            start.elapsed().as_secs_f64() * 1000.0
        );

        result.into_stdout(script, timeout)
    }
}
