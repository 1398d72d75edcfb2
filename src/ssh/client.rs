// ABOUTME: Remote command execution through the system ssh binary.
// ABOUTME: Handles exec with timeouts, config dumps, and connectivity probes.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

/// Connection timeout baked into every ssh invocation.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall timeout for `ssh -G` config dumps (no network involved).
const CONFIG_TIMEOUT: Duration = Duration::from_secs(5);

/// Overall timeout for the connectivity probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Default overall timeout for remote command execution.
pub const DEFAULT_EXEC_TIMEOUT: Duration = Duration::from_secs(30);

/// Exit code reported when the process produced none (spawn failure,
/// timeout, death by signal).
const FALLBACK_EXIT_CODE: i32 = 1;

/// Output from a remote command invocation.
///
/// Always produced, never an error: callers branch on `exit_code` so that
/// network failures, remote command failures, and timeouts are all handled
/// uniformly as data.
#[derive(Debug, Clone, Serialize)]
pub struct ExecResult {
    /// Exit code of the remote command, 1 when the process never produced
    /// one.
    pub exit_code: i32,
    /// Captured standard output, empty when nothing was captured.
    pub stdout: String,
    /// Captured standard error, empty when nothing was captured.
    pub stderr: String,
}

impl ExecResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    fn failed(stderr: String) -> Self {
        Self {
            exit_code: FALLBACK_EXIT_CODE,
            stdout: String::new(),
            stderr,
        }
    }
}

/// SSH config fields resolved for an alias via `ssh -G`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SshConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Outcome of a connectivity check against an alias.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Client wrapping the system ssh binary.
///
/// All network behavior is delegated to the external ssh process; nothing
/// here speaks the SSH protocol directly.
#[derive(Debug, Clone)]
pub struct SshClient {
    program: PathBuf,
}

impl Default for SshClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SshClient {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("ssh"),
        }
    }

    /// Override the ssh program path.
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Run `command` on the host behind `alias`, with `timeout` bounding the
    /// whole invocation.
    ///
    /// Never fails: spawn errors, timeouts, and signal deaths all collapse
    /// into an [`ExecResult`] with a fallback exit code.
    pub async fn exec(&self, alias: &str, command: &str, timeout: Duration) -> ExecResult {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-o")
            .arg(format!("ConnectTimeout={}", CONNECT_TIMEOUT.as_secs()))
            .arg(alias)
            .arg(command)
            .kill_on_drop(true);

        tracing::debug!("running {} on {}", command, alias);

        match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(Ok(output)) => ExecResult {
                exit_code: output.status.code().unwrap_or(FALLBACK_EXIT_CODE),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            },
            Ok(Err(e)) => {
                tracing::debug!("failed to spawn {}: {}", self.program.display(), e);
                ExecResult::failed(e.to_string())
            }
            Err(_) => {
                tracing::debug!("ssh to {} timed out after {:?}", alias, timeout);
                ExecResult::failed(String::new())
            }
        }
    }

    /// Resolve the hostname and user ssh would use for `alias`, without
    /// opening a connection.
    ///
    /// Advisory: any invocation failure yields the empty info.
    pub async fn config(&self, alias: &str) -> SshConfigInfo {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-G").arg(alias).kill_on_drop(true);

        match tokio::time::timeout(CONFIG_TIMEOUT, cmd.output()).await {
            Ok(Ok(output)) if output.status.success() => {
                parse_config_dump(&String::from_utf8_lossy(&output.stdout))
            }
            _ => SshConfigInfo::default(),
        }
    }

    /// Check whether `alias` can actually connect.
    ///
    /// Resolves the static config first, then runs a trivial remote echo.
    /// The resolved hostname/user are reported regardless of outcome.
    pub async fn test_connection(&self, alias: &str) -> ConnectionResult {
        let info = self.config(alias).await;
        let probe = self.exec(alias, "echo OK", PROBE_TIMEOUT).await;

        if !probe.success() || !probe.stdout.contains("OK") {
            let stderr = probe.stderr.trim();
            let error = if stderr.is_empty() {
                "Connection failed".to_string()
            } else {
                stderr.to_string()
            };
            return ConnectionResult {
                ok: false,
                hostname: info.hostname,
                user: info.user,
                error: Some(error),
            };
        }

        ConnectionResult {
            ok: true,
            hostname: info.hostname,
            user: info.user,
            error: None,
        }
    }
}

/// Parse `ssh -G` output: one `key value` pair per line, whitespace
/// separated. Later lines overwrite earlier ones.
fn parse_config_dump(dump: &str) -> SshConfigInfo {
    let mut info = SshConfigInfo::default();
    for line in dump.lines() {
        if let Some((key, value)) = line.split_once(' ') {
            match key {
                "hostname" => info.hostname = Some(value.to_string()),
                "user" => info.user = Some(value.to_string()),
                _ => {}
            }
        }
    }
    info
}
