// ABOUTME: Local SSH key and config bootstrap for new mikrus hosts.
// ABOUTME: Generates key material and appends Host blocks to the client config.

use super::error::{Error, Result};
use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// Overall timeout for key generation.
const KEYGEN_TIMEOUT: Duration = Duration::from_secs(10);

/// Keep-alive interval written into every managed Host block.
const SERVER_ALIVE_INTERVAL: u32 = 60;

/// Fields for one `Host` block in the SSH client config.
#[derive(Debug, Clone)]
pub struct HostEntry {
    pub alias: String,
    pub host: String,
    pub port: u16,
    pub user: String,
}

/// The local SSH directory holding the managed key pair and client config.
///
/// Defaults to `$HOME/.ssh`; the directory and the ssh-keygen program are
/// injectable for tests. Existing files are never rewritten or deleted, the
/// config is append-only.
#[derive(Debug, Clone)]
pub struct SshHome {
    dir: PathBuf,
    keygen_program: PathBuf,
}

impl SshHome {
    pub fn new() -> Result<Self> {
        let home = std::env::var("HOME").map_err(|_| Error::HomeNotSet)?;
        Ok(Self::in_dir(Path::new(&home).join(".ssh")))
    }

    /// Use an explicit SSH directory instead of `$HOME/.ssh`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            keygen_program: PathBuf::from("ssh-keygen"),
        }
    }

    /// Override the ssh-keygen program path.
    pub fn keygen_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.keygen_program = program.into();
        self
    }

    pub fn key_path(&self) -> PathBuf {
        self.dir.join("id_ed25519")
    }

    pub fn public_key_path(&self) -> PathBuf {
        self.dir.join("id_ed25519.pub")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join("config")
    }

    pub fn key_exists(&self) -> bool {
        self.key_path().exists()
    }

    /// Generate an ed25519 key pair with no passphrase at the managed path.
    ///
    /// No overwrite guard here: ssh-keygen's own refusal behavior applies
    /// when the key already exists.
    pub async fn generate_key(&self) -> Result<()> {
        self.ensure_dir()?;

        let key_path = self.key_path();
        let mut cmd = Command::new(&self.keygen_program);
        cmd.arg("-t")
            .arg("ed25519")
            .arg("-f")
            .arg(&key_path)
            .arg("-N")
            .arg("")
            .kill_on_drop(true);

        let output = match tokio::time::timeout(KEYGEN_TIMEOUT, cmd.output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(Error::KeygenFailed(format!(
                    "timed out after {KEYGEN_TIMEOUT:?}"
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::KeygenFailed(stderr.trim().to_string()));
        }

        tracing::info!("generated ed25519 key at {}", key_path.display());
        Ok(())
    }

    /// Read the trimmed public key, or `None` when no key pair exists yet.
    pub fn public_key(&self) -> Result<Option<String>> {
        let path = self.public_key_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(content.trim().to_string()))
    }

    /// Check whether the client config already has a `Host` block for
    /// `alias`. `false` when the config file does not exist.
    pub fn alias_exists(&self, alias: &str) -> Result<bool> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(false);
        }
        let content = fs::read_to_string(&path)?;
        Ok(content.lines().any(|line| is_host_line(line, alias)))
    }

    /// Append a `Host` block for `entry` to the client config.
    ///
    /// Append-only, no duplicate guard: callers wanting idempotence check
    /// [`alias_exists`](Self::alias_exists) first.
    pub fn append_host_entry(&self, entry: &HostEntry) -> Result<()> {
        self.ensure_dir()?;

        let block = format!(
            "\nHost {}\n    HostName {}\n    Port {}\n    User {}\n    IdentityFile {}\n    ServerAliveInterval {}\n",
            entry.alias,
            entry.host,
            entry.port,
            entry.user,
            self.key_path().display(),
            SERVER_ALIVE_INTERVAL,
        );

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.config_path())?;
        file.write_all(block.as_bytes())?;

        tracing::info!("appended Host {} to {}", entry.alias, self.config_path().display());
        Ok(())
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700))?;
        Ok(())
    }
}

/// Match `Host <alias>` with nothing but whitespace around the alias, so
/// `Host foobar` and `# Host foo` never count as `foo`.
fn is_host_line(line: &str, alias: &str) -> bool {
    line.strip_prefix("Host")
        .is_some_and(|rest| rest.starts_with(char::is_whitespace) && rest.trim() == alias)
}

/// Shell command the operator runs to authorize the key on the server.
/// Pure formatting, nothing is executed here.
pub fn copy_id_command(entry: &HostEntry) -> String {
    format!("ssh-copy-id -p {} {}@{}", entry.port, entry.user, entry.host)
}
