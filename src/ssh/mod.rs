// ABOUTME: SSH helpers built on the system ssh binary.
// ABOUTME: Covers remote execution, config lookup, and local key/config bootstrap.

mod client;
mod error;
mod setup;

pub use client::{ConnectionResult, DEFAULT_EXEC_TIMEOUT, ExecResult, SshClient, SshConfigInfo};
pub use error::{Error, Result};
pub use setup::{HostEntry, SshHome, copy_id_command};
