// ABOUTME: SSH setup error types.
// ABOUTME: Covers key generation and local config file failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HOME is not set, cannot locate the SSH directory")]
    HomeNotSet,

    #[error("ssh-keygen failed: {0}")]
    KeygenFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
