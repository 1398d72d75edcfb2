// ABOUTME: Application-wide error types for mikrus-toolbox.
// ABOUTME: Uses thiserror for ergonomic error handling.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "cannot find mikrus-toolbox repo root (no local/deploy.sh found); \
         set the MIKRUS_TOOLBOX_PATH env var"
    )]
    RepoRootNotFound,

    #[error("no public key found at {0}; run `mikrus-toolbox setup` first")]
    MissingPublicKey(std::path::PathBuf),

    #[error("SSH setup error: {0}")]
    Ssh(#[from] crate::ssh::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
