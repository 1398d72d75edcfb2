// ABOUTME: Locates the mikrus-toolbox repository root on the local filesystem.
// ABOUTME: Honors the MIKRUS_TOOLBOX_PATH override, then walks up from the executable.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding the repo root search.
pub const ROOT_ENV_VAR: &str = "MIKRUS_TOOLBOX_PATH";

/// File whose presence marks the toolbox repo root. Existence-only check;
/// the content is never read here.
const MARKER: &str = "local/deploy.sh";

/// How many directories the upward walk inspects before giving up.
const MAX_WALK_DEPTH: usize = 10;

/// The resolved toolbox repository root.
///
/// Resolved once by the entry point and passed down to whatever needs it.
/// Derived paths are computed on demand and never re-validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRoot(PathBuf);

impl RepoRoot {
    /// Resolve the repo root, walking up from the running executable's
    /// directory.
    ///
    /// `MIKRUS_TOOLBOX_PATH` wins when it points at a directory containing
    /// `local/deploy.sh`.
    pub fn resolve() -> Result<Self> {
        let start = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self::resolve_inner(start.as_deref())
    }

    /// Resolve with an explicit walk origin instead of the executable path.
    pub fn resolve_from(start: &Path) -> Result<Self> {
        Self::resolve_inner(Some(start))
    }

    fn resolve_inner(start: Option<&Path>) -> Result<Self> {
        if let Ok(env_path) = std::env::var(ROOT_ENV_VAR) {
            let candidate = PathBuf::from(env_path);
            if candidate.join(MARKER).exists() {
                tracing::debug!("repo root from {}: {}", ROOT_ENV_VAR, candidate.display());
                return Ok(Self(candidate));
            }
            tracing::warn!(
                "{} is set but {} is missing under it, falling back to walk",
                ROOT_ENV_VAR,
                MARKER
            );
        }

        if let Some(start) = start
            && let Some(root) = walk_up(start)
        {
            tracing::debug!("repo root found by walking up: {}", root.display());
            return Ok(Self(root));
        }

        Err(Error::RepoRootNotFound)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Path to the deploy script. Derived, not validated.
    pub fn deploy_script(&self) -> PathBuf {
        self.0.join(MARKER)
    }

    /// Path to the per-app definitions directory. Derived, not validated.
    pub fn apps_dir(&self) -> PathBuf {
        self.0.join("apps")
    }
}

/// Check `start` and its parents for the marker file, at most
/// `MAX_WALK_DEPTH` candidates, stopping early at the filesystem root.
fn walk_up(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    for _ in 0..MAX_WALK_DEPTH {
        if dir.join(MARKER).exists() {
            return Some(dir.to_path_buf());
        }
        match dir.parent() {
            Some(parent) if parent != dir => dir = parent,
            _ => break,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn plant_marker(root: &Path) {
        fs::create_dir_all(root.join("local")).unwrap();
        fs::write(root.join("local/deploy.sh"), "#!/bin/sh\n").unwrap();
    }

    #[test]
    fn walk_finds_marker_in_start_dir() {
        let tmp = tempfile::tempdir().unwrap();
        plant_marker(tmp.path());

        assert_eq!(walk_up(tmp.path()), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn walk_finds_marker_in_ancestor() {
        let tmp = tempfile::tempdir().unwrap();
        plant_marker(tmp.path());
        let nested = tmp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(walk_up(&nested), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn walk_reaches_marker_at_depth_limit() {
        let tmp = tempfile::tempdir().unwrap();
        plant_marker(tmp.path());
        // Nine levels below the marker: the tenth candidate is the root itself.
        let nested = tmp.path().join("1/2/3/4/5/6/7/8/9");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(walk_up(&nested), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn walk_gives_up_past_depth_limit() {
        let tmp = tempfile::tempdir().unwrap();
        plant_marker(tmp.path());
        // Ten levels below the marker: one past what the walk inspects.
        let nested = tmp.path().join("1/2/3/4/5/6/7/8/9/10");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(walk_up(&nested), None);
    }

    #[test]
    fn derived_paths_join_onto_root() {
        let root = RepoRoot(PathBuf::from("/opt/toolbox"));
        assert_eq!(root.deploy_script(), PathBuf::from("/opt/toolbox/local/deploy.sh"));
        assert_eq!(root.apps_dir(), PathBuf::from("/opt/toolbox/apps"));
    }
}
