// ABOUTME: Integration tests for repo root resolution.
// ABOUTME: Tests the env var override and the bounded upward walk.

use mikrus_toolbox::error::Error;
use mikrus_toolbox::repo::{RepoRoot, ROOT_ENV_VAR};
use std::fs;
use std::path::Path;

fn plant_marker(root: &Path) {
    fs::create_dir_all(root.join("local")).unwrap();
    fs::write(root.join("local/deploy.sh"), "#!/bin/sh\n").unwrap();
}

#[test]
fn env_override_short_circuits_the_walk() {
    let toolbox = tempfile::tempdir().unwrap();
    plant_marker(toolbox.path());
    let elsewhere = tempfile::tempdir().unwrap();

    temp_env::with_var(ROOT_ENV_VAR, Some(toolbox.path()), || {
        let root = RepoRoot::resolve_from(elsewhere.path()).unwrap();
        assert_eq!(root.path(), toolbox.path());
    });
}

#[test]
fn env_override_without_marker_falls_back_to_walk() {
    let empty = tempfile::tempdir().unwrap();
    let toolbox = tempfile::tempdir().unwrap();
    plant_marker(toolbox.path());
    let nested = toolbox.path().join("mcp/target");
    fs::create_dir_all(&nested).unwrap();

    temp_env::with_var(ROOT_ENV_VAR, Some(empty.path()), || {
        let root = RepoRoot::resolve_from(&nested).unwrap();
        assert_eq!(root.path(), toolbox.path());
    });
}

#[test]
fn missing_marker_everywhere_is_an_error() {
    let bare = tempfile::tempdir().unwrap();

    temp_env::with_var_unset(ROOT_ENV_VAR, || {
        let err = RepoRoot::resolve_from(bare.path()).unwrap_err();
        assert!(matches!(err, Error::RepoRootNotFound));
        assert!(
            err.to_string().contains(ROOT_ENV_VAR),
            "error should name the override env var: {err}"
        );
    });
}

#[test]
fn derived_paths_are_not_validated() {
    let toolbox = tempfile::tempdir().unwrap();
    plant_marker(toolbox.path());

    temp_env::with_var(ROOT_ENV_VAR, Some(toolbox.path()), || {
        let root = RepoRoot::resolve_from(toolbox.path()).unwrap();
        assert_eq!(root.deploy_script(), toolbox.path().join("local/deploy.sh"));
        // apps/ does not exist in the sandbox, the path is still derived
        assert_eq!(root.apps_dir(), toolbox.path().join("apps"));
        assert!(!root.apps_dir().exists());
    });
}
