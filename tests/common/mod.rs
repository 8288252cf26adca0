// Shared test helpers for integration tests.
// Used by cli_contract.rs and cli_flows.rs.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub fn binary_path() -> PathBuf {
    let path = PathBuf::from(env!("CARGO_BIN_EXE_commit-gate"));
    assert!(path.exists(), "binary not found at {}", path.display());
    path
}

/// A throwaway repository: a temp dir with an empty `.git` directory.
pub fn empty_repo() -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::create_dir(dir.path().join(".git")).expect("failed to create .git");
    dir
}

/// A throwaway repository with `.commit-gate.kdl` at its root.
pub fn repo_with_config(config_content: &str) -> TempDir {
    let dir = empty_repo();
    std::fs::write(dir.path().join(".commit-gate.kdl"), config_content)
        .expect("failed to write config");
    dir
}

/// Runs the binary in `cwd` with the given args.
/// Returns (stdout, stderr, exit_code).
pub fn run_in(cwd: &Path, args: &[&str]) -> (String, String, i32) {
    let mut cmd = Command::new(binary_path());
    cmd.args(args)
        .current_dir(cwd)
        .env_remove("COMMIT_GATE_LOG")
        .env_remove("RUST_LOG");
    collect(cmd)
}

/// Runs `commit-gate run` in `cwd`.
pub fn run_gate(cwd: &Path) -> (String, String, i32) {
    run_in(cwd, &["run"])
}

pub fn collect(mut cmd: Command) -> (String, String, i32) {
    let output = cmd
        .stdin(std::process::Stdio::null())
        .output()
        .expect("failed to execute binary");

    let stdout = String::from_utf8(output.stdout).expect("stdout not valid UTF-8");
    let stderr = String::from_utf8(output.stderr).expect("stderr not valid UTF-8");
    let exit_code = output.status.code().unwrap_or(-1);
    (stdout, stderr, exit_code)
}

pub const CONFIRMATION: &str = "All tests passed.\nProceeding with commit.\n";
