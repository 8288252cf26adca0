pub mod command;
pub mod config;
pub mod gate;
pub mod install;
pub mod logging;
pub mod plan;
pub mod repo;

pub(crate) mod cli;

use std::path::Path;
use std::process::ExitCode;

/// Run the gate as a pre-commit hook and return the exit code for the VCS.
///
/// This is the binary entry point. It exists to bridge the binary crate
/// (`main.rs`) to the library without exposing `cli` internals. Library
/// callers should use [`gate::evaluate`] and [`config::Config`] directly.
pub fn run_gate(config_path: Option<&Path>) -> ExitCode {
    cli::run::run(config_path)
}

/// Write the pre-commit hook into the enclosing repository.
pub fn install_hook(config_path: Option<&Path>, force: bool) -> ExitCode {
    cli::install::install(config_path, force)
}

/// Remove the pre-commit hook if commit-gate installed it.
pub fn uninstall_hook() -> ExitCode {
    cli::install::uninstall()
}

/// Print the resolved steps without running them.
pub fn show_plan(config_path: Option<&Path>, json: bool) -> ExitCode {
    cli::plan::run(config_path, json)
}
