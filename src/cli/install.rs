use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::{current_dir, fail, CliError};
use crate::install::{self, InstallOptions, InstallOutcome, UninstallOutcome};
use crate::repo::Repository;

/// Fallback when the running executable's path is unknown.
const PROGRAM_NAME: &str = "commit-gate";

/// Execute the `install` subcommand.
pub fn install(config: Option<&Path>, force: bool) -> ExitCode {
    match execute_install(config, force) {
        Ok(outcome) => {
            match outcome {
                InstallOutcome::Installed(path) => {
                    println!("Installed pre-commit hook at {}", path.display());
                }
                InstallOutcome::Replaced(path) => {
                    println!("Replaced pre-commit hook at {}", path.display());
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

/// Execute the `uninstall` subcommand.
pub fn uninstall() -> ExitCode {
    let result = current_dir()
        .and_then(|cwd| Ok(Repository::discover(&cwd)?))
        .and_then(|repo| Ok(install::uninstall(&repo)?));
    match result {
        Ok(UninstallOutcome::Removed(path)) => {
            println!("Removed pre-commit hook at {}", path.display());
            ExitCode::SUCCESS
        }
        Ok(UninstallOutcome::NotInstalled(path)) => {
            println!("No pre-commit hook at {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn execute_install(config: Option<&Path>, force: bool) -> Result<InstallOutcome, CliError> {
    let cwd = current_dir()?;
    let repo = Repository::discover(&cwd)?;
    let options = InstallOptions {
        program: current_program(),
        // Hooks run from the repository root, so pin relative paths now.
        config: config.map(|path| absolute(&cwd, path)),
        force,
    };
    Ok(install::install(&repo, &options)?)
}

fn current_program() -> String {
    match std::env::current_exe() {
        Ok(path) => path.to_string_lossy().into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, "cannot resolve own executable, hook will rely on PATH");
            PROGRAM_NAME.to_string()
        }
    }
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
