use std::path::Path;
use std::process::ExitCode;

use super::{current_dir, fail, optional_repo, CliError};
use crate::config::Config;
use crate::gate::{self, ProcessRunner, Verdict};

/// Execute the `run` subcommand: the pre-commit hook itself.
///
/// Exit 0 with the confirmation lines when every step passes. Otherwise exit
/// non-zero and print nothing of our own; the failing step's output stands.
pub fn run(config_path: Option<&Path>) -> ExitCode {
    match execute(config_path) {
        Ok(verdict) => ExitCode::from(verdict.exit_code()),
        Err(e) => fail(e),
    }
}

fn execute(config_path: Option<&Path>) -> Result<Verdict, CliError> {
    let cwd = current_dir()?;
    let root = optional_repo(&cwd).map(|repo| repo.root);
    let config = Config::discover(config_path, root.as_deref())?;
    tracing::debug!(source = %config.source, steps = config.gate.steps.len(), "config loaded");

    let verdict = gate::evaluate(&config.gate, &mut ProcessRunner)?;
    gate::report(&verdict, &config.gate, &mut std::io::stdout().lock())
        .map_err(CliError::Output)?;
    Ok(verdict)
}
