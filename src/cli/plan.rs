use std::path::Path;
use std::process::ExitCode;

use super::{current_dir, fail, optional_repo, CliError};
use crate::config::Config;
use crate::plan::Plan;

/// Execute the `plan` subcommand: show the steps `run` would take.
pub fn run(config_path: Option<&Path>, json: bool) -> ExitCode {
    match execute(config_path, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn execute(config_path: Option<&Path>, json: bool) -> Result<(), CliError> {
    let cwd = current_dir()?;
    let root = optional_repo(&cwd).map(|repo| repo.root);
    let config = Config::discover(config_path, root.as_deref())?;

    let plan = Plan::new(&config);
    let mut out = std::io::stdout().lock();
    let written = if json {
        plan.write_json(&mut out)
    } else {
        plan.write_text(&mut out)
    };
    written.map_err(CliError::Output)
}
