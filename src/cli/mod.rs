pub mod install;
pub mod plan;
pub mod run;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::ConfigError;
use crate::gate::GateError;
use crate::install::InstallError;
use crate::repo::{RepoError, Repository};

/// Every failure a subcommand can report, rendered through miette on stderr.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(
        code(commit_gate::config),
        help("check the gate section of your .commit-gate.kdl or --config file")
    )]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    #[diagnostic(
        code(commit_gate::repo),
        help("run this command from inside a git working tree")
    )]
    Repo(#[from] RepoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Install(#[from] InstallError),

    #[error("failed to determine the current directory: {0}")]
    #[diagnostic(code(commit_gate::io))]
    CurrentDir(#[source] std::io::Error),

    #[error("failed to write output: {0}")]
    #[diagnostic(code(commit_gate::io))]
    Output(#[source] std::io::Error),
}

impl CliError {
    /// Exit code for the failure. Anything non-zero blocks the commit.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Gate(e) => e.exit_code(),
            _ => 1,
        }
    }
}

/// Render an error on stderr and turn it into the process exit code.
pub(crate) fn fail(err: CliError) -> ExitCode {
    let code = err.exit_code();
    tracing::debug!(code, "exiting with error");
    eprintln!("{:?}", miette::Report::new(err));
    ExitCode::from(code)
}

pub(crate) fn current_dir() -> Result<PathBuf, CliError> {
    std::env::current_dir().map_err(CliError::CurrentDir)
}

/// Locate the repository around `cwd`, if there is one.
///
/// The gate itself works outside a repository; only the config lookup and
/// the install commands need it.
pub(crate) fn optional_repo(cwd: &Path) -> Option<Repository> {
    match Repository::discover(cwd) {
        Ok(repo) => Some(repo),
        Err(e) => {
            tracing::debug!(error = %e, "no repository found");
            None
        }
    }
}
