mod process;
mod report;

pub use process::ProcessRunner;
pub use report::report;

use crate::config::{GateConfig, Step};

/// Exit code used when a step's program cannot be started, as a shell would.
pub const EXIT_NOT_FOUND: u8 = 127;

/// Outcome of running a single step to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Passed,
    /// Exited with a non-zero code.
    Failed { code: i32 },
    /// Terminated by a signal before exiting.
    Killed { signal: i32 },
}

impl StepStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Passed)
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepStatus::Passed => write!(f, "passed"),
            StepStatus::Failed { code } => write!(f, "exit code {code}"),
            StepStatus::Killed { signal } => write!(f, "killed by signal {signal}"),
        }
    }
}

/// The gate's decision: let the commit through or block it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    /// `step` is the zero-based index of the step that failed.
    Deny { step: usize, status: StepStatus },
}

impl Verdict {
    /// Process exit code for this verdict.
    ///
    /// Allow is 0. A failed step's exit code is passed through, kept within
    /// 1..=255 so it can never read as success. A signal maps to `128 + signal`.
    pub fn exit_code(&self) -> u8 {
        match self {
            Verdict::Allow => 0,
            Verdict::Deny { status, .. } => match status {
                StepStatus::Passed => 1,
                StepStatus::Failed { code } => nonzero_code(*code),
                StepStatus::Killed { signal } => nonzero_code(128 + signal),
            },
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Verdict::Allow)
    }
}

fn nonzero_code(code: i32) -> u8 {
    match u8::try_from(code) {
        Ok(0) | Err(_) => 1,
        Ok(code) => code,
    }
}

/// Errors raised while running steps. A failing step is not an error; it is
/// [`Verdict::Deny`].
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum GateError {
    #[error("failed to start '{program}': {source}")]
    #[diagnostic(
        code(commit_gate::step::spawn),
        help("make sure the step's program is installed and on PATH")
    )]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed waiting for '{program}': {source}")]
    #[diagnostic(
        code(commit_gate::step::wait),
        help("the step started but its exit status could not be read; run it by hand to check")
    )]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl GateError {
    /// Exit code reported to the VCS for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            GateError::Spawn { .. } => EXIT_NOT_FOUND,
            GateError::Wait { .. } => 1,
        }
    }
}

/// Runs one step and reports how it ended.
///
/// [`ProcessRunner`] spawns real processes; tests substitute scripted runners.
pub trait StepRunner {
    fn run(&mut self, step: &Step, env: &[(String, String)]) -> Result<StepStatus, GateError>;
}

/// Run the configured steps in order and decide whether the commit may proceed.
///
/// Stops at the first step that does not pass; later steps are never run.
/// Carries no state between calls, so the same step outcomes always yield
/// the same verdict.
///
/// # Examples
///
/// ```
/// use commit_gate::config::{GateConfig, Step};
/// use commit_gate::gate::{evaluate, GateError, StepRunner, StepStatus, Verdict};
///
/// struct AlwaysPass;
///
/// impl StepRunner for AlwaysPass {
///     fn run(&mut self, _: &Step, _: &[(String, String)]) -> Result<StepStatus, GateError> {
///         Ok(StepStatus::Passed)
///     }
/// }
///
/// let verdict = evaluate(&GateConfig::default(), &mut AlwaysPass).unwrap();
/// assert_eq!(verdict, Verdict::Allow);
/// ```
pub fn evaluate(gate: &GateConfig, runner: &mut impl StepRunner) -> Result<Verdict, GateError> {
    let total = gate.steps.len();
    for (index, step) in gate.steps.iter().enumerate() {
        tracing::info!(step = index + 1, total, command = %step.source, "running step");
        let status = runner.run(step, &gate.env)?;
        if !status.is_success() {
            tracing::warn!(step = index + 1, command = %step.source, %status, "step failed");
            return Ok(Verdict::Deny {
                step: index,
                status,
            });
        }
        tracing::debug!(step = index + 1, "step passed");
    }
    Ok(Verdict::Allow)
}

#[cfg(test)]
mod tests;
