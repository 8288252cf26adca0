use std::process::{Command, ExitStatus, Stdio};

use super::{GateError, StepRunner, StepStatus};
use crate::config::Step;

/// Spawns each step as a child process and blocks until it exits.
///
/// The child inherits the working directory and all three standard streams,
/// so the test runner's own output reaches the developer unchanged.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl StepRunner for ProcessRunner {
    fn run(&mut self, step: &Step, env: &[(String, String)]) -> Result<StepStatus, GateError> {
        let program = &step.command.program;
        let mut child = Command::new(program)
            .args(&step.command.args)
            .envs(env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| GateError::Spawn {
                program: program.clone(),
                source,
            })?;

        let status = child.wait().map_err(|source| GateError::Wait {
            program: program.clone(),
            source,
        })?;
        Ok(classify(status))
    }
}

fn classify(status: ExitStatus) -> StepStatus {
    if status.success() {
        return StepStatus::Passed;
    }
    if let Some(code) = status.code() {
        return StepStatus::Failed { code };
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return StepStatus::Killed { signal };
        }
    }
    StepStatus::Failed { code: 1 }
}
