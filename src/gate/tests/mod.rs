
use std::collections::VecDeque;

use crate::config::{GateConfig, Step};
use crate::gate::{evaluate, GateError, StepRunner, StepStatus, Verdict};

/// Replays a fixed list of outcomes and records which steps were run.
struct ScriptedRunner {
    outcomes: VecDeque<Result<StepStatus, GateError>>,
    ran: Vec<String>,
    seen_env: Vec<Vec<(String, String)>>,
}

impl ScriptedRunner {
    fn new(outcomes: Vec<Result<StepStatus, GateError>>) -> Self {
        Self {
            outcomes: outcomes.into(),
            ran: Vec::new(),
            seen_env: Vec::new(),
        }
    }

    fn statuses(statuses: &[StepStatus]) -> Self {
        Self::new(statuses.iter().copied().map(Ok).collect())
    }
}

impl StepRunner for ScriptedRunner {
    fn run(&mut self, step: &Step, env: &[(String, String)]) -> Result<StepStatus, GateError> {
        self.ran.push(step.source.clone());
        self.seen_env.push(env.to_vec());
        self.outcomes
            .pop_front()
            .expect("runner called more times than scripted")
    }
}

fn gate_of(steps: &[&str]) -> GateConfig {
    GateConfig {
        steps: steps
            .iter()
            .map(|s| Step::parse(s).expect("test step should parse"))
            .collect(),
        ..GateConfig::default()
    }
}

#[test]
fn single_passing_step_allows() {
    let mut runner = ScriptedRunner::statuses(&[StepStatus::Passed]);
    let verdict = evaluate(&GateConfig::default(), &mut runner).unwrap();
    assert_eq!(verdict, Verdict::Allow);
    assert_eq!(runner.ran, vec!["pytest test.py -v"]);
}

#[test]
fn single_failing_step_denies() {
    let mut runner = ScriptedRunner::statuses(&[StepStatus::Failed { code: 1 }]);
    let verdict = evaluate(&GateConfig::default(), &mut runner).unwrap();
    assert_eq!(
        verdict,
        Verdict::Deny {
            step: 0,
            status: StepStatus::Failed { code: 1 }
        }
    );
}

#[test]
fn all_steps_run_in_order_when_passing() {
    let gate = gate_of(&["make lint", "make test", "make docs"]);
    let mut runner = ScriptedRunner::statuses(&[StepStatus::Passed; 3]);
    assert!(evaluate(&gate, &mut runner).unwrap().is_allow());
    assert_eq!(runner.ran, vec!["make lint", "make test", "make docs"]);
}

#[test]
fn first_failure_stops_later_steps() {
    let gate = gate_of(&["make lint", "make test", "make docs"]);
    let mut runner =
        ScriptedRunner::statuses(&[StepStatus::Passed, StepStatus::Failed { code: 2 }]);
    let verdict = evaluate(&gate, &mut runner).unwrap();
    assert_eq!(
        verdict,
        Verdict::Deny {
            step: 1,
            status: StepStatus::Failed { code: 2 }
        }
    );
    assert_eq!(runner.ran, vec!["make lint", "make test"]);
}

#[test]
fn killed_step_denies() {
    let mut runner = ScriptedRunner::statuses(&[StepStatus::Killed { signal: 15 }]);
    let verdict = evaluate(&GateConfig::default(), &mut runner).unwrap();
    assert!(!verdict.is_allow());
}

#[test]
fn spawn_error_propagates_and_stops() {
    let gate = gate_of(&["missing-tool", "make test"]);
    let mut runner = ScriptedRunner::new(vec![Err(GateError::Spawn {
        program: "missing-tool".to_string(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    })]);
    let err = evaluate(&gate, &mut runner).unwrap_err();
    assert!(matches!(err, GateError::Spawn { .. }));
    assert_eq!(runner.ran, vec!["missing-tool"]);
}

#[test]
fn env_is_passed_to_every_step() {
    let gate = GateConfig {
        env: vec![("CI".to_string(), "1".to_string())],
        ..gate_of(&["make lint", "make test"])
    };
    let mut runner = ScriptedRunner::statuses(&[StepStatus::Passed; 2]);
    evaluate(&gate, &mut runner).unwrap();
    let expected = vec![("CI".to_string(), "1".to_string())];
    assert_eq!(runner.seen_env, vec![expected.clone(), expected]);
}

#[test]
fn repeated_runs_give_the_same_verdict() {
    let gate = gate_of(&["make lint", "make test"]);
    let outcomes = [StepStatus::Passed, StepStatus::Failed { code: 4 }];

    let first = evaluate(&gate, &mut ScriptedRunner::statuses(&outcomes)).unwrap();
    let second = evaluate(&gate, &mut ScriptedRunner::statuses(&outcomes)).unwrap();
    assert_eq!(first, second);

    let passing = [StepStatus::Passed; 2];
    let first = evaluate(&gate, &mut ScriptedRunner::statuses(&passing)).unwrap();
    let second = evaluate(&gate, &mut ScriptedRunner::statuses(&passing)).unwrap();
    assert_eq!(first, Verdict::Allow);
    assert_eq!(first, second);
}
