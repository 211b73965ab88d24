//! Scenario runner.
//!
//! Executes compiled steps strictly in order. A failing check is recorded
//! and its siblings still run. A failing input aborts the scenario: its own
//! checks and every later step are recorded as skipped, with a reason naming
//! the failing step. The abort state is local to one run.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::{debug, warn};
use trellis_core::Callable;

use crate::compile::Step;

/// What happened to a step's input action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// No input variant applied at this position.
    Absent,
    Passed,
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    pub status: CheckStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub position: usize,
    pub node: String,
    pub label: String,
    pub input: Option<String>,
    pub action: ActionOutcome,
    pub checks: Vec<CheckOutcome>,
}

impl StepOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self.action, ActionOutcome::Skipped(_))
    }
}

/// Which part of a scenario failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Action,
    Check,
    StartHook,
    StopHook,
}

/// A failure with enough identity to rebuild a readable trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub scenario: String,
    pub position: Option<usize>,
    pub node: Option<String>,
    pub check: Option<String>,
    pub kind: FailureKind,
    pub detail: String,
}

/// Outcome of one scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub scenario: String,
    pub steps: Vec<StepOutcome>,
    pub start_hook_failure: Option<String>,
    pub stop_hook_failure: Option<String>,
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        self.failures().is_empty() && !self.steps.iter().any(StepOutcome::is_skipped)
    }

    pub fn failures(&self) -> Vec<FailureRecord> {
        let mut failures = Vec::new();
        if let Some(detail) = &self.start_hook_failure {
            failures.push(self.hook_failure(FailureKind::StartHook, detail));
        }
        for step in &self.steps {
            if let ActionOutcome::Failed(detail) = &step.action {
                failures.push(FailureRecord {
                    scenario: self.scenario.clone(),
                    position: Some(step.position),
                    node: Some(step.node.clone()),
                    check: None,
                    kind: FailureKind::Action,
                    detail: detail.clone(),
                });
            }
            for check in &step.checks {
                if let CheckStatus::Failed(detail) = &check.status {
                    failures.push(FailureRecord {
                        scenario: self.scenario.clone(),
                        position: Some(step.position),
                        node: Some(step.node.clone()),
                        check: Some(check.name.clone()),
                        kind: FailureKind::Check,
                        detail: detail.clone(),
                    });
                }
            }
        }
        if let Some(detail) = &self.stop_hook_failure {
            failures.push(self.hook_failure(FailureKind::StopHook, detail));
        }
        failures
    }

    pub fn skipped_steps(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| s.is_skipped())
    }

    fn hook_failure(&self, kind: FailureKind, detail: &str) -> FailureRecord {
        FailureRecord {
            scenario: self.scenario.clone(),
            position: None,
            node: None,
            check: None,
            kind,
            detail: detail.to_string(),
        }
    }
}

/// Run `steps` in order and collect their outcomes.
pub fn run_scenario(scenario: &str, steps: &[Step]) -> RunResult {
    run_steps(scenario, steps, None)
}

/// Run `steps`, treating every step as skipped if `aborted` is set upfront.
pub(crate) fn run_steps(scenario: &str, steps: &[Step], mut aborted: Option<String>) -> RunResult {
    let mut outcomes = Vec::with_capacity(steps.len());

    for step in steps {
        if let Some(reason) = &aborted {
            outcomes.push(skipped_step(step, reason));
            continue;
        }

        let input = step.action.as_ref().map(|a| a.label.clone());
        let action = match &step.action {
            None => ActionOutcome::Absent,
            Some(selected) => match invoke(&selected.action) {
                Ok(()) => ActionOutcome::Passed,
                Err(detail) => {
                    warn!(
                        scenario,
                        step = %step.label,
                        input = %selected.label,
                        %detail,
                        "input failed, skipping remaining steps"
                    );
                    let reason = format!("input '{}' of step {} failed", selected.label, step.label);
                    let checks = skipped_checks(step, &reason);
                    aborted = Some(reason);
                    outcomes.push(StepOutcome {
                        position: step.position,
                        node: step.node.clone(),
                        label: step.label.clone(),
                        input,
                        action: ActionOutcome::Failed(detail),
                        checks,
                    });
                    continue;
                }
            },
        };

        let checks = step
            .checks
            .iter()
            .map(|check| {
                let status = match invoke(&check.callable) {
                    Ok(()) => CheckStatus::Passed,
                    Err(detail) => {
                        debug!(scenario, step = %step.label, check = %check.name, %detail, "check failed");
                        CheckStatus::Failed(detail)
                    }
                };
                CheckOutcome {
                    name: check.name.clone(),
                    status,
                }
            })
            .collect();

        outcomes.push(StepOutcome {
            position: step.position,
            node: step.node.clone(),
            label: step.label.clone(),
            input,
            action,
            checks,
        });
    }

    RunResult {
        scenario: scenario.to_string(),
        steps: outcomes,
        start_hook_failure: None,
        stop_hook_failure: None,
    }
}

fn skipped_step(step: &Step, reason: &str) -> StepOutcome {
    StepOutcome {
        position: step.position,
        node: step.node.clone(),
        label: step.label.clone(),
        input: step.action.as_ref().map(|a| a.label.clone()),
        action: ActionOutcome::Skipped(reason.to_string()),
        checks: skipped_checks(step, reason),
    }
}

fn skipped_checks(step: &Step, reason: &str) -> Vec<CheckOutcome> {
    step.checks
        .iter()
        .map(|check| CheckOutcome {
            name: check.name.clone(),
            status: CheckStatus::Skipped(reason.to_string()),
        })
        .collect()
}

/// Call an author-supplied callable, turning errors and panics into a message.
pub(crate) fn invoke(callable: &Callable) -> Result<(), String> {
    match panic::catch_unwind(AssertUnwindSafe(|| callable())) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(err.to_string()),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {}", msg)
    } else {
        "panicked".to_string()
    }
}
