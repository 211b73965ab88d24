//! Trellis scenario evaluation.
//!
//! Compiles enumerated scenarios into ordered steps and runs them:
//!
//! - [`predicate`] evaluates history conditions and guards
//! - [`compile`] resolves the input and checks of each scenario position
//! - [`runner`] executes steps with per-check failure isolation and
//!   input-failure abort
//! - [`suite`] plans every scenario of a graph and runs them in order

pub mod compile;
pub mod predicate;
pub mod runner;
pub mod suite;

pub use compile::{compile_scenario, step_label, CompiledCheck, SelectedAction, Step, StepPlan};
pub use predicate::{eval_condition, guard_accepts};
pub use runner::{
    run_scenario, ActionOutcome, CheckOutcome, CheckStatus, FailureKind, FailureRecord, RunResult,
    StepOutcome,
};
pub use suite::{
    compile_suite, plan_suite, run_compiled, CompiledScenario, ScenarioDescription, Suite, SuiteReport,
};
