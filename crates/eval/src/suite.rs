//! Suite planning and execution.
//!
//! A [`Suite`] is the full ordered list of `(scenario, steps)` pairs for one
//! repetition count. Any test harness can iterate it; [`Suite::run`] is the
//! built-in sequential executor that also brackets each scenario with the
//! graph's start and stop hooks.

use serde::Serialize;
use tracing::{debug, info, warn};
use trellis_analyze::{enumerate_scenarios, Scenario};
use trellis_core::{Graph, GraphConfigError};

use crate::compile::{compile_scenario, Step, StepPlan};
use crate::runner::{invoke, run_steps, FailureRecord, RunResult};

/// A scenario together with its compiled steps.
#[derive(Debug, Clone)]
pub struct CompiledScenario {
    pub scenario: Scenario,
    pub steps: Vec<Step>,
}

/// Callable-free description of a compiled scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioDescription {
    pub index: usize,
    pub name: String,
    pub steps: Vec<StepPlan>,
}

impl CompiledScenario {
    pub fn name(&self) -> &str {
        &self.scenario.name
    }

    pub fn describe(&self) -> ScenarioDescription {
        ScenarioDescription {
            index: self.scenario.index,
            name: self.scenario.name.clone(),
            steps: self.steps.iter().map(Step::describe).collect(),
        }
    }
}

/// Every compiled scenario of a graph for one repetition count.
#[derive(Debug, Clone)]
pub struct Suite {
    pub repeat: usize,
    pub scenarios: Vec<CompiledScenario>,
}

/// Enumerate and compile every scenario of `graph`.
///
/// Compilation is all or nothing: the first authoring defect is returned.
pub fn plan_suite(graph: &Graph, repeat: usize) -> Result<Suite, GraphConfigError> {
    compile_suite(graph, repeat, enumerate_scenarios(graph, repeat)?)
}

/// Compile already enumerated scenarios into a suite.
pub fn compile_suite(
    graph: &Graph,
    repeat: usize,
    scenarios: Vec<Scenario>,
) -> Result<Suite, GraphConfigError> {
    let scenarios = scenarios
        .into_iter()
        .map(|scenario| {
            let steps = compile_scenario(graph, &scenario)?;
            Ok(CompiledScenario { scenario, steps })
        })
        .collect::<Result<Vec<_>, GraphConfigError>>()?;

    debug!(repeat, scenarios = scenarios.len(), "planned suite");
    Ok(Suite { repeat, scenarios })
}

impl Suite {
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledScenario> {
        self.scenarios.iter()
    }

    pub fn get(&self, name: &str) -> Option<&CompiledScenario> {
        self.scenarios.iter().find(|s| s.name() == name)
    }

    pub fn describe(&self) -> Vec<ScenarioDescription> {
        self.scenarios.iter().map(CompiledScenario::describe).collect()
    }

    /// Run every scenario in order.
    pub fn run(&self, graph: &Graph) -> SuiteReport {
        let results = self
            .scenarios
            .iter()
            .map(|compiled| run_compiled(graph, compiled))
            .collect();
        SuiteReport { results }
    }
}

/// Run one compiled scenario between the graph's start and stop hooks.
///
/// A failing start hook marks every step as skipped. The stop hook always
/// runs.
pub fn run_compiled(graph: &Graph, compiled: &CompiledScenario) -> RunResult {
    let name = compiled.name();
    let hooks = graph.hooks();

    let start_hook_failure = hooks.on_start.as_ref().and_then(|hook| invoke(hook).err());
    let aborted = start_hook_failure.as_ref().map(|detail| {
        warn!(scenario = name, %detail, "scenario start hook failed");
        "scenario start hook failed".to_string()
    });

    let mut result = run_steps(name, &compiled.steps, aborted);
    result.start_hook_failure = start_hook_failure;
    result.stop_hook_failure = hooks.on_stop.as_ref().and_then(|hook| invoke(hook).err());

    info!(
        scenario = name,
        success = result.is_success(),
        failures = result.failures().len(),
        "scenario finished"
    );
    result
}

/// Results of a whole suite run.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub results: Vec<RunResult>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> Vec<FailureRecord> {
        self.results.iter().flat_map(RunResult::failures).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{ActionOutcome, FailureKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use trellis_core::{CallResult, Node};

    fn noop() -> CallResult {
        Ok(())
    }

    #[test]
    fn plan_lists_every_scenario_in_order() {
        let graph = Graph::builder()
            .node(Node::new("A").input(noop))
            .node(Node::new("B").after(["A"]).input(noop).check("b", noop))
            .node(Node::new("C").after(["A"]).input(noop))
            .build()
            .unwrap();

        let suite = plan_suite(&graph, 0).unwrap();
        let names: Vec<&str> = suite.iter().map(CompiledScenario::name).collect();
        assert_eq!(names, vec!["A-B", "A-C"]);
        assert_eq!(suite.get("A-B").unwrap().describe().steps[1].checks, vec!["b"]);
    }

    #[test]
    fn planning_is_deterministic() {
        let build = || {
            Graph::builder()
                .start("A")
                .node(Node::new("A").after(["B"]).input(noop).check("z", noop).check("a", noop))
                .node(Node::new("B").after(["A", "B"]).input(noop))
                .build()
                .unwrap()
        };
        let first = plan_suite(&build(), 2).unwrap().describe();
        let second = plan_suite(&build(), 2).unwrap().describe();
        assert_eq!(first, second);
        assert_eq!(first[0].steps[0].checks, vec!["a", "z"]);
    }

    #[test]
    fn compiling_enumerated_scenarios_matches_planning() {
        let graph = Graph::builder()
            .start("A")
            .node(Node::new("A").after(["B"]).input(noop))
            .node(Node::new("B").after(["A"]).input(noop).check("b", noop))
            .build()
            .unwrap();

        let plan = trellis_analyze::analyze(&graph, 1).unwrap();
        let suite = compile_suite(&graph, 1, plan.scenarios.clone()).unwrap();
        assert_eq!(suite.repeat, 1);
        assert_eq!(suite.len(), plan.scenarios.len());
        assert_eq!(suite.describe(), plan_suite(&graph, 1).unwrap().describe());
    }

    #[test]
    fn hooks_bracket_every_scenario() {
        let log = Arc::new(Mutex::new(Vec::<String>::new()));
        let (start_log, stop_log, b_log) = (log.clone(), log.clone(), log.clone());

        let graph = Graph::builder()
            .on_scenario_start(move || {
                start_log.lock().unwrap().push("start".into());
                Ok(())
            })
            .on_scenario_stop(move || {
                stop_log.lock().unwrap().push("stop".into());
                Ok(())
            })
            .node(Node::new("A").input(noop))
            .node(Node::new("B").after(["A"]).input(move || {
                b_log.lock().unwrap().push("B".into());
                Ok(())
            }))
            .build()
            .unwrap();

        let report = plan_suite(&graph, 0).unwrap().run(&graph);
        assert!(report.is_success());
        assert_eq!(*log.lock().unwrap(), vec!["start", "B", "stop"]);
    }

    #[test]
    fn failing_start_hook_skips_steps_but_runs_stop_hook() {
        let stops = Arc::new(AtomicUsize::new(0));
        let counter = stops.clone();
        let graph = Graph::builder()
            .on_scenario_start(|| Err("server did not come up".into()))
            .on_scenario_stop(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .node(Node::new("A").input(|| panic!("must not run")))
            .build()
            .unwrap();

        let report = plan_suite(&graph, 0).unwrap().run(&graph);
        let result = &report.results[0];
        assert!(matches!(result.steps[0].action, ActionOutcome::Skipped(_)));
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures()[0].kind, FailureKind::StartHook);
    }

    #[test]
    fn stop_hook_runs_after_aborted_input() {
        let stops = Arc::new(AtomicUsize::new(0));
        let counter = stops.clone();
        let graph = Graph::builder()
            .on_scenario_stop(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Err("teardown failed".into())
            })
            .node(Node::new("A").input(noop))
            .node(Node::new("B").after(["A"]).input(|| Err("door jammed".into())))
            .node(Node::new("C").after(["B"]).input(|| panic!("must not run")))
            .build()
            .unwrap();

        let report = plan_suite(&graph, 0).unwrap().run(&graph);
        assert_eq!(stops.load(Ordering::SeqCst), 1);

        let result = &report.results[0];
        assert!(matches!(result.steps[2].action, ActionOutcome::Skipped(_)));
        let kinds: Vec<FailureKind> = report.failures().iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![FailureKind::Action, FailureKind::StopHook]);
    }

    #[test]
    fn ambiguity_aborts_planning() {
        let graph = Graph::builder()
            .node(Node::new("A").input(noop))
            .node(Node::new("B").after(["A"]).input(noop).input(noop))
            .build()
            .unwrap();
        assert!(matches!(
            plan_suite(&graph, 0),
            Err(GraphConfigError::AmbiguousAction { .. })
        ));
    }
}
