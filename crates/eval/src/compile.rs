//! Scenario compiler.
//!
//! Turns one enumerated scenario into an ordered list of [`Step`]s. For each
//! position the history is the prefix of the scenario before it, so the same
//! node can compile differently at different positions.

use std::fmt;

use serde::Serialize;
use tracing::debug;
use trellis_analyze::Scenario;
use trellis_core::{Callable, Graph, GraphConfigError};

use crate::predicate::optional_guard_accepts;

/// The input variant chosen for a step.
#[derive(Clone)]
pub struct SelectedAction {
    pub label: String,
    pub action: Callable,
}

/// A check that applies at a step.
#[derive(Clone)]
pub struct CompiledCheck {
    pub name: String,
    pub callable: Callable,
}

/// Position-specific resolution of a node.
#[derive(Clone)]
pub struct Step {
    pub position: usize,
    pub node: String,
    /// `NNNN_node`, unique within a scenario.
    pub label: String,
    pub action: Option<SelectedAction>,
    /// Sorted by check name.
    pub checks: Vec<CompiledCheck>,
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("position", &self.position)
            .field("node", &self.node)
            .field("action", &self.action.as_ref().map(|a| &a.label))
            .field(
                "checks",
                &self.checks.iter().map(|c| &c.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Callable-free description of a step, for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepPlan {
    pub position: usize,
    pub node: String,
    pub label: String,
    pub input: Option<String>,
    pub checks: Vec<String>,
}

impl Step {
    pub fn describe(&self) -> StepPlan {
        StepPlan {
            position: self.position,
            node: self.node.clone(),
            label: self.label.clone(),
            input: self.action.as_ref().map(|a| a.label.clone()),
            checks: self.checks.iter().map(|c| c.name.clone()).collect(),
        }
    }
}

pub fn step_label(position: usize, node: &str) -> String {
    format!("{:04}_{}", position, node)
}

/// Compile `scenario` against `graph`.
///
/// Fails with [`GraphConfigError::AmbiguousAction`] when more than one input
/// variant of a node accepts the history at some position.
pub fn compile_scenario(graph: &Graph, scenario: &Scenario) -> Result<Vec<Step>, GraphConfigError> {
    let mut steps = Vec::with_capacity(scenario.nodes.len());

    for (position, name) in scenario.nodes.iter().enumerate() {
        let history = &scenario.nodes[..position];
        let node = graph
            .node(name)
            .ok_or_else(|| GraphConfigError::UnknownNode { name: name.clone() })?;

        let matching: Vec<_> = node
            .inputs()
            .iter()
            .filter(|variant| optional_guard_accepts(variant.guard.as_ref(), history))
            .collect();

        let action = match matching.as_slice() {
            [] => None,
            [variant] => Some(SelectedAction {
                label: variant.label.clone(),
                action: variant.action.clone(),
            }),
            _ => {
                return Err(GraphConfigError::AmbiguousAction {
                    scenario: scenario.name.clone(),
                    position,
                    node: name.clone(),
                    candidates: matching.iter().map(|v| v.label.clone()).collect(),
                    history: history.to_vec(),
                })
            }
        };

        let checks = node
            .checks()
            .iter()
            .filter(|check| optional_guard_accepts(check.guard.as_ref(), history))
            .map(|check| CompiledCheck {
                name: check.name.clone(),
                callable: check.callable.clone(),
            })
            .collect();

        steps.push(Step {
            position,
            node: name.clone(),
            label: step_label(position, name),
            action,
            checks,
        });
    }

    debug!(scenario = %scenario.name, steps = steps.len(), "compiled scenario");
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_analyze::name_scenarios;
    use trellis_core::{CallResult, Condition, Node};

    fn noop() -> CallResult {
        Ok(())
    }

    fn scenario(nodes: &[&str]) -> Scenario {
        name_scenarios(vec![nodes.iter().map(|n| n.to_string()).collect()]).remove(0)
    }

    fn abc_graph() -> Graph {
        Graph::builder()
            .node(Node::new("A").input(noop).check("a_ok", noop))
            .node(Node::new("B").after(["A"]).input(noop))
            .node(
                Node::new("C")
                    .after(["A", "B"])
                    .input_after(["A"], noop)
                    .input_after(["B"], noop)
                    .check("z_last", noop)
                    .check_after("from_b", ["B"], noop)
                    .check_when("after_a_b", Condition::sequence(["A", "B"]), noop),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn selects_input_by_predecessor() {
        let graph = abc_graph();

        let direct = compile_scenario(&graph, &scenario(&["A", "C"])).unwrap();
        assert_eq!(direct[1].describe().input.as_deref(), Some("input#0"));
        assert_eq!(direct[1].describe().checks, vec!["z_last"]);

        let via_b = compile_scenario(&graph, &scenario(&["A", "B", "C"])).unwrap();
        let plan = via_b[2].describe();
        assert_eq!(plan.input.as_deref(), Some("input#1"));
        assert_eq!(plan.checks, vec!["after_a_b", "from_b", "z_last"]);
        assert_eq!(plan.label, "0002_C");
    }

    #[test]
    fn start_node_uses_unguarded_input() {
        let graph = abc_graph();
        let steps = compile_scenario(&graph, &scenario(&["A", "B"])).unwrap();
        assert_eq!(steps[0].describe().input.as_deref(), Some("input"));
        assert_eq!(steps[0].describe().checks, vec!["a_ok"]);
    }

    #[test]
    fn no_matching_input_means_no_action() {
        let graph = Graph::builder()
            .node(Node::new("A"))
            .node(Node::new("B").after(["A"]).input_when(Condition::sequence(["B", "B"]), noop))
            .build()
            .unwrap();
        let steps = compile_scenario(&graph, &scenario(&["A", "B"])).unwrap();
        assert!(steps[0].action.is_none());
        assert!(steps[1].action.is_none());
    }

    #[test]
    fn ambiguous_inputs_are_rejected() {
        let graph = Graph::builder()
            .node(Node::new("A").input(noop))
            .node(
                Node::new("B")
                    .after(["A"])
                    .input_after(["A"], noop)
                    .input_when(Condition::last_in(["A"]), noop),
            )
            .build()
            .unwrap();

        let err = compile_scenario(&graph, &scenario(&["A", "B"])).unwrap_err();
        assert_eq!(
            err,
            GraphConfigError::AmbiguousAction {
                scenario: "A-B".into(),
                position: 1,
                node: "B".into(),
                candidates: vec!["input#0".into(), "input#1".into()],
                history: vec!["A".into()],
            }
        );
    }

    #[test]
    fn repeated_node_compiles_per_position() {
        let graph = Graph::builder()
            .start("A")
            .node(
                Node::new("A")
                    .after(["B"])
                    .input(noop)
                    .check_when("looped", Condition::sequence(["A", "B"]), noop),
            )
            .node(Node::new("B").after(["A"]).input(noop))
            .build()
            .unwrap();

        let steps = compile_scenario(&graph, &scenario(&["A", "B", "A"])).unwrap();
        assert!(steps[0].checks.is_empty());
        assert_eq!(steps[2].describe().checks, vec!["looped"]);
    }

    #[test]
    fn unknown_node_in_scenario() {
        let graph = abc_graph();
        let err = compile_scenario(&graph, &scenario(&["A", "Q"])).unwrap_err();
        assert_eq!(err, GraphConfigError::UnknownNode { name: "Q".into() });
    }
}
