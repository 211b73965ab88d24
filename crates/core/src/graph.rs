//! Graph model: nodes, guards, and the validated graph.
//!
//! Nodes are declared with their *predecessors*; [`GraphBuilder::build`]
//! validates referential integrity and inverts the predecessor sets into
//! forward successor edges. After build the graph is immutable.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::condition::Condition;
use crate::error::GraphConfigError;

/// Error returned by an action, check, or hook.
pub type CallError = Box<dyn std::error::Error + Send + Sync>;

/// Result of invoking an action, check, or hook.
pub type CallResult = Result<(), CallError>;

/// Opaque zero-argument callable supplied by the graph author.
pub type Callable = Arc<dyn Fn() -> CallResult + Send + Sync>;

/// Gate deciding whether an input variant or check applies at a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// The last executed node is one of these predecessors.
    Predecessors(BTreeSet<String>),
    /// A general condition over the history.
    When(Condition),
}

impl Guard {
    pub fn after<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Guard::Predecessors(names.into_iter().map(Into::into).collect())
    }

    pub fn when(condition: Condition) -> Self {
        Guard::When(condition)
    }
}

/// One candidate entry action of a node.
#[derive(Clone)]
pub struct InputVariant {
    pub label: String,
    pub guard: Option<Guard>,
    pub action: Callable,
}

impl fmt::Debug for InputVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputVariant")
            .field("label", &self.label)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

/// A named check run after a node's input.
#[derive(Clone)]
pub struct Check {
    pub name: String,
    pub guard: Option<Guard>,
    pub callable: Callable,
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

/// A state declaration.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    predecessors: BTreeSet<String>,
    inputs: Vec<InputVariant>,
    checks: Vec<Check>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            predecessors: BTreeSet::new(),
            inputs: Vec::new(),
            checks: Vec::new(),
        }
    }

    /// Declare the nodes this node can be entered from.
    pub fn after<I, S>(mut self, predecessors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predecessors
            .extend(predecessors.into_iter().map(Into::into));
        self
    }

    /// Unconditional entry action.
    pub fn input<F>(self, action: F) -> Self
    where
        F: Fn() -> CallResult + Send + Sync + 'static,
    {
        self.push_input(None, None, Arc::new(action))
    }

    /// Entry action used when the previous node is one of `predecessors`.
    pub fn input_after<I, S, F>(self, predecessors: I, action: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn() -> CallResult + Send + Sync + 'static,
    {
        self.push_input(None, Some(Guard::after(predecessors)), Arc::new(action))
    }

    /// Entry action used when `condition` holds over the history.
    pub fn input_when<F>(self, condition: Condition, action: F) -> Self
    where
        F: Fn() -> CallResult + Send + Sync + 'static,
    {
        self.push_input(None, Some(Guard::When(condition)), Arc::new(action))
    }

    /// Entry action with an explicit label.
    pub fn input_variant(
        self,
        label: impl Into<String>,
        guard: Option<Guard>,
        action: Callable,
    ) -> Self {
        self.push_input(Some(label.into()), guard, action)
    }

    /// Unconditional check.
    pub fn check<F>(self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn() -> CallResult + Send + Sync + 'static,
    {
        self.check_guarded(name, None, Arc::new(check))
    }

    /// Check that only applies when the previous node is one of `predecessors`.
    pub fn check_after<I, S, F>(self, name: impl Into<String>, predecessors: I, check: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn() -> CallResult + Send + Sync + 'static,
    {
        self.check_guarded(name, Some(Guard::after(predecessors)), Arc::new(check))
    }

    /// Check that only applies when `condition` holds over the history.
    pub fn check_when<F>(self, name: impl Into<String>, condition: Condition, check: F) -> Self
    where
        F: Fn() -> CallResult + Send + Sync + 'static,
    {
        self.check_guarded(name, Some(Guard::When(condition)), Arc::new(check))
    }

    pub fn check_guarded(
        mut self,
        name: impl Into<String>,
        guard: Option<Guard>,
        callable: Callable,
    ) -> Self {
        self.checks.push(Check {
            name: name.into(),
            guard,
            callable,
        });
        self
    }

    fn push_input(mut self, label: Option<String>, guard: Option<Guard>, action: Callable) -> Self {
        let label = label.unwrap_or_else(|| format!("input#{}", self.inputs.len()));
        self.inputs.push(InputVariant {
            label,
            guard,
            action,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn predecessors(&self) -> &BTreeSet<String> {
        &self.predecessors
    }

    pub fn inputs(&self) -> &[InputVariant] {
        &self.inputs
    }

    /// Checks, sorted by name once the node is part of a built graph.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }
}

/// Callables bracketing every scenario run.
#[derive(Clone, Default)]
pub struct ScenarioHooks {
    pub on_start: Option<Callable>,
    pub on_stop: Option<Callable>,
}

impl fmt::Debug for ScenarioHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioHooks")
            .field("on_start", &self.on_start.is_some())
            .field("on_stop", &self.on_stop.is_some())
            .finish()
    }
}

/// Collects node declarations and validates them into a [`Graph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    start: Option<String>,
    hooks: ScenarioHooks,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Designate the start node explicitly. Needed when the start node can
    /// be re-entered and therefore has predecessors of its own.
    pub fn start(mut self, name: impl Into<String>) -> Self {
        self.start = Some(name.into());
        self
    }

    pub fn on_scenario_start<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> CallResult + Send + Sync + 'static,
    {
        self.hooks.on_start = Some(Arc::new(hook));
        self
    }

    pub fn on_scenario_stop<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> CallResult + Send + Sync + 'static,
    {
        self.hooks.on_stop = Some(Arc::new(hook));
        self
    }

    /// Validate the declarations and build the graph.
    pub fn build(self) -> Result<Graph, GraphConfigError> {
        let mut nodes: BTreeMap<String, Node> = BTreeMap::new();
        let mut order = Vec::with_capacity(self.nodes.len());
        for node in self.nodes {
            if nodes.contains_key(&node.name) {
                return Err(GraphConfigError::DuplicateNode { name: node.name });
            }
            order.push(node.name.clone());
            nodes.insert(node.name.clone(), node);
        }

        // Validate in declaration order so errors name the first offender.
        for name in &order {
            let node = &nodes[name];
            for predecessor in &node.predecessors {
                if !nodes.contains_key(predecessor) {
                    return Err(GraphConfigError::UnknownPredecessor {
                        node: name.clone(),
                        predecessor: predecessor.clone(),
                    });
                }
            }
            let input_guards = node.inputs.iter().filter_map(|i| i.guard.as_ref());
            let check_guards = node.checks.iter().filter_map(|c| c.guard.as_ref());
            for guard in input_guards.chain(check_guards) {
                validate_guard(node, guard, &nodes)?;
            }
            let mut labels = BTreeSet::new();
            for input in &node.inputs {
                if !labels.insert(input.label.as_str()) {
                    return Err(GraphConfigError::DuplicateInputLabel {
                        node: name.clone(),
                        label: input.label.clone(),
                    });
                }
            }
            let mut seen = BTreeSet::new();
            for check in &node.checks {
                if !seen.insert(check.name.as_str()) {
                    return Err(GraphConfigError::DuplicateCheck {
                        node: name.clone(),
                        check: check.name.clone(),
                    });
                }
            }
        }

        let start = resolve_start(self.start, &nodes, &order)?;

        let mut successors: BTreeMap<String, BTreeSet<String>> = nodes
            .keys()
            .map(|name| (name.clone(), BTreeSet::new()))
            .collect();
        for node in nodes.values() {
            for predecessor in &node.predecessors {
                if let Some(next) = successors.get_mut(predecessor) {
                    next.insert(node.name.clone());
                }
            }
        }

        for node in nodes.values_mut() {
            node.checks.sort_by(|a, b| a.name.cmp(&b.name));
            if node.inputs.len() == 1 && node.inputs[0].label == "input#0" {
                node.inputs[0].label = "input".to_string();
            }
        }

        Ok(Graph {
            nodes,
            successors,
            start,
            hooks: self.hooks,
        })
    }
}

fn validate_guard(
    node: &Node,
    guard: &Guard,
    nodes: &BTreeMap<String, Node>,
) -> Result<(), GraphConfigError> {
    match guard {
        Guard::Predecessors(names) => {
            if let Some(name) = names.iter().find(|n| !node.predecessors.contains(*n)) {
                return Err(GraphConfigError::GuardNotPredecessor {
                    node: node.name.clone(),
                    name: name.clone(),
                });
            }
        }
        Guard::When(condition) => {
            if let Some(name) = condition
                .referenced_names()
                .into_iter()
                .find(|n| !nodes.contains_key(*n))
            {
                return Err(GraphConfigError::UnknownConditionNode {
                    node: node.name.clone(),
                    name: name.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn resolve_start(
    designated: Option<String>,
    nodes: &BTreeMap<String, Node>,
    order: &[String],
) -> Result<String, GraphConfigError> {
    let roots: Vec<String> = order
        .iter()
        .filter(|name| nodes[*name].predecessors.is_empty())
        .cloned()
        .collect();

    match designated {
        Some(start) => {
            if !nodes.contains_key(&start) {
                return Err(GraphConfigError::UnknownStartNode { name: start });
            }
            if roots.iter().any(|r| *r != start) {
                let mut all = vec![start.clone()];
                all.extend(roots.into_iter().filter(|r| *r != start));
                return Err(GraphConfigError::MultipleStartNodes { nodes: all });
            }
            Ok(start)
        }
        None => match roots.len() {
            0 => Err(GraphConfigError::NoStartNode),
            1 => Ok(roots[0].clone()),
            _ => Err(GraphConfigError::MultipleStartNodes { nodes: roots }),
        },
    }
}

/// A validated, immutable state graph.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: BTreeMap<String, Node>,
    successors: BTreeMap<String, BTreeSet<String>>,
    start: String,
    hooks: ScenarioHooks,
}

impl Graph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Nodes in name order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Forward edges out of `name`, in name order. Empty for unknown names.
    pub fn successors(&self, name: &str) -> impl Iterator<Item = &str> {
        self.successors
            .get(name)
            .into_iter()
            .flat_map(|next| next.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn hooks(&self) -> &ScenarioHooks {
        &self.hooks
    }
}
