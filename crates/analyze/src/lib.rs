//! Trellis scenario enumeration.
//!
//! Derives the complete, deterministic set of scenarios of a [`Graph`]:
//!
//! 1. [`trails::enumerate_trails`] walks every maximal edge-simple trail from
//!    the start node.
//! 2. [`cycles::find_cycles`] discovers the simple cycles through each node.
//! 3. [`loops::expand_loops`] substitutes repeated cycles into the trails.
//!
//! [`analyze`] runs all three and gathers the results into a serializable
//! [`ScenarioPlan`].

pub mod cycles;
pub mod loops;
pub mod report;
pub mod scenario;
pub mod trails;

pub use cycles::find_cycles;
pub use loops::{expand_loops, extend_loop};
pub use report::{PlanSummary, ScenarioPlan};
pub use scenario::{enumerate_scenarios, enumerate_scenarios_from, name_scenarios, Scenario};
pub use trails::{enumerate_trails, NodeSequence};

use trellis_core::{Graph, GraphConfigError};

/// Run trail enumeration, cycle discovery and loop expansion for `graph`.
pub fn analyze(graph: &Graph, repeat: usize) -> Result<ScenarioPlan, GraphConfigError> {
    let trails = enumerate_trails(graph, graph.start())?;
    let cycles = find_cycles(graph);
    let sequences = expand_loops(&trails, &cycles, repeat);

    Ok(ScenarioPlan {
        start: graph.start().to_string(),
        repeat,
        trails,
        cycles: cycles
            .into_iter()
            .filter(|(_, loops)| !loops.is_empty())
            .collect(),
        scenarios: name_scenarios(sequences),
    })
}

/// Build a graph from `(from, to)` edges with `start` as designated start.
#[cfg(test)]
pub(crate) fn test_graph(start: &str, edges: &[(&str, &str)]) -> Graph {
    use std::collections::BTreeMap;
    use trellis_core::Node;

    let mut predecessors: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    predecessors.entry(start).or_default();
    for &(from, to) in edges {
        predecessors.entry(from).or_default();
        predecessors.entry(to).or_default().push(from);
    }

    let mut builder = Graph::builder().start(start);
    for (name, preds) in predecessors {
        builder = builder.node(Node::new(name).after(preds));
    }
    builder.build().expect("test graph must be valid")
}
