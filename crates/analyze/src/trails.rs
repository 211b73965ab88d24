//! Trail enumeration.
//!
//! A trail is a maximal walk from the start node that never uses the same
//! directed edge twice on one branch. Nodes may be revisited, so cycles are
//! walked, but each edge only once per branch.

use std::collections::BTreeSet;

use trellis_core::{Graph, GraphConfigError};
use tracing::debug;

/// Ordered node names of one walk through the graph.
pub type NodeSequence = Vec<String>;

/// Enumerate every maximal edge-simple trail starting at `start`.
///
/// Successors are explored in name order, so the output order is stable.
/// A start node without outgoing edges yields the single trail `(start)`.
pub fn enumerate_trails(graph: &Graph, start: &str) -> Result<Vec<NodeSequence>, GraphConfigError> {
    let start = graph
        .node(start)
        .ok_or_else(|| GraphConfigError::UnknownNode {
            name: start.to_string(),
        })?
        .name();

    let mut trails = Vec::new();
    let mut path = vec![start];
    let mut used = BTreeSet::new();
    walk(graph, start, &mut path, &mut used, &mut trails);

    debug!(start, trails = trails.len(), "enumerated trails");
    Ok(trails)
}

fn walk<'g>(
    graph: &'g Graph,
    at: &'g str,
    path: &mut Vec<&'g str>,
    used: &mut BTreeSet<(&'g str, &'g str)>,
    trails: &mut Vec<NodeSequence>,
) {
    let mut maximal = true;
    for next in graph.successors(at) {
        if !used.insert((at, next)) {
            continue;
        }
        maximal = false;
        path.push(next);
        walk(graph, next, path, used, trails);
        path.pop();
        used.remove(&(at, next));
    }

    if maximal {
        trails.push(path.iter().map(|name| name.to_string()).collect());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_graph;

    fn seq(names: &[&str]) -> NodeSequence {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn single_node_yields_singleton_trail() {
        let graph = test_graph("A", &[]);
        assert_eq!(enumerate_trails(&graph, "A").unwrap(), vec![seq(&["A"])]);
    }

    #[test]
    fn self_loop_is_walked_once() {
        let graph = test_graph("A", &[("A", "A")]);
        assert_eq!(enumerate_trails(&graph, "A").unwrap(), vec![seq(&["A", "A"])]);
    }

    #[test]
    fn linear_chain() {
        let graph = test_graph("A", &[("A", "B"), ("B", "C")]);
        assert_eq!(
            enumerate_trails(&graph, "A").unwrap(),
            vec![seq(&["A", "B", "C"])]
        );
    }

    #[test]
    fn diamond_yields_both_branches() {
        let graph = test_graph("A", &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]);
        assert_eq!(
            enumerate_trails(&graph, "A").unwrap(),
            vec![seq(&["A", "B", "D"]), seq(&["A", "C", "D"])]
        );
    }

    #[test]
    fn dense_two_node_graph() {
        let graph = test_graph("A", &[("A", "A"), ("A", "B"), ("B", "A"), ("B", "B")]);
        assert_eq!(
            enumerate_trails(&graph, "A").unwrap(),
            vec![
                seq(&["A", "A", "B", "A"]),
                seq(&["A", "A", "B", "B", "A"]),
                seq(&["A", "B", "A", "A"]),
                seq(&["A", "B", "B", "A", "A"]),
            ]
        );
    }

    #[test]
    fn two_cycle_closes_back_on_start() {
        let graph = test_graph("A", &[("A", "B"), ("B", "A")]);
        assert_eq!(
            enumerate_trails(&graph, "A").unwrap(),
            vec![seq(&["A", "B", "A"])]
        );
    }

    #[test]
    fn start_may_be_any_declared_node() {
        let graph = test_graph("A", &[("A", "B"), ("B", "C")]);
        assert_eq!(enumerate_trails(&graph, "B").unwrap(), vec![seq(&["B", "C"])]);
    }

    #[test]
    fn unknown_start_is_an_error() {
        let graph = test_graph("A", &[]);
        assert_eq!(
            enumerate_trails(&graph, "Z").unwrap_err(),
            GraphConfigError::UnknownNode { name: "Z".into() }
        );
    }
}
