//! Simple cycle discovery.
//!
//! Unlike trail enumeration, which forbids reusing an *edge*, cycle search
//! forbids revisiting any *node* other than the cycle's origin.

use std::collections::{BTreeMap, BTreeSet};

use trellis_core::Graph;
use tracing::debug;

use crate::trails::NodeSequence;

/// Find, for every node `N`, each simple cycle `(N, ..., N)` through it.
///
/// Every node of the graph has an entry; nodes on no cycle map to an empty
/// list.
pub fn find_cycles(graph: &Graph) -> BTreeMap<String, Vec<NodeSequence>> {
    let mut cycles = BTreeMap::new();

    for node in graph.nodes() {
        let origin = node.name();
        let mut found = Vec::new();
        let mut path = vec![origin];
        let mut visited = BTreeSet::new();
        search(graph, origin, origin, &mut path, &mut visited, &mut found);
        cycles.insert(origin.to_string(), found);
    }

    debug!(
        cycles = cycles.values().map(Vec::len).sum::<usize>(),
        "found simple cycles"
    );
    cycles
}

fn search<'g>(
    graph: &'g Graph,
    origin: &'g str,
    at: &'g str,
    path: &mut Vec<&'g str>,
    visited: &mut BTreeSet<&'g str>,
    found: &mut Vec<NodeSequence>,
) {
    for next in graph.successors(at) {
        if next == origin {
            let mut cycle: NodeSequence = path.iter().map(|name| name.to_string()).collect();
            cycle.push(origin.to_string());
            found.push(cycle);
        } else if visited.insert(next) {
            path.push(next);
            search(graph, origin, next, path, visited, found);
            path.pop();
            visited.remove(next);
        }
    }
}
