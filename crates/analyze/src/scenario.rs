//! Named scenarios derived from trails and loop expansion.

use std::collections::BTreeSet;

use serde::Serialize;
use trellis_core::{Graph, GraphConfigError};

use crate::cycles::find_cycles;
use crate::loops::expand_loops;
use crate::trails::{enumerate_trails, NodeSequence};

/// One concrete, fully ordered trace through the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    /// Position in the enumeration order.
    pub index: usize,
    /// Node names joined with `-`, suffixed with `#<n>` until unique within
    /// one enumeration.
    pub name: String,
    pub nodes: NodeSequence,
}

/// Enumerate the scenarios of `graph` from its start node.
pub fn enumerate_scenarios(graph: &Graph, repeat: usize) -> Result<Vec<Scenario>, GraphConfigError> {
    enumerate_scenarios_from(graph, graph.start(), repeat)
}

/// Enumerate the scenarios of `graph` from an arbitrary node.
pub fn enumerate_scenarios_from(
    graph: &Graph,
    start: &str,
    repeat: usize,
) -> Result<Vec<Scenario>, GraphConfigError> {
    let trails = enumerate_trails(graph, start)?;
    let sequences = if repeat == 0 {
        trails
    } else {
        expand_loops(&trails, &find_cycles(graph), repeat)
    };
    Ok(name_scenarios(sequences))
}

/// Attach indices and names to node sequences.
pub fn name_scenarios(sequences: Vec<NodeSequence>) -> Vec<Scenario> {
    let mut taken = BTreeSet::new();
    sequences
        .into_iter()
        .enumerate()
        .map(|(index, nodes)| {
            let base = nodes.join("-");
            let mut name = base.clone();
            let mut suffix = index;
            while !taken.insert(name.clone()) {
                name = format!("{}#{}", base, suffix);
                suffix += 1;
            }
            Scenario { index, name, nodes }
        })
        .collect()
}
