//! Loop repetition expansion.
//!
//! Each simple cycle `(N, ..., N)` is extended by appending its tail
//! `(..., N)` `repeat - 1` more times. Every node occurrence in a trail is
//! then replaced by one of the extended loops of that node, or by `(N)`
//! when the node lies on no cycle. The cartesian product of these choices
//! gives the expanded scenarios.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::trails::NodeSequence;

/// Expand `trails` with loops repeated `repeat` times.
///
/// `repeat == 0` returns the trails unchanged. The result keeps the first
/// occurrence of every distinct sequence, in generation order.
pub fn expand_loops(
    trails: &[NodeSequence],
    cycles: &BTreeMap<String, Vec<NodeSequence>>,
    repeat: usize,
) -> Vec<NodeSequence> {
    if repeat == 0 {
        return trails.to_vec();
    }

    let extended: BTreeMap<&str, Vec<NodeSequence>> = cycles
        .iter()
        .filter(|(_, loops)| !loops.is_empty())
        .map(|(node, loops)| {
            let loops = loops.iter().map(|cycle| extend_loop(cycle, repeat)).collect();
            (node.as_str(), loops)
        })
        .collect();

    let mut seen = HashSet::new();
    let mut expanded = Vec::new();
    for trail in trails {
        let mut partials: Vec<NodeSequence> = vec![Vec::new()];
        for node in trail {
            partials = match extended.get(node.as_str()) {
                Some(loops) => partials
                    .iter()
                    .flat_map(|prefix| {
                        loops.iter().map(move |lp| {
                            let mut next = prefix.clone();
                            next.extend(lp.iter().cloned());
                            next
                        })
                    })
                    .collect(),
                None => partials
                    .into_iter()
                    .map(|mut prefix| {
                        prefix.push(node.clone());
                        prefix
                    })
                    .collect(),
            };
        }
        for sequence in partials {
            if seen.insert(sequence.clone()) {
                expanded.push(sequence);
            }
        }
    }

    debug!(
        trails = trails.len(),
        repeat,
        scenarios = expanded.len(),
        "expanded loops"
    );
    expanded
}

/// `(N, X, N)` with `repeat = 3` becomes `(N, X, N, X, N, X, N)`.
pub fn extend_loop(cycle: &[String], repeat: usize) -> NodeSequence {
    let mut extended = cycle.to_vec();
    if let Some(tail) = cycle.get(1..) {
        for _ in 1..repeat {
            extended.extend_from_slice(tail);
        }
    }
    extended
}
