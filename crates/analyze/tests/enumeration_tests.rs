//! Enumeration properties checked over small hand-built graphs.

use std::collections::{BTreeMap, BTreeSet};

use trellis_analyze::{analyze, enumerate_scenarios, enumerate_trails, find_cycles, NodeSequence};
use trellis_core::{Graph, Node};

fn graph(start: &str, edges: &[(&str, &str)]) -> Graph {
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
    builder.build().unwrap()
}

fn seq(names: &str) -> NodeSequence {
    names.split('-').map(str::to_string).collect()
}

/// Reference walk: every simple path from `node` that ends at a sink.
fn simple_paths_to_sinks(graph: &Graph, node: &str, path: &mut Vec<String>, out: &mut Vec<NodeSequence>) {
    path.push(node.to_string());
    let next: Vec<&str> = graph.successors(node).collect();
    if next.is_empty() {
        out.push(path.clone());
    }
    for succ in next {
        if !path.iter().any(|p| p == succ) {
            simple_paths_to_sinks(graph, succ, path, out);
        }
    }
    path.pop();
}

#[test]
fn linear_chain_has_one_trail() {
    let g = graph("A", &[("A", "B"), ("B", "C")]);
    assert_eq!(enumerate_trails(&g, "A").unwrap(), vec![seq("A-B-C")]);
}

#[test]
fn dense_two_node_graph() {
    let g = graph("A", &[("A", "A"), ("A", "B"), ("B", "A"), ("B", "B")]);
    let trails: BTreeSet<NodeSequence> = enumerate_trails(&g, "A").unwrap().into_iter().collect();
    let expected: BTreeSet<NodeSequence> = ["A-A-B-A", "A-A-B-B-A", "A-B-A-A", "A-B-B-A-A"]
        .into_iter()
        .map(seq)
        .collect();
    assert_eq!(trails, expected);
}

#[test]
fn acyclic_trails_are_simple_paths_to_sinks() {
    let edges = [
        ("S", "A"),
        ("S", "B"),
        ("A", "C"),
        ("A", "D"),
        ("B", "D"),
        ("B", "E"),
        ("C", "F"),
        ("D", "F"),
        ("D", "G"),
        ("E", "G"),
        ("S", "G"),
    ];
    let g = graph("S", &edges);

    let mut reference = Vec::new();
    simple_paths_to_sinks(&g, "S", &mut Vec::new(), &mut reference);

    let trails: BTreeSet<NodeSequence> = enumerate_trails(&g, "S").unwrap().into_iter().collect();
    let reference: BTreeSet<NodeSequence> = reference.into_iter().collect();
    assert_eq!(trails, reference);
    assert!(find_cycles(&g).values().all(Vec::is_empty));
}

#[test]
fn two_cycle_expands_to_nine_elements() {
    let g = graph("A", &[("A", "B"), ("B", "A")]);
    let scenarios = enumerate_scenarios(&g, 1).unwrap();
    assert_eq!(scenarios.len(), 1);
    assert_eq!(scenarios[0].nodes, seq("A-B-A-B-A-B-A-B-A"));
    assert_eq!(scenarios[0].name, "A-B-A-B-A-B-A-B-A");
}

#[test]
fn zero_repetitions_keep_base_trails() {
    let g = graph("A", &[("A", "B"), ("B", "A")]);
    let scenarios = enumerate_scenarios(&g, 0).unwrap();
    assert_eq!(scenarios.len(), 1);
    assert_eq!(scenarios[0].nodes, seq("A-B-A"));
}

#[test]
fn enumeration_is_deterministic() {
    let edges = [("A", "B"), ("B", "C"), ("C", "A"), ("B", "D"), ("D", "D"), ("C", "E")];
    let first = analyze(&graph("A", &edges), 1).unwrap();
    let second = analyze(&graph("A", &edges), 1).unwrap();

    assert_eq!(first.trails, second.trails);
    assert_eq!(first.cycles, second.cycles);
    assert_eq!(first.scenarios, second.scenarios);

    let names: BTreeSet<&str> = first.scenarios.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names.len(), first.scenarios.len());
    for (i, scenario) in first.scenarios.iter().enumerate() {
        assert_eq!(scenario.index, i);
    }
}

#[test]
fn plan_summary_counts() {
    let g = graph("A", &[("A", "B"), ("B", "A"), ("B", "C")]);
    let plan = analyze(&g, 1).unwrap();
    let summary = plan.summary();

    assert_eq!(summary.trail_count, plan.trails.len());
    assert_eq!(summary.scenario_count, plan.scenarios.len());
    assert!(plan.cycles.contains_key("A"));
    assert!(plan.cycles.contains_key("B"));
    assert!(!plan.cycles.contains_key("C"));
    assert_eq!(
        summary.longest_scenario,
        plan.scenarios.iter().map(|s| s.nodes.len()).max().unwrap()
    );
}
