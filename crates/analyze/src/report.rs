//! Serializable enumeration report.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::scenario::Scenario;
use crate::trails::NodeSequence;

/// Everything enumeration derived from a graph for one repetition count.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioPlan {
    pub start: String,
    pub repeat: usize,
    pub trails: Vec<NodeSequence>,
    /// Simple cycles per node; nodes on no cycle are omitted.
    pub cycles: BTreeMap<String, Vec<NodeSequence>>,
    pub scenarios: Vec<Scenario>,
}

/// Condensed counts for text output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub trail_count: usize,
    pub cycle_count: usize,
    pub scenario_count: usize,
    pub longest_scenario: usize,
}

impl ScenarioPlan {
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            trail_count: self.trails.len(),
            cycle_count: self.cycles.values().map(Vec::len).sum(),
            scenario_count: self.scenarios.len(),
            longest_scenario: self
                .scenarios
                .iter()
                .map(|s| s.nodes.len())
                .max()
                .unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::analyze;
    use crate::test_graph;

    #[test]
    fn summary_and_serialized_shape() {
        let graph = test_graph("A", &[("A", "B"), ("B", "A"), ("B", "C")]);
        let plan = analyze(&graph, 0).unwrap();

        let summary = plan.summary();
        assert_eq!(summary.trail_count, 2);
        assert_eq!(summary.cycle_count, 2);
        assert_eq!(summary.scenario_count, 2);
        assert_eq!(summary.longest_scenario, 3);

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["start"], "A");
        assert_eq!(json["cycles"]["A"], serde_json::json!([["A", "B", "A"]]));
        assert!(json["cycles"].get("C").is_none());
        assert_eq!(json["scenarios"][0]["name"], "A-B-A");
    }
}
