use std::path::Path;
use std::process;

use trellis_analyze::analyze;
use trellis_eval::{compile_suite, ScenarioDescription};

use crate::commands::load_graph;
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_plan(path: &Path, repeat: usize, output: OutputFormat, quiet: bool) {
    let (doc, graph) = load_graph(path, output, quiet);

    let plan = match analyze(&graph, repeat) {
        Ok(p) => p,
        Err(e) => {
            report_error(&format!("configuration error: {}", e), output, quiet);
            process::exit(1);
        }
    };
    let suite = match compile_suite(&graph, repeat, plan.scenarios.clone()) {
        Ok(s) => s,
        Err(e) => {
            report_error(&format!("configuration error: {}", e), output, quiet);
            process::exit(1);
        }
    };
    let scenarios = suite.describe();
    let summary = plan.summary();

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "id": doc.id,
                "start": plan.start,
                "repeat": repeat,
                "summary": summary,
                "trails": plan.trails,
                "cycles": plan.cycles,
                "scenarios": scenarios,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&json)
                    .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e))
            );
        }
        OutputFormat::Text => {
            println!("Scenario plan for '{}'", doc.id);
            println!("  start: {}, repeat: {}", plan.start, repeat);
            println!(
                "  {} trail(s), {} cycle(s), {} scenario(s), longest {} step(s)",
                summary.trail_count,
                summary.cycle_count,
                summary.scenario_count,
                summary.longest_scenario
            );
            for scenario in &scenarios {
                println!();
                print_scenario(scenario);
            }
        }
    }
}

fn print_scenario(scenario: &ScenarioDescription) {
    println!("[{}] {}", scenario.index, scenario.name);
    let width = scenario
        .steps
        .iter()
        .map(|s| s.label.len())
        .max()
        .unwrap_or(0);
    for step in &scenario.steps {
        let checks = if step.checks.is_empty() {
            "-".to_string()
        } else {
            step.checks.join(", ")
        };
        println!(
            "  {:<width$}  input: {}  checks: {}",
            step.label,
            step.input.as_deref().unwrap_or("-"),
            checks,
            width = width
        );
    }
}
