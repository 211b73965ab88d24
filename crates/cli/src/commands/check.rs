use std::path::Path;
use std::process;

use trellis_eval::plan_suite;

use crate::commands::load_graph;
use crate::{report_error, OutputFormat};

/// Compile every scenario; any configuration error exits 1.
pub(crate) fn cmd_check(path: &Path, repeat: usize, output: OutputFormat, quiet: bool) {
    let (doc, graph) = load_graph(path, output, quiet);

    let suite = match plan_suite(&graph, repeat) {
        Ok(s) => s,
        Err(e) => {
            report_error(&format!("configuration error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    let steps: usize = suite.iter().map(|s| s.steps.len()).sum();

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "ok": true,
                "id": doc.id,
                "repeat": repeat,
                "scenarios": suite.len(),
                "steps": steps,
            });
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!(
                "ok: '{}' compiles to {} scenario(s), {} step(s) (repeat {})",
                doc.id,
                suite.len(),
                steps,
                repeat
            );
        }
    }
}
