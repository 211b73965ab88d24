pub(crate) mod check;
pub(crate) mod plan;
pub(crate) mod validate;

use std::path::Path;
use std::process;

use trellis_core::Graph;
use trellis_interchange::{parse_document, to_graph, GraphDocument};

use crate::{report_error, OutputFormat};

/// Read a file as JSON, exiting with a message on failure.
pub(crate) fn read_json(path: &Path, output: OutputFormat, quiet: bool) -> serde_json::Value {
    let content = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Load a graph document and build its graph with no-op callables.
pub(crate) fn load_graph(path: &Path, output: OutputFormat, quiet: bool) -> (GraphDocument, Graph) {
    let value = read_json(path, output, quiet);

    let doc = match parse_document(&value) {
        Ok(d) => d,
        Err(e) => {
            let msg = format!("error loading '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    match to_graph(&doc) {
        Ok(graph) => (doc, graph),
        Err(e) => {
            let msg = format!("configuration error: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}
