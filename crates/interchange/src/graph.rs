//! Building a [`Graph`] from a [`GraphDocument`].

use std::sync::Arc;

use trellis_core::{Callable, CallResult, Graph, GraphConfigError, Guard, Node};

use crate::types::GraphDocument;

fn noop() -> CallResult {
    Ok(())
}

/// Build a graph whose inputs and checks do nothing.
///
/// The result has the document's full structure, so it can be enumerated,
/// compiled and checked for ambiguous inputs.
pub fn to_graph(doc: &GraphDocument) -> Result<Graph, GraphConfigError> {
    let action: Callable = Arc::new(noop);
    let mut builder = Graph::builder();
    if let Some(start) = &doc.start {
        builder = builder.start(start.clone());
    }

    for decl in &doc.nodes {
        let mut node = Node::new(decl.name.clone()).after(decl.predecessors.iter().cloned());
        for (k, input) in decl.inputs.iter().enumerate() {
            let label = input
                .label
                .clone()
                .unwrap_or_else(|| format!("input#{}", k));
            node = node.input_variant(label, input.guard.as_ref().map(Guard::from), action.clone());
        }
        for check in &decl.checks {
            node = node.check_guarded(
                check.name.clone(),
                check.guard.as_ref().map(Guard::from),
                action.clone(),
            );
        }
        builder = builder.node(node);
    }

    builder.build()
}
