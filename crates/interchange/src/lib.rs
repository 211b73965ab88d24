//! trellis-interchange: JSON documents describing Trellis graphs.
//!
//! A document carries the structure of a graph (nodes, predecessors, input
//! labels, check names and their guards) but no executable code. It is what
//! the `trellis` CLI reads to plan scenarios and detect ambiguous inputs.
//!
//! [`parse_document`] turns a `serde_json::Value` into a [`GraphDocument`];
//! [`to_graph`] builds a [`trellis_core::Graph`] with no-op callables.

pub mod deserialize;
pub mod graph;
pub mod types;

pub use deserialize::{parse_document, InterchangeError};
pub use graph::to_graph;
pub use types::*;
