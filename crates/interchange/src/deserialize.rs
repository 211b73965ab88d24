//! Deserialization of graph interchange documents.
//!
//! The main entry point is [`parse_document`], which takes a
//! `&serde_json::Value` and produces a [`GraphDocument`]. Top-level and node
//! fields are read one by one so errors can name the offending node; guards
//! and conditions go through their serde representation.

use serde::de::DeserializeOwned;
use tracing::debug;
use trellis_core::TRELLIS_VERSION;

use crate::types::*;

/// Errors while reading an interchange document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterchangeError {
    /// The document is missing a required top-level field.
    #[error("document missing required field: '{field}'")]
    MissingField { field: String },
    /// The document declares a format version this release cannot read.
    #[error("unsupported trellis version '{found}' (expected '{expected}')")]
    UnsupportedVersion { found: String, expected: String },
    /// The document structure is invalid.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

/// Deserialize an interchange JSON document into typed structs.
pub fn parse_document(doc: &serde_json::Value) -> Result<GraphDocument, InterchangeError> {
    if !doc.is_object() {
        return Err(InterchangeError::InvalidDocument(
            "top level must be an object".to_string(),
        ));
    }

    let id = top_level_str(doc, "id")?;
    let trellis = top_level_str(doc, "trellis")?;
    if trellis != TRELLIS_VERSION {
        return Err(InterchangeError::UnsupportedVersion {
            found: trellis,
            expected: TRELLIS_VERSION.to_string(),
        });
    }

    let start = match doc.get("start") {
        None | Some(serde_json::Value::Null) => None,
        Some(v) => Some(
            v.as_str()
                .ok_or_else(|| {
                    InterchangeError::InvalidDocument("'start' must be a string".to_string())
                })?
                .to_string(),
        ),
    };

    let nodes_arr = doc
        .get("nodes")
        .and_then(|n| n.as_array())
        .ok_or_else(|| InterchangeError::MissingField {
            field: "nodes".to_string(),
        })?;

    let nodes = nodes_arr
        .iter()
        .enumerate()
        .map(|(i, obj)| parse_node(i, obj))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(id = %id, nodes = nodes.len(), "parsed graph document");
    Ok(GraphDocument {
        id,
        trellis,
        start,
        nodes,
    })
}

// ── Parsing helpers ─────────────────────────────────────────────────

fn top_level_str(doc: &serde_json::Value, field: &str) -> Result<String, InterchangeError> {
    doc.get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| InterchangeError::MissingField {
            field: field.to_string(),
        })
}

fn node_error(node: &str, message: impl std::fmt::Display) -> InterchangeError {
    InterchangeError::InvalidDocument(format!("node '{}': {}", node, message))
}

fn string_list(
    obj: &serde_json::Value,
    field: &str,
    node: &str,
) -> Result<Vec<String>, InterchangeError> {
    match obj.get(field) {
        None => Ok(Vec::new()),
        Some(v) => {
            let arr = v
                .as_array()
                .ok_or_else(|| node_error(node, format!("'{}' must be an array", field)))?;
            arr.iter()
                .map(|item| {
                    item.as_str().map(|s| s.to_string()).ok_or_else(|| {
                        node_error(node, format!("'{}' entries must be strings", field))
                    })
                })
                .collect()
        }
    }
}

fn object_list<'a>(
    obj: &'a serde_json::Value,
    field: &str,
    node: &str,
) -> Result<&'a [serde_json::Value], InterchangeError> {
    match obj.get(field) {
        None => Ok(&[]),
        Some(v) => v
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| node_error(node, format!("'{}' must be an array", field))),
    }
}

fn optional_typed<T: DeserializeOwned>(
    obj: &serde_json::Value,
    field: &str,
    node: &str,
) -> Result<Option<T>, InterchangeError> {
    match obj.get(field) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| node_error(node, format!("bad '{}': {}", field, e))),
    }
}

fn parse_node(index: usize, obj: &serde_json::Value) -> Result<NodeDecl, InterchangeError> {
    let name = obj
        .get("name")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            InterchangeError::InvalidDocument(format!("nodes[{}]: missing 'name' field", index))
        })?
        .to_string();

    let predecessors = string_list(obj, "predecessors", &name)?;

    let inputs = object_list(obj, "inputs", &name)?
        .iter()
        .map(|input| -> Result<InputDecl, InterchangeError> {
            let label = match input.get("label") {
                None | Some(serde_json::Value::Null) => None,
                Some(v) => Some(
                    v.as_str()
                        .ok_or_else(|| node_error(&name, "input 'label' must be a string"))?
                        .to_string(),
                ),
            };
            let guard = optional_typed(input, "guard", &name)?;
            Ok(InputDecl { label, guard })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let checks = object_list(obj, "checks", &name)?
        .iter()
        .map(|check| -> Result<CheckDecl, InterchangeError> {
            let check_name = check
                .get("name")
                .and_then(|v| v.as_str())
                .ok_or_else(|| node_error(&name, "check missing 'name' field"))?
                .to_string();
            let guard = optional_typed(check, "guard", &name)?;
            Ok(CheckDecl {
                name: check_name,
                guard,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NodeDecl {
        name,
        predecessors,
        inputs,
        checks,
    })
}
