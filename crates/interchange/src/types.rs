//! Typed structs for the graph interchange document.

use serde::{Deserialize, Serialize};
use trellis_core::{Condition, Guard};

/// Top-level document describing one graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub id: String,
    /// Document format version, e.g. `"1.0"`.
    pub trellis: String,
    /// Designated start node. When absent, the unique node without
    /// predecessors is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    pub nodes: Vec<NodeDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDecl {
    pub name: String,
    #[serde(default)]
    pub predecessors: Vec<String>,
    #[serde(default)]
    pub inputs: Vec<InputDecl>,
    #[serde(default)]
    pub checks: Vec<CheckDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<GuardDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<GuardDecl>,
}

/// `{"after": [...]}` or `{"when": <condition>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardDecl {
    After(Vec<String>),
    When(Condition),
}

impl From<&GuardDecl> for Guard {
    fn from(decl: &GuardDecl) -> Self {
        match decl {
            GuardDecl::After(names) => Guard::after(names.iter().cloned()),
            GuardDecl::When(condition) => Guard::when(condition.clone()),
        }
    }
}
