//! trellis-core: state graph model for scenario generation.
//!
//! A trellis graph is a set of named states (nodes). Each node declares its
//! predecessors, zero or more guarded input actions, and zero or more named
//! checks. The graph is assembled once through [`GraphBuilder`], validated,
//! and then treated as read-only by enumeration and evaluation.
//!
//! # Public API
//!
//! - [`GraphBuilder`] / [`Graph`] -- build and query a validated graph
//! - [`Node`] -- a state declaration with its inputs and checks
//! - [`Guard`] -- predecessor or history condition gating an input or check
//! - [`Condition`] -- boolean expression over the execution history
//! - [`GraphConfigError`] -- authoring defects detected at build or compile time

/// Interchange document version understood by this release.
pub const TRELLIS_VERSION: &str = "1.0";

pub mod condition;
pub mod error;
pub mod graph;

pub use condition::Condition;
pub use error::GraphConfigError;
pub use graph::{
    Callable, CallError, CallResult, Check, Graph, GraphBuilder, Guard, InputVariant, Node,
    ScenarioHooks,
};
