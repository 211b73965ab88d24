/// Authoring defects in a trellis graph.
///
/// These are always fatal: they are raised while building the graph or while
/// compiling a scenario, and are never resolved by picking a default.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphConfigError {
    /// No node qualifies as the start node.
    #[error("graph has no start node: exactly one node must have no predecessors or be designated as start")]
    NoStartNode,

    /// Several nodes qualify as the start node.
    #[error("only one start node is allowed, found: {}", .nodes.join(", "))]
    MultipleStartNodes { nodes: Vec<String> },

    /// The designated start node is not declared.
    #[error("start node '{name}' is not declared")]
    UnknownStartNode { name: String },

    /// Two nodes share a name.
    #[error("node '{name}' is declared more than once")]
    DuplicateNode { name: String },

    /// A node lists a predecessor that is not declared.
    #[error("node '{node}' has unknown predecessor '{predecessor}'")]
    UnknownPredecessor { node: String, predecessor: String },

    /// A predecessor guard names a node that is not a predecessor of its node.
    #[error("guard on '{node}' references '{name}', which is not one of its predecessors")]
    GuardNotPredecessor { node: String, name: String },

    /// A condition references a node that is not declared.
    #[error("condition on '{node}' references unknown node '{name}'")]
    UnknownConditionNode { node: String, name: String },

    /// Two checks on one node share a name.
    #[error("check '{check}' is declared more than once on node '{node}'")]
    DuplicateCheck { node: String, check: String },

    /// Two input variants on one node share a label.
    #[error("input '{label}' is declared more than once on node '{node}'")]
    DuplicateInputLabel { node: String, label: String },

    /// A node name was requested that the graph does not contain.
    #[error("unknown node '{name}'")]
    UnknownNode { name: String },

    /// More than one input variant accepts the same history.
    #[error(
        "ambiguous input for node '{node}' at position {position} of scenario '{scenario}': \
         variants {} all accept history [{}]",
        .candidates.join(", "),
        .history.join(", ")
    )]
    AmbiguousAction {
        scenario: String,
        position: usize,
        node: String,
        candidates: Vec<String>,
        history: Vec<String>,
    },
}
