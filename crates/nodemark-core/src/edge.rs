//! Edge types for the node graph.

use serde::{Deserialize, Serialize};

/// Data dependency between two nodes: the source node's value is passed as
/// argument `arg_index` of the target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    /// Position of the value in the target node's argument list.
    pub arg_index: u16,
}

impl FlowEdge {
    /// Edge feeding argument `arg_index` of the target node.
    pub fn arg(arg_index: u16) -> Self {
        FlowEdge { arg_index }
    }
}
