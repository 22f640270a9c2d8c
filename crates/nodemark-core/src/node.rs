//! Graph nodes and their metadata.
//!
//! [`NodeMeta`] holds per-node bookkeeping that passes attach to a node
//! without changing what it computes. Fields are typed rather than kept in a
//! string-keyed map, but still distinguish "absent" from "present".

use serde::{Deserialize, Serialize};

use crate::id::DebugHandle;
use crate::ops::Op;

/// Per-node metadata written by passes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeMeta {
    /// Debug handle for this node. `None` if no pass has assigned one; an
    /// explicit JSON `null` also deserializes to `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_handle: Option<DebugHandle>,
}

impl NodeMeta {
    /// Returns `true` if the handle is absent or holds the "unset" sentinel.
    ///
    /// The two conditions are checked separately: an absent handle and an
    /// explicit zero both mean the node still needs one.
    pub fn needs_debug_handle(&self) -> bool {
        match self.debug_handle {
            None => true,
            Some(handle) if handle.is_sentinel() => true,
            Some(_) => false,
        }
    }
}

/// A single instruction in a [`Graph`](crate::graph::Graph).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Name, unique within the owning graph.
    pub name: String,
    /// The operation this node performs.
    pub op: Op,
    /// Metadata written by passes.
    #[serde(default)]
    pub meta: NodeMeta,
}

impl Node {
    /// Creates a node with empty metadata.
    pub fn new(name: impl Into<String>, op: Op) -> Self {
        Node {
            name: name.into(),
            op,
            meta: NodeMeta::default(),
        }
    }

    /// Returns `true` if this node is a control-flow operation.
    pub fn is_control_flow(&self) -> bool {
        self.op.is_control_flow()
    }

    /// Returns the node's debug handle, if one is set.
    pub fn debug_handle(&self) -> Option<DebugHandle> {
        self.meta.debug_handle
    }
}
