//! Stable ID newtypes for graph entities.
//!
//! [`NodeId`] and [`DebugHandle`] are both plain integers underneath, but they
//! mean different things: a `NodeId` is a slot in one graph's storage, while a
//! `DebugHandle` is a label that stays attached to a node across passes and is
//! unique across a whole module tree.

use std::fmt;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Stable node identifier. Maps to a petgraph `NodeIndex<u32>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Per-node debug identifier used to correlate a node with runtime,
/// profiling, or error data produced by later stages.
///
/// Serializes as a bare integer. The value `0` is reserved as the "unset"
/// sentinel; real handles start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebugHandle(pub u64);

impl DebugHandle {
    /// The "unset" marker some producers write instead of leaving the handle
    /// out entirely.
    pub const SENTINEL: DebugHandle = DebugHandle(0);

    /// The first handle handed out by a fresh numbering.
    pub const FIRST: DebugHandle = DebugHandle(1);

    /// Returns `true` if this is the "unset" sentinel.
    pub fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }

    /// Returns the handle that follows this one, or `None` at `u64::MAX`.
    pub fn checked_next(self) -> Option<DebugHandle> {
        self.0.checked_add(1).map(DebugHandle)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DebugHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Bridge between NodeId and petgraph's NodeIndex<u32>.

impl From<NodeIndex<u32>> for NodeId {
    fn from(idx: NodeIndex<u32>) -> Self {
        NodeId(idx.index() as u32)
    }
}

impl From<NodeId> for NodeIndex<u32> {
    fn from(id: NodeId) -> Self {
        NodeIndex::new(id.0 as usize)
    }
}
