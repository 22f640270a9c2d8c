//! Core error types for nodemark-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of building and editing a module tree.

use crate::id::NodeId;
use thiserror::Error;

/// Core errors produced by the nodemark-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A node index was not found in the graph.
    #[error("node not found: NodeId({id})", id = id.0)]
    NodeNotFound { id: NodeId },

    /// A control-flow op names a sub-module that is not registered.
    #[error("submodule not found: '{name}'")]
    SubmoduleNotFound { name: String },

    /// Registering a sub-module under a name that is already taken.
    #[error("duplicate submodule name: '{name}'")]
    DuplicateSubmodule { name: String },

    /// Adding a node whose name is already used in the same graph.
    #[error("duplicate node name: '{name}'")]
    DuplicateNodeName { name: String },
}
