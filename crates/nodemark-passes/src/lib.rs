//! Graph passes for nodemark module trees.
//!
//! The main job of this crate is attaching debug handles: unique per-node
//! integers that let later stages point runtime errors, profiling data and
//! delegate logs back at a node of the original graph, including nodes
//! nested inside conditionals, loops and maps.
//!
//! # Modules
//!
//! - [`source`] -- The sub-graph capability passes need from a host graph,
//!   and breadth-first traversal over it
//! - [`debug_handle`] -- Numbering (`assign_all`) and repair (`fill_missing`)
//! - [`pass`] -- Pass trait and sequential pass manager
//! - [`verify`] -- Whole-tree handle checks
//! - [`index`] -- Handle to node reverse lookup
//! - [`error`] -- Error types

pub mod debug_handle;
pub mod error;
pub mod index;
pub mod pass;
pub mod source;
pub mod verify;

pub use debug_handle::{
    assign_all, fill_missing, generate_missing_debug_handles, max_debug_handle,
    DebugHandleGeneratorPass, FillReport, MissingDebugHandlePass,
};
pub use error::PassError;
pub use index::DebugHandleIndex;
pub use pass::{GraphPass, PassManager, PassResult};
pub use source::SubgraphSource;
pub use verify::{verify_debug_handles, HandleError, NodeLocation};

use serde::{Deserialize, Serialize};

/// Options controlling a [`PassManager`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassManagerConfig {
    /// Verify debug handles after every pass that reports a modification.
    #[serde(default)]
    pub verify_debug_handles: bool,
}
