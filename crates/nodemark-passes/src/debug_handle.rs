//! Debug handle generation.
//!
//! Two entry points, both walking graphs in breadth-first graph order (see
//! [`source`](crate::source)):
//!
//! - [`assign_all`]: numbers every node from 1, overwriting whatever was
//!   there. A graph's nodes get one contiguous block, and a parent's block
//!   always comes before any descendant's.
//! - [`fill_missing`]: leaves existing handles alone and numbers only the
//!   nodes without one, continuing after the current maximum.
//!
//! Handles are unique within one module tree and stable for the lifetime of
//! that tree. They are not persisted and not unique across separate runs.

use nodemark_core::graph::GraphModule;
use nodemark_core::id::DebugHandle;
use nodemark_core::program::ExportedProgram;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::PassError;
use crate::pass::{GraphPass, PassResult};
use crate::source::{visit_breadth_first, visit_breadth_first_mut, SubgraphSource};

/// Outcome of [`fill_missing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillReport {
    /// Largest handle present before filling; the sentinel if there was none.
    pub previous_max: DebugHandle,
    /// Number of nodes that received a new handle.
    pub assigned: u64,
    /// Nodes left unset because handles ran out at `u64::MAX`.
    #[serde(default)]
    pub unfilled: u64,
}

impl FillReport {
    /// Largest handle present after filling.
    pub fn max_handle(&self) -> DebugHandle {
        // Every assigned handle was produced by `checked_next`, so this sum
        // never exceeds `u64::MAX`.
        DebugHandle(self.previous_max.0.saturating_add(self.assigned))
    }

    /// Returns `true` if some node could not be given a handle.
    pub fn is_exhausted(&self) -> bool {
        self.unfilled > 0
    }
}

/// Numbers every node reachable from `root` with 1, 2, 3, ... in
/// breadth-first graph order. Returns how many handles were written.
pub fn assign_all<G: SubgraphSource>(root: &mut G) -> u64 {
    // Handles here are bounded by the node count.
    let mut assigned = 0u64;
    let mut graphs = 0usize;

    visit_breadth_first_mut(root, |graph| {
        let start = assigned;
        graph.for_each_meta_mut(&mut |meta| {
            assigned += 1;
            meta.debug_handle = Some(DebugHandle(assigned));
        });
        graphs += 1;
        debug!(graph = graphs, first = start + 1, count = assigned - start, "numbered graph");
    });

    info!(assigned, graphs, "assigned debug handles");
    assigned
}

/// Largest set handle reachable from `root`, or the sentinel if no node has
/// one.
pub fn max_debug_handle<G: SubgraphSource>(root: &G) -> DebugHandle {
    let mut max = DebugHandle::SENTINEL;
    visit_breadth_first(root, |graph| {
        graph.for_each_meta(&mut |meta| {
            if let Some(handle) = meta.debug_handle {
                max = max.max(handle);
            }
        });
    });
    max
}

/// Gives every node whose handle is absent or the sentinel a new handle
/// after the current maximum, in breadth-first graph order. Existing handles
/// are left untouched.
///
/// Existing handles are not bounded by the node count. If numbering reaches
/// `u64::MAX`, the remaining unset nodes stay unset and are counted in
/// [`FillReport::unfilled`]; no handle wraps around.
pub fn fill_missing<G: SubgraphSource>(root: &mut G) -> FillReport {
    let previous_max = max_debug_handle(root);
    let mut max = previous_max;
    let mut assigned = 0u64;
    let mut unfilled = 0u64;

    visit_breadth_first_mut(root, |graph| {
        graph.for_each_meta_mut(&mut |meta| {
            if !meta.needs_debug_handle() {
                return;
            }
            match max.checked_next() {
                Some(handle) => {
                    max = handle;
                    meta.debug_handle = Some(handle);
                    assigned += 1;
                }
                None => unfilled += 1,
            }
        });
    });

    if unfilled > 0 {
        warn!(previous_max = %previous_max, unfilled, "debug handles exhausted");
    }
    debug!(previous_max = %previous_max, assigned, "filled missing debug handles");
    FillReport {
        previous_max,
        assigned,
        unfilled,
    }
}

/// Fills missing debug handles across an exported program's module tree.
pub fn generate_missing_debug_handles(program: &mut ExportedProgram) -> FillReport {
    let report = fill_missing(program.graph_module_mut());
    info!(
        program = %program.name,
        assigned = report.assigned,
        max = %report.max_handle(),
        "generated missing debug handles"
    );
    report
}

/// Pass form of [`assign_all`]. Always reports the module as modified.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugHandleGeneratorPass;

impl GraphPass for DebugHandleGeneratorPass {
    fn name(&self) -> &'static str {
        "debug_handle_generator"
    }

    fn call(&self, module: &mut GraphModule) -> Result<PassResult, PassError> {
        assign_all(module);
        Ok(PassResult::modified())
    }
}

/// Pass form of [`fill_missing`]. Reports a modification only when at least
/// one handle was written, and fails with [`PassError::HandlesExhausted`] if
/// some node was left without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingDebugHandlePass;

impl GraphPass for MissingDebugHandlePass {
    fn name(&self) -> &'static str {
        "missing_debug_handle"
    }

    fn call(&self, module: &mut GraphModule) -> Result<PassResult, PassError> {
        let report = fill_missing(module);
        if report.is_exhausted() {
            return Err(PassError::HandlesExhausted {
                unfilled: report.unfilled,
            });
        }
        Ok(PassResult {
            modified: report.assigned > 0,
        })
    }
}
