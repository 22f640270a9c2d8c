//! Debug handle verification.
//!
//! [`verify_debug_handles`] walks the module tree in the same breadth-first
//! order the numbering passes use and reports ALL problems at once, so a
//! caller sees every unlabelled node and every collision in one go.

use std::collections::HashMap;
use std::fmt;

use nodemark_core::graph::GraphModule;
use nodemark_core::id::{DebugHandle, NodeId};
use serde::{Deserialize, Serialize};

use crate::source::visit_module_paths;

/// Where a node lives in a module tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLocation {
    /// Sub-module names leading from the root to the owning module. Empty for
    /// nodes of the root module itself.
    pub path: Vec<String>,
    /// Node id within the owning module's graph.
    pub node: NodeId,
    /// Node name.
    pub name: String,
}

impl fmt::Display for NodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{} (node {})", self.name, self.node)
        } else {
            write!(f, "{}.{} (node {})", self.path.join("."), self.name, self.node)
        }
    }
}

/// A problem with the debug handles of a module tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum HandleError {
    /// The node has no handle, or holds the "unset" sentinel.
    #[error("missing debug handle at {location}")]
    Missing { location: NodeLocation },

    /// The handle was already used by an earlier node in traversal order.
    #[error("duplicate debug handle {handle} at {location}, first used at {first}")]
    Duplicate {
        handle: DebugHandle,
        location: NodeLocation,
        first: NodeLocation,
    },
}

/// Checks that every node reachable from `root` carries a distinct, set
/// debug handle.
pub fn verify_debug_handles(root: &GraphModule) -> Result<(), Vec<HandleError>> {
    let mut errors = Vec::new();
    let mut first_seen: HashMap<DebugHandle, NodeLocation> = HashMap::new();

    visit_module_paths(root, |path, module| {
        for (id, node) in module.graph().nodes() {
            let location = NodeLocation {
                path: path.to_vec(),
                node: id,
                name: node.name.clone(),
            };
            if node.meta.needs_debug_handle() {
                errors.push(HandleError::Missing { location });
                continue;
            }
            let Some(handle) = node.meta.debug_handle else {
                continue;
            };
            match first_seen.get(&handle) {
                Some(first) => errors.push(HandleError::Duplicate {
                    handle,
                    location,
                    first: first.clone(),
                }),
                None => {
                    first_seen.insert(handle, location);
                }
            }
        }
    });

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodemark_core::ops::Op;

    fn set_handles(module: &mut GraphModule, handles: &[Option<u64>]) {
        let mut it = handles.iter();
        module.graph_mut().for_each_node_mut(|_, node| {
            node.meta.debug_handle = it.next().copied().flatten().map(DebugHandle);
        });
    }

    fn module_with(names: &[&str], handles: &[Option<u64>]) -> GraphModule {
        let mut module = GraphModule::new();
        for name in names {
            module.add_node(*name, Op::Placeholder).unwrap();
        }
        set_handles(&mut module, handles);
        module
    }

    #[test]
    fn fully_labelled_tree_verifies() {
        let mut root = module_with(&["a", "b"], &[Some(1), Some(2)]);
        root.add_submodule("body", module_with(&["x"], &[Some(3)])).unwrap();
        root.add_node("map", Op::Map { body: "body".into() }).unwrap();
        set_handles(&mut root, &[Some(1), Some(2), Some(4)]);

        assert_eq!(verify_debug_handles(&root), Ok(()));
    }

    #[test]
    fn reports_missing_and_sentinel_handles() {
        let root = module_with(&["a", "b", "c"], &[Some(1), None, Some(0)]);
        let errors = verify_debug_handles(&root).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, HandleError::Missing { .. })));
    }

    #[test]
    fn reports_duplicates_across_submodules() {
        let mut root = module_with(&["a"], &[Some(1)]);
        root.add_submodule("then", module_with(&["t"], &[Some(1)])).unwrap();
        root.add_submodule("else", module_with(&["e"], &[Some(3)])).unwrap();
        root.add_node(
            "cond",
            Op::Cond {
                true_branch: "then".into(),
                false_branch: "else".into(),
            },
        )
        .unwrap();
        set_handles(&mut root, &[Some(1), Some(2)]);

        let errors = verify_debug_handles(&root).unwrap_err();
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            HandleError::Duplicate {
                handle,
                location,
                first,
            } => {
                assert_eq!(*handle, DebugHandle(1));
                assert_eq!(location.path, ["then"]);
                assert_eq!(first.name, "a");
            }
            other => panic!("expected Duplicate, got {:?}", other),
        }
        assert_eq!(
            errors[0].to_string(),
            "duplicate debug handle 1 at then.t (node 0), first used at a (node 0)"
        );
    }
}
