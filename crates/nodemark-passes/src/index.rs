//! Reverse lookup from debug handle to node.
//!
//! Runtime errors, profiler samples and delegate logs only carry a debug
//! handle. [`DebugHandleIndex`] resolves such a handle back to the module
//! path and node it was attached to.

use std::collections::BTreeMap;

use nodemark_core::graph::GraphModule;
use nodemark_core::id::DebugHandle;

use crate::source::visit_module_paths;
use crate::verify::NodeLocation;

/// Map from debug handle to the node carrying it.
#[derive(Debug, Clone, Default)]
pub struct DebugHandleIndex {
    entries: BTreeMap<DebugHandle, NodeLocation>,
}

impl DebugHandleIndex {
    /// Indexes every set handle reachable from `root`.
    ///
    /// Unset and sentinel handles are skipped. If a handle occurs more than
    /// once, the first node in breadth-first order wins; run
    /// [`verify_debug_handles`](crate::verify::verify_debug_handles) to detect
    /// that case.
    pub fn build(root: &GraphModule) -> Self {
        let mut entries = BTreeMap::new();
        visit_module_paths(root, |path, module| {
            for (id, node) in module.graph().nodes() {
                if node.meta.needs_debug_handle() {
                    continue;
                }
                if let Some(handle) = node.meta.debug_handle {
                    entries.entry(handle).or_insert_with(|| NodeLocation {
                        path: path.to_vec(),
                        node: id,
                        name: node.name.clone(),
                    });
                }
            }
        });
        DebugHandleIndex { entries }
    }

    pub fn lookup(&self, handle: DebugHandle) -> Option<&NodeLocation> {
        self.entries.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending handle order.
    pub fn iter(&self) -> impl Iterator<Item = (DebugHandle, &NodeLocation)> {
        self.entries.iter().map(|(handle, location)| (*handle, location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug_handle::assign_all;
    use nodemark_core::ops::Op;

    #[test]
    fn resolves_handles_inside_nested_bodies() {
        let mut body = GraphModule::new();
        body.add_node("x", Op::Placeholder).unwrap();
        body.add_node(
            "sin",
            Op::Call {
                target: "aten.sin.default".into(),
            },
        )
        .unwrap();

        let mut root = GraphModule::new();
        root.add_node("xs", Op::Placeholder).unwrap();
        root.add_submodule("body_0", body).unwrap();
        root.add_node("map", Op::Map { body: "body_0".into() }).unwrap();
        root.add_node("out", Op::Output).unwrap();

        assign_all(&mut root);
        let index = DebugHandleIndex::build(&root);

        assert_eq!(index.len(), 5);
        let sin = index.lookup(DebugHandle(5)).unwrap();
        assert_eq!(sin.path, ["body_0"]);
        assert_eq!(sin.name, "sin");
        assert_eq!(index.lookup(DebugHandle(3)).unwrap().name, "out");
        assert!(index.lookup(DebugHandle(6)).is_none());
    }

    #[test]
    fn unset_handles_are_not_indexed() {
        let mut root = GraphModule::new();
        let a = root.add_node("a", Op::Placeholder).unwrap();
        root.add_node("b", Op::Output).unwrap();
        root.graph_mut().node_mut(a).unwrap().meta.debug_handle = Some(DebugHandle(0));

        let index = DebugHandleIndex::build(&root);
        assert!(index.is_empty());
        assert!(index.lookup(DebugHandle(0)).is_none());
    }

    #[test]
    fn iter_is_sorted_by_handle() {
        let mut root = GraphModule::new();
        let a = root.add_node("a", Op::Placeholder).unwrap();
        let b = root.add_node("b", Op::Output).unwrap();
        root.graph_mut().node_mut(a).unwrap().meta.debug_handle = Some(DebugHandle(9));
        root.graph_mut().node_mut(b).unwrap().meta.debug_handle = Some(DebugHandle(2));

        let handles: Vec<u64> = DebugHandleIndex::build(&root).iter().map(|(h, _)| h.0).collect();
        assert_eq!(handles, [2, 9]);
    }
}
