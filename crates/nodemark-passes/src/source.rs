//! The sub-graph source capability and breadth-first traversal over it.
//!
//! Passes never own or build graphs. They only need two things from the
//! host: access to each node's metadata in native order, and the list of
//! immediate control-flow sub-graphs. [`SubgraphSource`] captures exactly
//! that, so any host graph type can be numbered.
//!
//! All traversals here are breadth-first by graph: a graph is fully visited
//! before any of its sub-graphs, and sub-graphs are queued in enumeration
//! order behind everything already waiting.

use std::collections::VecDeque;

use nodemark_core::graph::GraphModule;
use nodemark_core::node::NodeMeta;

/// Read/enumerate capability over a host graph and its nested sub-graphs.
///
/// Nesting must be finite and acyclic. Owned module trees such as
/// [`GraphModule`] satisfy this by construction.
pub trait SubgraphSource {
    /// Calls `f` with each node's metadata, in native node order.
    fn for_each_meta(&self, f: &mut dyn FnMut(&NodeMeta));

    /// Calls `f` with each node's metadata mutably, in native node order.
    fn for_each_meta_mut(&mut self, f: &mut dyn FnMut(&mut NodeMeta));

    /// Immediate control-flow sub-graphs, in enumeration order.
    fn subgraphs(&self) -> Vec<&Self>;

    /// Mutable twin of [`subgraphs`](Self::subgraphs), same order.
    fn subgraphs_mut(&mut self) -> Vec<&mut Self>;
}

impl SubgraphSource for GraphModule {
    fn for_each_meta(&self, f: &mut dyn FnMut(&NodeMeta)) {
        for (_, node) in self.graph().nodes() {
            f(&node.meta);
        }
    }

    fn for_each_meta_mut(&mut self, f: &mut dyn FnMut(&mut NodeMeta)) {
        self.graph_mut().for_each_node_mut(|_, node| f(&mut node.meta));
    }

    fn subgraphs(&self) -> Vec<&Self> {
        self.control_flow_submodules()
            .into_iter()
            .map(|(_, module, _)| module)
            .collect()
    }

    fn subgraphs_mut(&mut self) -> Vec<&mut Self> {
        self.control_flow_submodules_mut()
            .into_iter()
            .map(|(_, module, _)| module)
            .collect()
    }
}

/// Visits `root` and every nested sub-graph in breadth-first graph order.
pub fn visit_breadth_first<G: SubgraphSource>(root: &G, mut f: impl FnMut(&G)) {
    let mut queue = VecDeque::from([root]);
    while let Some(graph) = queue.pop_front() {
        f(graph);
        queue.extend(graph.subgraphs());
    }
}

/// Mutable twin of [`visit_breadth_first`], same order.
///
/// `f` sees each graph before its sub-graphs are enumerated, so it may not
/// change which sub-graphs a graph has.
pub fn visit_breadth_first_mut<G: SubgraphSource>(root: &mut G, mut f: impl FnMut(&mut G)) {
    let mut queue: VecDeque<&mut G> = VecDeque::new();
    queue.push_back(root);
    while let Some(graph) = queue.pop_front() {
        f(&mut *graph);
        queue.extend(graph.subgraphs_mut());
    }
}

/// Breadth-first walk over a module tree that also reports each module's
/// path, i.e. the sub-module names leading to it from `root`.
pub fn visit_module_paths(root: &GraphModule, mut f: impl FnMut(&[String], &GraphModule)) {
    let mut queue: VecDeque<(Vec<String>, &GraphModule)> = VecDeque::new();
    queue.push_back((Vec::new(), root));
    while let Some((path, module)) = queue.pop_front() {
        f(&path, module);
        for (name, sub, _) in module.control_flow_submodules() {
            let mut child = path.clone();
            child.push(name.to_string());
            queue.push_back((child, sub));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodemark_core::ops::Op;

    fn named(names: &[&str]) -> GraphModule {
        let mut module = GraphModule::new();
        for name in names {
            module.add_node(*name, Op::Placeholder).unwrap();
        }
        module
    }

    /// root -> [a, b], a -> [c]
    fn tree() -> GraphModule {
        let mut a = named(&["a0"]);
        a.add_submodule("c", named(&["c0"])).unwrap();
        a.add_node("map_c", Op::Map { body: "c".into() }).unwrap();

        let mut root = named(&["r0"]);
        root.add_submodule("a", a).unwrap();
        root.add_submodule("b", named(&["b0"])).unwrap();
        root.add_node(
            "cond",
            Op::Cond {
                true_branch: "a".into(),
                false_branch: "b".into(),
            },
        )
        .unwrap();
        root
    }

    fn first_node_name(module: &GraphModule) -> String {
        module.graph().nodes().next().unwrap().1.name.clone()
    }

    #[test]
    fn breadth_first_visits_siblings_before_grandchildren() {
        let root = tree();
        let mut order = Vec::new();
        visit_breadth_first(&root, |module| order.push(first_node_name(module)));
        assert_eq!(order, ["r0", "a0", "b0", "c0"]);
    }

    #[test]
    fn mutable_walk_uses_the_same_order() {
        let mut root = tree();
        let mut order = Vec::new();
        visit_breadth_first_mut(&mut root, |module| order.push(first_node_name(module)));
        assert_eq!(order, ["r0", "a0", "b0", "c0"]);
    }

    #[test]
    fn module_paths_name_each_level() {
        let root = tree();
        let mut paths = Vec::new();
        visit_module_paths(&root, |path, _| paths.push(path.join(".")));
        assert_eq!(paths, ["", "a", "b", "a.c"]);
    }

    #[test]
    fn meta_iteration_is_native_order() {
        let mut root = named(&["x", "y", "z"]);
        let mut count = 0;
        root.for_each_meta(&mut |_| count += 1);
        assert_eq!(count, 3);

        let mut n = 0;
        root.for_each_meta_mut(&mut |meta| {
            n += 1;
            meta.debug_handle = Some(nodemark_core::DebugHandle(n * 10));
        });
        let handles: Vec<u64> = root
            .graph()
            .nodes()
            .map(|(_, node)| node.debug_handle().unwrap().0)
            .collect();
        assert_eq!(handles, [10, 20, 30]);
    }
}
