//! Graph and GraphModule: the node graph and the module tree around it.
//!
//! A [`Graph`] is a flat list of nodes in a native order, connected by
//! data-flow edges. A [`GraphModule`] owns one graph plus named sub-modules.
//! Control-flow ops ([`Op::Cond`], [`Op::WhileLoop`], [`Op::Map`]) refer to
//! sub-modules by name, which is how conditionals and loops nest graphs
//! inside graphs.
//!
//! # Native order
//!
//! Nodes live in a `StableGraph`, whose indices stay valid across removals
//! but are recycled by later insertions. Index order is therefore not
//! insertion order, so `Graph` keeps an explicit order vector and every
//! iteration goes through it.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::Directed;
use serde::{Deserialize, Serialize};

use crate::edge::FlowEdge;
use crate::error::CoreError;
use crate::id::NodeId;
use crate::node::Node;
use crate::ops::Op;

/// A directed graph of nodes in native order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    nodes: StableGraph<Node, FlowEdge, Directed, u32>,
    /// Node ids in native (insertion) order.
    order: Vec<NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    /// Returns a read-only reference to the underlying petgraph storage.
    pub fn storage(&self) -> &StableGraph<Node, FlowEdge, Directed, u32> {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.node_weight(NodeIndex::from(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.node_weight_mut(NodeIndex::from(id))
    }

    /// Node ids in native order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.order
    }

    /// Iterates nodes in native order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.node(id).map(|node| (id, node)))
    }

    /// Visits every node mutably, in native order.
    pub fn for_each_node_mut(&mut self, mut f: impl FnMut(NodeId, &mut Node)) {
        for &id in &self.order {
            if let Some(node) = self.nodes.node_weight_mut(NodeIndex::from(id)) {
                f(id, node);
            }
        }
    }

    /// Looks up a node by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Appends a node at the end of the native order.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, CoreError> {
        if self.find(&node.name).is_some() {
            return Err(CoreError::DuplicateNodeName { name: node.name });
        }
        let id = NodeId::from(self.nodes.add_node(node));
        self.order.push(id);
        Ok(id)
    }

    /// Adds a data-flow edge feeding `from`'s value into argument `arg_index`
    /// of `to`.
    pub fn add_data_edge(&mut self, from: NodeId, to: NodeId, arg_index: u16) -> Result<(), CoreError> {
        for id in [from, to] {
            if self.node(id).is_none() {
                return Err(CoreError::NodeNotFound { id });
            }
        }
        self.nodes
            .add_edge(from.into(), to.into(), FlowEdge::arg(arg_index));
        Ok(())
    }

    /// Removes a node and all edges touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, CoreError> {
        let node = self
            .nodes
            .remove_node(NodeIndex::from(id))
            .ok_or(CoreError::NodeNotFound { id })?;
        self.order.retain(|&other| other != id);
        Ok(node)
    }
}

/// A graph plus the named sub-modules it owns.
///
/// Sub-modules are kept in registration order. Only those referenced by a
/// control-flow node count as control-flow sub-graphs; see
/// [`control_flow_submodules`](Self::control_flow_submodules).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphModule {
    graph: Graph,
    #[serde(default)]
    submodules: IndexMap<String, GraphModule>,
}

impl GraphModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing graph with no sub-modules.
    pub fn from_graph(graph: Graph) -> Self {
        GraphModule {
            graph,
            submodules: IndexMap::new(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable access to the graph. Nodes added here skip the sub-module
    /// reference check done by [`add_node`](Self::add_node).
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Adds a node to this module's graph.
    ///
    /// Control-flow ops must only name sub-modules that are already
    /// registered.
    pub fn add_node(&mut self, name: impl Into<String>, op: Op) -> Result<NodeId, CoreError> {
        if let Some(missing) = op
            .submodule_refs()
            .into_iter()
            .find(|sub| !self.submodules.contains_key(*sub))
        {
            return Err(CoreError::SubmoduleNotFound {
                name: missing.to_string(),
            });
        }
        self.graph.add_node(Node::new(name, op))
    }

    pub fn add_data_edge(&mut self, from: NodeId, to: NodeId, arg_index: u16) -> Result<(), CoreError> {
        self.graph.add_data_edge(from, to, arg_index)
    }

    /// Registers `module` under `name`.
    pub fn add_submodule(&mut self, name: impl Into<String>, module: GraphModule) -> Result<(), CoreError> {
        let name = name.into();
        if self.submodules.contains_key(&name) {
            return Err(CoreError::DuplicateSubmodule { name });
        }
        self.submodules.insert(name, module);
        Ok(())
    }

    pub fn submodule(&self, name: &str) -> Option<&GraphModule> {
        self.submodules.get(name)
    }

    pub fn submodule_mut(&mut self, name: &str) -> Option<&mut GraphModule> {
        self.submodules.get_mut(name)
    }

    /// All registered sub-modules in registration order, whether or not a
    /// control-flow node refers to them.
    pub fn submodules(&self) -> impl Iterator<Item = (&str, &GraphModule)> {
        self.submodules.iter().map(|(name, module)| (name.as_str(), module))
    }

    /// Immediate control-flow sub-graphs as `(name, module, node)` triples,
    /// where `node` is the control-flow node referring to the sub-module.
    ///
    /// Ordered by the referring node's native position, then by the op's
    /// declaration order. A sub-module referenced more than once appears
    /// once, at its first reference. Names that are not registered are
    /// skipped.
    pub fn control_flow_submodules(&self) -> Vec<(&str, &GraphModule, NodeId)> {
        self.control_flow_refs()
            .into_iter()
            .filter_map(|(name, node)| {
                self.submodules
                    .get_key_value(name)
                    .map(|(key, module)| (key.as_str(), module, node))
            })
            .collect()
    }

    /// Mutable twin of [`control_flow_submodules`](Self::control_flow_submodules),
    /// same order.
    pub fn control_flow_submodules_mut(&mut self) -> Vec<(&str, &mut GraphModule, NodeId)> {
        let refs: Vec<(String, NodeId)> = self
            .control_flow_refs()
            .into_iter()
            .map(|(name, node)| (name.to_string(), node))
            .collect();

        let mut by_name: HashMap<&str, &mut GraphModule> = self
            .submodules
            .iter_mut()
            .map(|(name, module)| (name.as_str(), module))
            .collect();

        refs.into_iter()
            .filter_map(|(name, node)| {
                by_name
                    .remove_entry(name.as_str())
                    .map(|(key, module)| (key, module, node))
            })
            .collect()
    }

    /// Number of nodes in this module and every control-flow sub-graph
    /// reachable from it.
    pub fn total_node_count(&self) -> usize {
        self.graph.node_count()
            + self
                .control_flow_submodules()
                .into_iter()
                .map(|(_, module, _)| module.total_node_count())
                .sum::<usize>()
    }

    /// First-reference-wins list of registered sub-module names referenced
    /// by control-flow nodes.
    fn control_flow_refs(&self) -> Vec<(&str, NodeId)> {
        let mut seen = HashSet::new();
        let mut refs = Vec::new();
        for (id, node) in self.graph.nodes() {
            for name in node.op.submodule_refs() {
                if self.submodules.contains_key(name) && seen.insert(name) {
                    refs.push((name, id));
                }
            }
        }
        refs
    }
}
