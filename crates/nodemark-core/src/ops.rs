//! Op vocabulary for graph nodes.
//!
//! The vocabulary is deliberately small: graph inputs, calls into an operator
//! library, attribute reads, the graph output, and three higher-order
//! control-flow ops. Control-flow ops do not embed their bodies; they name
//! sub-modules registered on the owning [`GraphModule`](crate::graph::GraphModule).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Operation performed by a graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    /// Graph input.
    Placeholder,
    /// Call into the operator library, e.g. `aten.add.Tensor`.
    Call { target: String },
    /// Read a parameter, buffer, or sub-module attribute by name.
    GetAttr { name: String },
    /// Two-way conditional. Runs exactly one of the named branch sub-modules.
    Cond {
        true_branch: String,
        false_branch: String,
    },
    /// Loop that evaluates `cond` before each run of `body`.
    WhileLoop { cond: String, body: String },
    /// Applies `body` to each slice of the mapped input.
    Map { body: String },
    /// Graph output.
    Output,
}

impl Op {
    /// Returns `true` for ops whose semantics are given by nested sub-modules.
    pub fn is_control_flow(&self) -> bool {
        matches!(self, Op::Cond { .. } | Op::WhileLoop { .. } | Op::Map { .. })
    }

    /// Sub-module names referenced by this op, in declaration order.
    ///
    /// Empty for everything except control-flow ops.
    pub fn submodule_refs(&self) -> SmallVec<[&str; 2]> {
        let mut refs = SmallVec::new();
        match self {
            Op::Cond {
                true_branch,
                false_branch,
            } => {
                refs.push(true_branch.as_str());
                refs.push(false_branch.as_str());
            }
            Op::WhileLoop { cond, body } => {
                refs.push(cond.as_str());
                refs.push(body.as_str());
            }
            Op::Map { body } => refs.push(body.as_str()),
            Op::Placeholder | Op::Call { .. } | Op::GetAttr { .. } | Op::Output => {}
        }
        refs
    }

    /// Short lowercase name of the op kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Op::Placeholder => "placeholder",
            Op::Call { .. } => "call",
            Op::GetAttr { .. } => "get_attr",
            Op::Cond { .. } => "cond",
            Op::WhileLoop { .. } => "while_loop",
            Op::Map { .. } => "map",
            Op::Output => "output",
        }
    }
}
