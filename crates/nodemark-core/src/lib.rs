pub mod edge;
pub mod error;
pub mod graph;
pub mod id;
pub mod node;
pub mod ops;
pub mod program;

// Re-export commonly used types
pub use edge::FlowEdge;
pub use error::CoreError;
pub use graph::{Graph, GraphModule};
pub use id::{DebugHandle, NodeId};
pub use node::{Node, NodeMeta};
pub use ops::Op;
pub use program::ExportedProgram;
