//! Exported programs: the unit handed from the exporter to later stages.

use serde::{Deserialize, Serialize};

use crate::graph::GraphModule;

/// A named, exported module tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedProgram {
    /// Program name, used in logs and diagnostics.
    pub name: String,
    /// Root of the module tree.
    pub graph_module: GraphModule,
}

impl ExportedProgram {
    pub fn new(name: impl Into<String>, graph_module: GraphModule) -> Self {
        ExportedProgram {
            name: name.into(),
            graph_module,
        }
    }

    pub fn graph_module(&self) -> &GraphModule {
        &self.graph_module
    }

    pub fn graph_module_mut(&mut self) -> &mut GraphModule {
        &mut self.graph_module
    }
}
