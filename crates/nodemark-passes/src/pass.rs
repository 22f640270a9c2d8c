//! Graph pass trait and a sequential pass manager.

use nodemark_core::graph::GraphModule;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use crate::error::PassError;
use crate::verify::verify_debug_handles;
use crate::PassManagerConfig;

/// Whether a pass changed the module it ran on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PassResult {
    pub modified: bool,
}

impl PassResult {
    pub fn modified() -> Self {
        PassResult { modified: true }
    }

    pub fn unchanged() -> Self {
        PassResult { modified: false }
    }
}

/// A transformation over a module tree, edited in place.
pub trait GraphPass {
    /// Stable name used in logs and errors.
    fn name(&self) -> &'static str;

    fn call(&self, module: &mut GraphModule) -> Result<PassResult, PassError>;
}

/// Runs passes in registration order.
pub struct PassManager {
    passes: Vec<Box<dyn GraphPass>>,
    config: PassManagerConfig,
}

impl PassManager {
    pub fn new(config: PassManagerConfig) -> Self {
        PassManager {
            passes: Vec::new(),
            config,
        }
    }

    /// Appends a pass to the pipeline.
    pub fn with_pass(mut self, pass: impl GraphPass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn config(&self) -> &PassManagerConfig {
        &self.config
    }

    /// Names of the registered passes, in run order.
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Runs every pass once, in order. The result is modified if any pass
    /// modified the module.
    ///
    /// With [`PassManagerConfig::verify_debug_handles`] set, handles are
    /// verified after each modifying pass and the first failure stops the
    /// pipeline.
    pub fn run(&self, module: &mut GraphModule) -> Result<PassResult, PassError> {
        let mut overall = PassResult::unchanged();
        for pass in &self.passes {
            let span = info_span!("pass", name = pass.name());
            let _guard = span.enter();

            let result = pass.call(module)?;
            info!(modified = result.modified, "pass finished");
            overall.modified |= result.modified;

            if self.config.verify_debug_handles && result.modified {
                if let Err(errors) = verify_debug_handles(module) {
                    warn!(errors = errors.len(), "debug handle verification failed");
                    return Err(PassError::Verification(errors));
                }
            }
        }
        Ok(overall)
    }
}
