//! Pass error types.

use nodemark_core::CoreError;

use crate::verify::HandleError;

/// Errors that can occur while running passes over a module tree.
#[derive(Debug, thiserror::Error)]
pub enum PassError {
    /// A pass tried an invalid graph edit.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Debug handle verification after a pass found problems.
    #[error("debug handle verification failed with {} error(s)", .0.len())]
    Verification(Vec<HandleError>),

    /// Numbering reached `u64::MAX` before every node had a handle.
    #[error("debug handles exhausted: {unfilled} node(s) left without a handle")]
    HandlesExhausted { unfilled: u64 },

    /// A pass gave up for a reason of its own.
    #[error("pass '{pass}' failed: {reason}")]
    Failed { pass: &'static str, reason: String },
}
