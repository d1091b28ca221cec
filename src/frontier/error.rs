//! Frontier error types.

use super::WalkerId;
use thiserror::Error;

/// Errors raised when driving a [`Frontier`](super::Frontier).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontierError {
    /// The handle was never issued by this frontier.
    #[error("Unknown walker {0}")]
    UnknownWalker(WalkerId),

    /// The walker exists in the lineage but is no longer live.
    #[error("Walker {0} is not active")]
    InactiveWalker(WalkerId),
}
