//! Checkpoint error types.

use crate::frontier::FrontierError;
use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Checkpoint version is not supported by this version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// A journaled action could not be applied during replay
    #[error("Replay rejected event #{index}: {source}")]
    ReplayRejected {
        index: usize,
        #[source]
        source: FrontierError,
    },

    /// Replaying the journal produced different walkers than were recorded
    #[error("Replay diverged from checkpoint: {0}")]
    ReplayDiverged(String),
}
