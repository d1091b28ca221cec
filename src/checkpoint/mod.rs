//! Checkpoint and resume functionality for traversals.
//!
//! Walkers hold shared acceptors and cannot be serialized directly. A
//! checkpoint instead records the frontier's journal of driver actions plus a
//! snapshot of every active walker. Restoring replays the journal against a
//! machine and verifies the replayed walkers against the snapshots.

use crate::core::{State, VisitedEdge};
use crate::frontier::{Frontier, FrontierEvent, TraversalConfig, WalkerId};
use crate::machine::StateMachine;
use crate::walker::Walker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Observable position of one active walker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerSnapshot {
    pub id: WalkerId,
    pub state: Option<State>,
    pub history: Vec<VisitedEdge>,
    /// Edge in progress, if any.
    pub pending: Option<VisitedEdge>,
    pub accepting: bool,
}

impl WalkerSnapshot {
    fn capture(id: WalkerId, walker: &Walker) -> Self {
        Self {
            id,
            state: walker.current_state().cloned(),
            history: walker.history().to_vec(),
            pending: walker.current_edge(),
            accepting: walker.is_accepting(),
        }
    }
}

/// Serializable checkpoint of a frontier.
/// Does NOT include the machine (acceptors are not serializable).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TraversalCheckpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    pub config: TraversalConfig,

    /// Every driver action since the frontier was created
    pub journal: Vec<FrontierEvent>,

    /// Active walkers at checkpoint time, in priority order
    pub walkers: Vec<WalkerSnapshot>,
}

impl TraversalCheckpoint {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version == CHECKPOINT_VERSION {
            Ok(())
        } else {
            Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            })
        }
    }
}

impl Frontier {
    /// Snapshot the journal and the active walkers.
    pub fn checkpoint(&self) -> TraversalCheckpoint {
        TraversalCheckpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            config: self.config().clone(),
            journal: self.journal().to_vec(),
            walkers: self.snapshots(),
        }
    }

    /// Rebuild a frontier by replaying `checkpoint` against `machine`.
    ///
    /// Fails if the version is unsupported, if a journaled action is
    /// rejected, or if the replayed walkers differ from the recorded ones
    /// (for instance because `machine` is not the machine that was driven).
    pub fn restore(
        machine: Arc<StateMachine>,
        checkpoint: &TraversalCheckpoint,
    ) -> Result<Self, CheckpointError> {
        checkpoint.check_version()?;

        let mut frontier = Frontier::new(machine, checkpoint.config.clone());
        for (index, event) in checkpoint.journal.iter().enumerate() {
            frontier
                .apply(event)
                .map_err(|source| CheckpointError::ReplayRejected { index, source })?;
        }

        let replayed = frontier.snapshots();
        if replayed.len() != checkpoint.walkers.len() {
            return Err(CheckpointError::ReplayDiverged(format!(
                "expected {} active walkers, replay produced {}",
                checkpoint.walkers.len(),
                replayed.len()
            )));
        }
        if let Some((expected, found)) = checkpoint
            .walkers
            .iter()
            .zip(&replayed)
            .find(|(expected, found)| expected != found)
        {
            return Err(CheckpointError::ReplayDiverged(format!(
                "walker {} does not match replayed walker {}",
                expected.id, found.id
            )));
        }

        debug!(
            checkpoint = %checkpoint.id,
            events = checkpoint.journal.len(),
            walkers = replayed.len(),
            "restored frontier"
        );
        Ok(frontier)
    }

    fn snapshots(&self) -> Vec<WalkerSnapshot> {
        self.active_walkers()
            .map(|(id, walker)| WalkerSnapshot::capture(id, walker))
            .collect()
    }
}
