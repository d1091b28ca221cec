//! Traversal configuration.

use serde::{Deserialize, Serialize};

/// What happens to the walkers not chosen by [`Frontier::select`](super::Frontier::select).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retention {
    /// Unselected walkers are dropped.
    #[default]
    Prune,
    /// Unselected walkers are kept as a branch point to backtrack to.
    Backtrack,
}

/// Configuration for a [`Frontier`](super::Frontier).
///
/// Loadable from JSON; missing fields take their defaults.
///
/// ```
/// use trellis::frontier::{Retention, TraversalConfig};
///
/// let config = TraversalConfig::from_json(r#"{"retention": "backtrack"}"#).unwrap();
/// assert_eq!(config.retention, Retention::Backtrack);
/// assert_eq!(config.max_walkers, None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    pub retention: Retention,
    /// Beam width. Lowest-priority successors are dropped first.
    pub max_walkers: Option<usize>,
}

impl TraversalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    pub fn max_walkers(mut self, limit: usize) -> Self {
        self.max_walkers = Some(limit);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
