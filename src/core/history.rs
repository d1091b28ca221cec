//! Traversal history.
//!
//! A walker records every edge it traverses as a [`VisitedEdge`]. The
//! ordered sequence of those records is its [`History`], the audit trail
//! used to reconstruct the text a walker consumed.

use super::state::State;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record of one completed or in-progress edge traversal.
///
/// - `target == None` marks an edge still in progress.
/// - `value == None` marks a transition that consumed no content.
///
/// # Example
///
/// ```rust
/// use trellis::core::{State, VisitedEdge};
///
/// let edge = VisitedEdge::completed(State::ordinal(0), State::ordinal(1), "ab");
/// assert!(!edge.is_open());
/// assert_eq!(edge.value.as_deref(), Some("ab"));
///
/// let skipped = VisitedEdge::skipped(State::ordinal(1), State::terminal());
/// assert!(skipped.value.is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct VisitedEdge {
    /// State the edge leaves from
    pub source: State,
    /// State the edge arrives at, `None` while still in progress
    pub target: Option<State>,
    /// Content consumed along the edge
    pub value: Option<String>,
}

impl VisitedEdge {
    /// An edge whose acceptor fully accepted `value`.
    pub fn completed(source: State, target: State, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            source,
            target: Some(target),
            value: (!value.is_empty()).then_some(value),
        }
    }

    /// A zero-width transition.
    pub fn skipped(source: State, target: State) -> Self {
        Self {
            source,
            target: Some(target),
            value: None,
        }
    }

    /// An edge still being traversed.
    pub fn open(source: State, value: Option<String>) -> Self {
        Self {
            source,
            target: None,
            value,
        }
    }

    /// Check whether the edge is still in progress.
    pub fn is_open(&self) -> bool {
        self.target.is_none()
    }
}

impl fmt::Display for VisitedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.source)?;
        if let Some(value) = &self.value {
            write!(f, " --{value:?}")?;
        }
        match &self.target {
            Some(target) => write!(f, "--> ({target})"),
            None => f.write_str(" ..."),
        }
    }
}

/// Ordered, append-only history of visited edges.
///
/// `record` is pure: it returns a new history and leaves the original
/// untouched, so forked walkers can share a common prefix by value.
///
/// # Example
///
/// ```rust
/// use trellis::core::{History, State, VisitedEdge};
///
/// let history = History::new()
///     .record(VisitedEdge::completed(State::ordinal(0), State::ordinal(1), "{"))
///     .record(VisitedEdge::completed(State::ordinal(1), State::ordinal(2), "}"));
///
/// assert_eq!(history.raw_value().as_deref(), Some("{}"));
/// assert_eq!(history.path().len(), 3);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct History {
    edges: Vec<VisitedEdge>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self { edges: Vec::new() }
    }

    /// Record an edge, returning a new history.
    ///
    /// The receiver is left untouched, so every fork of a walker can extend
    /// the same history independently. Each call copies the existing edges:
    /// recording is linear in the history length, and a walker that folds
    /// `n` edges pays quadratic copying in total. Histories are bounded by
    /// the edges completed at one nesting level, since each sub-machine
    /// collapses into a single edge of its parent.
    pub fn record(&self, edge: VisitedEdge) -> Self {
        let mut edges = Vec::with_capacity(self.edges.len() + 1);
        edges.extend_from_slice(&self.edges);
        edges.push(edge);
        Self { edges }
    }

    /// Get all visited edges in traversal order.
    pub fn edges(&self) -> &[VisitedEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Get the path of states traversed.
    ///
    /// Returns the source of the first edge, then the target of every
    /// completed edge.
    pub fn path(&self) -> Vec<&State> {
        let mut path = Vec::new();
        if let Some(first) = self.edges.first() {
            path.push(&first.source);
        }
        path.extend(self.edges.iter().filter_map(|edge| edge.target.as_ref()));
        path
    }

    /// Concatenate the consumed values, or `None` if nothing was consumed.
    pub fn raw_value(&self) -> Option<String> {
        let value: String = self
            .edges
            .iter()
            .filter_map(|edge| edge.value.as_deref())
            .collect();
        (!value.is_empty()).then_some(value)
    }

    /// Number of characters consumed along the recorded edges.
    pub fn consumed_character_count(&self) -> usize {
        self.edges
            .iter()
            .filter_map(|edge| edge.value.as_deref())
            .map(|value| value.chars().count())
            .sum()
    }
}
