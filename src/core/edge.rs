//! Edges and the state graph they form.

use super::state::State;
use crate::acceptor::Acceptor;
use std::collections::BTreeMap;
use std::fmt;

/// A transition labeled by an acceptor.
///
/// The acceptor is shared by every walker crossing the edge; it never
/// holds traversal state of its own.
#[derive(Clone, Debug)]
pub struct Edge {
    acceptor: Acceptor,
    target: State,
    optional: bool,
}

impl Edge {
    /// Pair an acceptor with the state reached once it accepts.
    pub fn new(acceptor: impl Into<Acceptor>, target: impl Into<State>) -> Self {
        Self {
            acceptor: acceptor.into(),
            target: target.into(),
            optional: false,
        }
    }

    /// Mark the edge as optional: it may be skipped without consuming input.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn acceptor(&self) -> &Acceptor {
        &self.acceptor
    }

    pub fn target(&self) -> &State {
        &self.target
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Check whether the edge can be crossed without consuming input.
    pub fn is_skippable(&self) -> bool {
        self.optional || self.acceptor.accepts_empty()
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.acceptor, self.target)?;
        if self.optional {
            f.write_str("?")?;
        }
        Ok(())
    }
}

/// Mapping from a source state to the ordered edges leaving it.
///
/// Edge order within a state is the priority order used to break ties
/// between competing edges. The graph is assembled during construction and
/// only read afterwards; a [`StateMachine`](crate::machine::StateMachine)
/// takes ownership of it.
///
/// # Example
///
/// ```rust
/// use trellis::acceptor::Acceptor;
/// use trellis::core::{Edge, State, StateGraph};
///
/// let mut graph = StateGraph::new();
/// graph.add_edge(0, Edge::new(Acceptor::text("a"), 1));
/// graph.add_edge(0, Edge::new(Acceptor::text("ab"), 2));
///
/// let targets: Vec<_> = graph.edges_from(&State::ordinal(0)).iter().map(|e| e.target()).collect();
/// assert_eq!(targets, vec![&State::ordinal(1), &State::ordinal(2)]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StateGraph {
    edges: BTreeMap<State, Vec<Edge>>,
}

impl StateGraph {
    pub fn new() -> Self {
        Self {
            edges: BTreeMap::new(),
        }
    }

    /// Append an edge to the list leaving `source`.
    pub fn add_edge(&mut self, source: impl Into<State>, edge: Edge) {
        self.edges.entry(source.into()).or_default().push(edge);
    }

    /// Declare a state without outgoing edges.
    pub fn add_state(&mut self, state: impl Into<State>) {
        self.edges.entry(state.into()).or_default();
    }

    /// Edges leaving `state`, in insertion order.
    pub fn edges_from(&self, state: &State) -> &[Edge] {
        self.edges.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, state: &State) -> bool {
        self.edges.contains_key(state)
    }

    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.edges.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&State, &[Edge])> {
        self.edges
            .iter()
            .map(|(state, edges)| (state, edges.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

impl fmt::Display for StateGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (state, edges)) in self.edges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{state}: [")?;
            for (j, edge) in edges.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{edge}")?;
            }
            f.write_str("]")?;
        }
        f.write_str("}")
    }
}
