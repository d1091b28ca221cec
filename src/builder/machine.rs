//! Builder for constructing state machines.

use crate::acceptor::Acceptor;
use crate::builder::error::{BuildError, GraphFault};
use crate::core::{Edge, State, StateGraph};
use crate::machine::StateMachine;
use std::collections::BTreeSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

/// Builder for constructing state machines with a fluent API.
///
/// Defaults: initial state `0`, end states `{"$"}`.
pub struct StateMachineBuilder {
    initial: State,
    graph: StateGraph,
    end_states: Option<BTreeSet<State>>,
}

impl StateMachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: State::default(),
            graph: StateGraph::new(),
            end_states: None,
        }
    }

    /// Set the initial state.
    pub fn initial(mut self, state: impl Into<State>) -> Self {
        self.initial = state.into();
        self
    }

    /// Append an edge leaving `source`.
    pub fn edge(
        self,
        source: impl Into<State>,
        acceptor: impl Into<Acceptor>,
        target: impl Into<State>,
    ) -> Self {
        self.add_edge(source, Edge::new(acceptor, target))
    }

    /// Append an edge that may be skipped without consuming input.
    pub fn optional_edge(
        self,
        source: impl Into<State>,
        acceptor: impl Into<Acceptor>,
        target: impl Into<State>,
    ) -> Self {
        self.add_edge(source, Edge::new(acceptor, target).optional())
    }

    /// Append a pre-built edge.
    pub fn add_edge(mut self, source: impl Into<State>, edge: Edge) -> Self {
        self.graph.add_edge(source, edge);
        self
    }

    /// Declare a state without outgoing edges.
    pub fn state(mut self, state: impl Into<State>) -> Self {
        self.graph.add_state(state);
        self
    }

    /// Append every edge of `graph`, keeping its per-state order.
    pub fn graph(mut self, graph: StateGraph) -> Self {
        for (state, edges) in graph.iter() {
            self.graph.add_state(state);
            for edge in edges {
                self.graph.add_edge(state, edge.clone());
            }
        }
        self
    }

    /// Add an accepting state. Replaces the default terminal on first use.
    pub fn end_state(mut self, state: impl Into<State>) -> Self {
        self.end_states
            .get_or_insert_with(BTreeSet::new)
            .insert(state.into());
        self
    }

    /// Set the accepting states.
    pub fn end_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<State>,
    {
        self.end_states = Some(states.into_iter().map(Into::into).collect());
        self
    }

    /// Build the state machine.
    ///
    /// Every edge destination and the initial state must be a state of the
    /// graph or an end state. All violations are reported together.
    pub fn build(self) -> Result<StateMachine, BuildError> {
        let end_states = self
            .end_states
            .unwrap_or_else(|| BTreeSet::from([State::terminal()]));
        if end_states.is_empty() {
            return Err(BuildError::NoEndStates);
        }

        match validate(&self.graph, &self.initial, &end_states) {
            Validation::Success(_) => {
                debug!(
                    states = self.graph.states().count(),
                    edges = self.graph.edge_count(),
                    initial = %self.initial,
                    "built state machine"
                );
                Ok(StateMachine::from_parts(self.graph, self.initial, end_states))
            }
            Validation::Failure(faults) => {
                let faults: Vec<GraphFault> = faults.iter().cloned().collect();
                debug!(faults = faults.len(), "rejected state graph");
                Err(BuildError::InvalidGraph { faults })
            }
        }
    }
}

impl Default for StateMachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Check every state reference, accumulating all faults.
fn validate(
    graph: &StateGraph,
    initial: &State,
    end_states: &BTreeSet<State>,
) -> Validation<(), NonEmptyVec<GraphFault>> {
    let known = |state: &State| graph.contains(state) || end_states.contains(state);
    let mut checks: Vec<Validation<(), NonEmptyVec<GraphFault>>> = Vec::new();

    checks.push(if known(initial) {
        Validation::success(())
    } else {
        Validation::fail(GraphFault::UnknownInitialState(initial.clone()))
    });

    for (state, edges) in graph.iter() {
        for (index, edge) in edges.iter().enumerate() {
            checks.push(if known(edge.target()) {
                Validation::success(())
            } else {
                Validation::fail(GraphFault::DanglingTarget {
                    from: state.clone(),
                    index,
                    to: edge.target().clone(),
                })
            });
        }
    }

    Validation::all_vec(checks).map(|_| ())
}
