//! Composite acceptor driven by an explicit state graph.
//!
//! A [`StateMachine`] is an immutable template: it owns a [`StateGraph`], an
//! initial state and a set of end states. Traversal position lives entirely in
//! [`Walker`]s, so a single machine can be shared (`Arc`) by any number of
//! walkers, on any number of threads, without locking.

use crate::builder::StateMachineBuilder;
use crate::core::{State, StateGraph};
use crate::vocabulary::Vocabulary;
use crate::walker::Walker;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::trace;

/// Hierarchical state machine.
///
/// Build one with [`StateMachine::builder`]; construction validates that
/// every edge destination exists.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use trellis::acceptor::Acceptor;
/// use trellis::machine::StateMachine;
///
/// let machine = Arc::new(
///     StateMachine::builder()
///         .edge(0, Acceptor::text("ab"), 1)
///         .end_state(1)
///         .build()
///         .unwrap(),
/// );
///
/// let walker = machine.start_walker();
/// let walkers = machine.step(&walker, "a");
/// assert_eq!(walkers.len(), 1);
/// assert!(!machine.is_accepting(&walkers[0]));
///
/// let walkers = machine.step(&walkers[0], "b");
/// assert!(machine.is_accepting(&walkers[0]));
/// ```
#[derive(Debug)]
pub struct StateMachine {
    graph: StateGraph,
    initial: State,
    end_states: BTreeSet<State>,
    // states that reach an end state through zero-width edges alone
    nullable: BTreeSet<State>,
}

impl StateMachine {
    /// Start building a machine.
    pub fn builder() -> StateMachineBuilder {
        StateMachineBuilder::new()
    }

    /// Assemble a machine from an already validated graph.
    pub(crate) fn from_parts(graph: StateGraph, initial: State, end_states: BTreeSet<State>) -> Self {
        let nullable = nullable_states(&graph, &end_states);
        Self {
            graph,
            initial,
            end_states,
            nullable,
        }
    }

    pub fn graph(&self) -> &StateGraph {
        &self.graph
    }

    pub fn initial_state(&self) -> &State {
        &self.initial
    }

    pub fn end_states(&self) -> &BTreeSet<State> {
        &self.end_states
    }

    pub fn is_end_state(&self, state: &State) -> bool {
        self.end_states.contains(state)
    }

    /// Check whether `state` is an end state or reaches one through
    /// zero-width edges.
    pub fn reaches_end(&self, state: &State) -> bool {
        self.nullable.contains(state)
    }

    /// Check whether the machine accepts the empty input.
    pub fn accepts_empty(&self) -> bool {
        self.reaches_end(&self.initial)
    }

    pub(crate) fn can_start_with(&self, c: char) -> bool {
        let mut visited = BTreeSet::new();
        self.can_start_from(&self.initial, c, &mut visited)
    }

    fn can_start_from(&self, state: &State, c: char, visited: &mut BTreeSet<State>) -> bool {
        if !visited.insert(state.clone()) {
            return false;
        }
        self.graph.edges_from(state).iter().any(|edge| {
            edge.acceptor().can_start_with(c)
                || (edge.is_skippable() && self.can_start_from(edge.target(), c, visited))
        })
    }

    /// Create a root walker at the initial state with an empty history.
    pub fn start_walker(self: &Arc<Self>) -> Walker {
        Walker::new(Arc::clone(self).into())
    }

    /// Create a root walker at `state` with an empty history.
    ///
    /// The state is not checked against the graph. A walker at a state with
    /// no outgoing edges consumes nothing and accepts only if the state
    /// reaches an end state.
    pub fn start_walker_at(self: &Arc<Self>, state: impl Into<State>) -> Walker {
        Walker::at_state(Arc::clone(self), state.into())
    }

    /// Walkers ready to take the first unit from `state`.
    ///
    /// Returns one walker per edge leaving `state` (including edges reached
    /// through skippable edges), in priority order. A state without outgoing
    /// edges yields a single walker parked at that state.
    pub fn walkers(self: &Arc<Self>, state: impl Into<State>) -> Vec<Walker> {
        let walker = self.start_walker_at(state);
        let branches = walker.branch(None);
        if branches.is_empty() {
            vec![walker]
        } else {
            branches
        }
    }

    /// Advance `walker` by one unit.
    ///
    /// Returns every successor that consumed the whole unit, ordered by edge
    /// priority. An empty result means the walker is pruned.
    ///
    /// # Panics
    ///
    /// Panics if `walker` was not started from this machine.
    pub fn step(self: &Arc<Self>, walker: &Walker, unit: &str) -> Vec<Walker> {
        self.check_owner(walker);
        let successors: Vec<Walker> = walker
            .consume(unit)
            .into_iter()
            .filter(|successor| successor.remaining_input().is_none())
            .collect();
        trace!(
            state = ?walker.current_state(),
            unit,
            successors = successors.len(),
            "stepped walker"
        );
        successors
    }

    /// Advance every walker in `walkers` by one unit, preserving order.
    pub fn step_all(self: &Arc<Self>, walkers: &[Walker], unit: &str) -> Vec<Walker> {
        walkers
            .iter()
            .flat_map(|walker| self.step(walker, unit))
            .collect()
    }

    /// Advance every walker, keeping partial consumption.
    ///
    /// Each result pairs a walker with the text it consumed. Walkers that
    /// consumed the whole unit are paired with `unit`. When a vocabulary is
    /// given, walkers that consumed only a prefix of `unit` are kept if that
    /// prefix is itself a vocabulary token; their remaining input is dropped.
    pub fn advance_all(
        self: &Arc<Self>,
        walkers: &[Walker],
        unit: &str,
        vocabulary: Option<&Vocabulary>,
    ) -> Vec<(String, Walker)> {
        let mut results = Vec::new();
        for walker in walkers {
            self.check_owner(walker);
            for mut advanced in walker.consume(unit) {
                let Some(remaining) = advanced.take_remaining_input() else {
                    results.push((unit.to_string(), advanced));
                    continue;
                };
                let prefix = &unit[..unit.len() - remaining.len()];
                if !prefix.is_empty() && vocabulary.is_some_and(|vocab| vocab.contains(prefix)) {
                    results.push((prefix.to_string(), advanced));
                }
            }
        }
        results
    }

    /// Check whether `walker` sits in an accepting position.
    ///
    /// # Panics
    ///
    /// Panics if `walker` was not started from this machine.
    pub fn is_accepting(&self, walker: &Walker) -> bool {
        self.check_owner(walker);
        walker.is_accepting()
    }

    fn check_owner(&self, walker: &Walker) {
        let owned = walker
            .machine()
            .is_some_and(|machine| std::ptr::eq(Arc::as_ptr(machine), self));
        assert!(owned, "walker {walker} does not belong to this state machine");
    }
}

/// Least fixpoint of "is an end state, or has a skippable edge into one".
fn nullable_states(graph: &StateGraph, end_states: &BTreeSet<State>) -> BTreeSet<State> {
    let mut nullable = end_states.clone();
    loop {
        let mut changed = false;
        for (state, edges) in graph.iter() {
            if nullable.contains(state) {
                continue;
            }
            if edges
                .iter()
                .any(|edge| edge.is_skippable() && nullable.contains(edge.target()))
            {
                nullable.insert(state.clone());
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}
