//! Builder API for state machine construction.
//!
//! This module provides a fluent builder and a graph literal macro for
//! creating state machines. Construction validates every state reference and
//! reports all faults at once.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::{BuildError, GraphFault};
pub use machine::StateMachineBuilder;

use crate::acceptor::Acceptor;
use crate::machine::StateMachine;

/// Build a machine that accepts exactly `text` and then stops.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use trellis::builder::literal_machine;
///
/// let machine = Arc::new(literal_machine("null"));
/// let walkers = machine.step(&machine.start_walker(), "null");
/// assert!(machine.is_accepting(&walkers[0]));
/// ```
pub fn literal_machine(text: &str) -> StateMachine {
    StateMachine::from_parts(
        crate::state_graph! { 0 => [(Acceptor::text(text), "$")] },
        crate::core::State::default(),
        [crate::core::State::terminal()].into_iter().collect(),
    )
}

/// Build a machine that accepts one of `alternatives`, tried in order.
pub fn choice_machine<I>(alternatives: I) -> StateMachine
where
    I: IntoIterator,
    I::Item: Into<Acceptor>,
{
    let mut graph = crate::core::StateGraph::new();
    graph.add_state(0);
    for alternative in alternatives {
        graph.add_edge(0, crate::core::Edge::new(alternative, "$"));
    }
    StateMachine::from_parts(
        graph,
        crate::core::State::default(),
        [crate::core::State::terminal()].into_iter().collect(),
    )
}
