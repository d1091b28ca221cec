//! Trellis: hierarchical state machines for incremental input acceptance
//!
//! A [`StateMachine`] is a graph whose edges are labeled with acceptors. An
//! acceptor is either a leaf (a literal text or a character run) or another
//! state machine, so automata nest arbitrarily deep. Input arrives one unit
//! at a time; [`Walker`]s track every viable position and fork whenever more
//! than one edge can take the next unit.
//!
//! # Core Concepts
//!
//! - **Acceptor**: Immutable capability describing how input is consumed
//! - **Walker**: Traversal position; forking is cloning
//! - **History**: Completed edges, each with the value it consumed
//! - **Frontier**: Driver owning a walker set, with optional backtracking
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use trellis::{Acceptor, State, StateMachine, VisitedEdge};
//!
//! let machine = Arc::new(
//!     StateMachine::builder()
//!         .edge(0, Acceptor::text("a"), 1)
//!         .edge(0, Acceptor::text("ab"), 2)
//!         .end_states([1, 2])
//!         .build()
//!         .unwrap(),
//! );
//!
//! let walkers = machine.step(&machine.start_walker(), "a");
//! assert_eq!(walkers.len(), 2);
//! assert!(machine.is_accepting(&walkers[0]));
//! assert_eq!(
//!     walkers[0].history(),
//!     &[VisitedEdge::completed(State::ordinal(0), State::ordinal(1), "a")]
//! );
//!
//! let walkers = machine.step(&walkers[1], "b");
//! assert_eq!(walkers[0].current_state(), Some(&State::ordinal(2)));
//! ```

pub mod acceptor;
pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod frontier;
pub mod machine;
pub mod vocabulary;
pub mod walker;

// Re-export commonly used types
pub use acceptor::{Acceptor, CharacterAcceptor, TextAcceptor};
pub use builder::{BuildError, StateMachineBuilder};
pub use checkpoint::{CheckpointError, TraversalCheckpoint};
pub use core::{Edge, History, State, StateGraph, VisitedEdge};
pub use frontier::{Frontier, FrontierError, Retention, TraversalConfig, WalkerId};
pub use machine::StateMachine;
pub use vocabulary::Vocabulary;
pub use walker::Walker;
