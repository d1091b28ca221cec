//! Core graph types.
//!
//! This module contains the immutable vocabulary of the engine:
//! - `State` identifiers
//! - `Edge` and `StateGraph`, the shape of a machine
//! - `VisitedEdge` and `History`, the record a walker leaves behind
//!
//! Nothing here holds traversal position; that lives in walkers.

mod edge;
mod history;
mod state;

pub use edge::{Edge, StateGraph};
pub use history::{History, VisitedEdge};
pub use state::{State, TERMINAL};
