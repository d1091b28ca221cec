//! State identifiers for state graphs.
//!
//! A state is a plain value: either a small ordinal or a symbolic name.
//! States compare, hash and order by value so they can key a graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the terminal sentinel used as the default end state.
pub const TERMINAL: &str = "$";

/// Identifier of a node in a [`StateGraph`](super::StateGraph).
///
/// # Example
///
/// ```rust
/// use trellis::core::State;
///
/// let start = State::ordinal(0);
/// let done = State::terminal();
///
/// assert_eq!(start, State::from(0));
/// assert_eq!(done, State::from("$"));
/// assert!(done.is_terminal());
/// assert_eq!(start.to_string(), "0");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum State {
    /// Integer state, the usual choice for generated graphs
    Ordinal(i64),
    /// Symbolic state
    Named(String),
}

impl State {
    /// Create an ordinal state.
    pub const fn ordinal(n: i64) -> Self {
        State::Ordinal(n)
    }

    /// Create a named state.
    pub fn named(name: impl Into<String>) -> Self {
        State::Named(name.into())
    }

    /// The terminal sentinel state (`"$"`).
    pub fn terminal() -> Self {
        State::Named(TERMINAL.to_string())
    }

    /// Check if this is the terminal sentinel.
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Named(name) if name == TERMINAL)
    }
}

impl Default for State {
    fn default() -> Self {
        State::Ordinal(0)
    }
}

impl From<i64> for State {
    fn from(n: i64) -> Self {
        State::Ordinal(n)
    }
}

impl From<&str> for State {
    fn from(name: &str) -> Self {
        State::Named(name.to_string())
    }
}

impl From<String> for State {
    fn from(name: String) -> Self {
        State::Named(name)
    }
}

impl From<&State> for State {
    fn from(state: &State) -> Self {
        state.clone()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Ordinal(n) => write!(f, "{n}"),
            State::Named(name) => f.write_str(name),
        }
    }
}
