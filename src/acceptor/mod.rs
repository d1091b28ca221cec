//! Acceptors: the capability every edge is labeled with.
//!
//! An acceptor describes *how* input is consumed, never *where* a
//! particular traversal currently is. The set of acceptors is closed:
//!
//! - [`TextAcceptor`]: a literal string
//! - [`CharacterAcceptor`]: a run of characters from a set
//! - [`StateMachine`]: a nested machine, giving arbitrarily deep automata
//!
//! [`Acceptor`] is a cheap handle over one of these; cloning it shares the
//! underlying definition.

mod chars;
mod text;

pub use chars::CharacterAcceptor;
pub use text::TextAcceptor;

use crate::machine::StateMachine;
use crate::walker::Walker;
use std::fmt;
use std::sync::Arc;

/// Result of a leaf acceptor consuming part or all of a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Advance {
    pub(crate) value: String,
    pub(crate) remaining: Option<String>,
}

impl Advance {
    /// Append the first `taken` bytes of `unit` to `value`.
    pub(crate) fn split(value: &str, unit: &str, taken: usize) -> Self {
        let (consumed, rest) = unit.split_at(taken);
        Self {
            value: format!("{value}{consumed}"),
            remaining: (!rest.is_empty()).then(|| rest.to_string()),
        }
    }
}

/// Shared, immutable acceptor definition.
///
/// Every query taking a walker expects a walker this acceptor created (via
/// [`Acceptor::start_walker`] or by stepping such a walker). Passing any
/// other walker is a programming error and panics.
///
/// # Example
///
/// ```rust
/// use trellis::acceptor::Acceptor;
///
/// let literal = Acceptor::text("ab");
/// let walker = literal.start_walker();
///
/// assert!(literal.accepts_input(&walker, "a"));
/// assert!(!literal.accepts_input(&walker, "b"));
/// assert!(!literal.is_accepting(&walker));
/// ```
#[derive(Clone, Debug)]
pub enum Acceptor {
    Text(Arc<TextAcceptor>),
    Chars(Arc<CharacterAcceptor>),
    Machine(Arc<StateMachine>),
}

impl Acceptor {
    /// Literal, case-sensitive text.
    pub fn text(text: impl Into<String>) -> Self {
        Acceptor::Text(Arc::new(TextAcceptor::new(text)))
    }

    /// Literal text matched regardless of case.
    pub fn text_ignore_case(text: impl Into<String>) -> Self {
        Acceptor::Text(Arc::new(TextAcceptor::new(text).case_insensitive()))
    }

    pub fn chars(acceptor: CharacterAcceptor) -> Self {
        Acceptor::Chars(Arc::new(acceptor))
    }

    pub fn machine(machine: impl Into<Arc<StateMachine>>) -> Self {
        Acceptor::Machine(machine.into())
    }

    /// Create a walker positioned at the start of this acceptor.
    pub fn start_walker(&self) -> Walker {
        Walker::new(self.clone())
    }

    /// Check whether a fresh walker is already accepting.
    pub fn accepts_empty(&self) -> bool {
        match self {
            Acceptor::Text(text) => text.text().is_empty(),
            Acceptor::Chars(chars) => chars.is_accepting(0),
            Acceptor::Machine(machine) => machine.accepts_empty(),
        }
    }

    /// Cheap pre-check used before forking a walker onto an edge.
    pub(crate) fn can_start_with(&self, c: char) -> bool {
        match self {
            Acceptor::Text(text) => text.can_start_with(c),
            Acceptor::Chars(chars) => chars.can_start_with(c),
            Acceptor::Machine(machine) => machine.can_start_with(c),
        }
    }

    /// Check whether `walker` can consume the whole of `unit`.
    pub fn accepts_input(&self, walker: &Walker, unit: &str) -> bool {
        self.check_owner(walker);
        walker.accepts_input(unit)
    }

    /// Check whether `walker` is in an accepting position of this acceptor.
    pub fn is_accepting(&self, walker: &Walker) -> bool {
        self.check_owner(walker);
        walker.is_accepting()
    }

    /// Check whether `walker` is part-way through a value.
    pub fn is_within_value(&self, walker: &Walker) -> bool {
        self.check_owner(walker);
        walker.is_within_value()
    }

    /// Identity comparison: both handles share the same definition.
    pub fn is_same(&self, other: &Acceptor) -> bool {
        match (self, other) {
            (Acceptor::Text(a), Acceptor::Text(b)) => Arc::ptr_eq(a, b),
            (Acceptor::Chars(a), Acceptor::Chars(b)) => Arc::ptr_eq(a, b),
            (Acceptor::Machine(a), Acceptor::Machine(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn check_owner(&self, walker: &Walker) {
        assert!(
            self.is_same(walker.acceptor()),
            "walker over {} queried against unrelated acceptor {}",
            walker.acceptor(),
            self
        );
    }
}

impl PartialEq for Acceptor {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl From<TextAcceptor> for Acceptor {
    fn from(text: TextAcceptor) -> Self {
        Acceptor::Text(Arc::new(text))
    }
}

impl From<CharacterAcceptor> for Acceptor {
    fn from(chars: CharacterAcceptor) -> Self {
        Acceptor::Chars(Arc::new(chars))
    }
}

impl From<StateMachine> for Acceptor {
    fn from(machine: StateMachine) -> Self {
        Acceptor::Machine(Arc::new(machine))
    }
}

impl From<Arc<StateMachine>> for Acceptor {
    fn from(machine: Arc<StateMachine>) -> Self {
        Acceptor::Machine(machine)
    }
}

impl fmt::Display for Acceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Acceptor::Text(text) => write!(f, "Text({:?})", text.text()),
            Acceptor::Chars(chars) => {
                let set: String = chars.charset().iter().collect();
                write!(f, "Chars({set:?})")
            }
            Acceptor::Machine(machine) => write!(f, "StateMachine({})", machine.graph()),
        }
    }
}
