//! Walkers: cursors tracking one traversal attempt.
//!
//! A walker pairs a shared [`Acceptor`] with a private position. Leaf
//! walkers remember the text consumed so far; machine walkers remember the
//! current state, the history of completed edges, and at most one active
//! sub-walker for the edge being traversed. The sub-walker is owned
//! exclusively (boxed), so forking a walker is a plain `clone` and forks never
//! share mutable state.

mod traversal;

use crate::acceptor::Acceptor;
use crate::core::{History, State, VisitedEdge};
use crate::machine::StateMachine;
use crate::vocabulary::Vocabulary;
use serde_json::{Number, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Cursor over an acceptor.
#[derive(Clone, Debug, PartialEq)]
pub struct Walker {
    acceptor: Acceptor,
    position: Position,
    remaining: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
enum Position {
    Leaf { value: String },
    Machine(Cursor),
}

#[derive(Clone, Debug, PartialEq)]
struct Cursor {
    current: State,
    active: Option<ActiveEdge>,
    history: History,
}

/// Edge in progress: `current` stays at `source` until the sub-walker is folded.
#[derive(Clone, Debug, PartialEq)]
struct ActiveEdge {
    source: State,
    target: State,
    walker: Box<Walker>,
}

impl Walker {
    pub(crate) fn new(acceptor: Acceptor) -> Self {
        match acceptor {
            Acceptor::Machine(machine) => {
                let initial = machine.initial_state().clone();
                Self::at_state(machine, initial)
            }
            leaf @ (Acceptor::Text(_) | Acceptor::Chars(_)) => Self {
                acceptor: leaf,
                position: Position::Leaf {
                    value: String::new(),
                },
                remaining: None,
            },
        }
    }

    pub(crate) fn at_state(machine: Arc<StateMachine>, state: State) -> Self {
        Self {
            acceptor: Acceptor::Machine(machine),
            position: Position::Machine(Cursor {
                current: state,
                active: None,
                history: History::new(),
            }),
            remaining: None,
        }
    }

    /// The acceptor this walker traverses.
    pub fn acceptor(&self) -> &Acceptor {
        &self.acceptor
    }

    /// The machine this walker traverses, if it is a machine walker.
    pub fn machine(&self) -> Option<&Arc<StateMachine>> {
        match &self.acceptor {
            Acceptor::Machine(machine) => Some(machine),
            _ => None,
        }
    }

    /// Current state; `None` for leaf walkers.
    pub fn current_state(&self) -> Option<&State> {
        self.cursor().map(|cursor| &cursor.current)
    }

    /// Destination of the edge in progress.
    pub fn target_state(&self) -> Option<&State> {
        self.active().map(|active| &active.target)
    }

    /// Completed edges, oldest first. Empty for leaf walkers.
    pub fn history(&self) -> &[VisitedEdge] {
        self.cursor().map_or(&[], |cursor| cursor.history.edges())
    }

    /// The sub-walker for the edge in progress.
    pub fn active_walker(&self) -> Option<&Walker> {
        self.active().map(|active| active.walker.as_ref())
    }

    /// The edge in progress, as an open visited edge.
    pub fn current_edge(&self) -> Option<VisitedEdge> {
        self.active()
            .map(|active| VisitedEdge::open(active.source.clone(), active.walker.raw_value()))
    }

    /// Completed history followed by the edge in progress, if any.
    pub fn visited_edges(&self) -> Vec<VisitedEdge> {
        let mut edges = self.history().to_vec();
        edges.extend(self.current_edge());
        edges
    }

    /// Input handed back because the acceptor completed before the unit ended.
    pub fn remaining_input(&self) -> Option<&str> {
        self.remaining.as_deref()
    }

    pub(crate) fn take_remaining_input(&mut self) -> Option<String> {
        self.remaining.take()
    }

    /// Everything consumed so far, or `None` if nothing was.
    pub fn raw_value(&self) -> Option<String> {
        match &self.position {
            Position::Leaf { value } => (!value.is_empty()).then(|| value.clone()),
            Position::Machine(cursor) => {
                let mut value = cursor.history.raw_value().unwrap_or_default();
                if let Some(partial) = cursor.active.as_ref().and_then(|a| a.walker.raw_value()) {
                    value.push_str(&partial);
                }
                (!value.is_empty()).then_some(value)
            }
        }
    }

    /// The consumed text parsed as a JSON value, or `None` if nothing was
    /// consumed.
    ///
    /// Integral numbers are reported as integers even when written with a
    /// fraction (`2.0` becomes `2`). Text that is not valid JSON is returned
    /// as a string.
    pub fn current_value(&self) -> Option<Value> {
        let raw = self.raw_value()?;
        let value = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Number(number)) => Value::Number(integral(number)),
            Ok(value) => value,
            Err(_) => Value::String(raw),
        };
        Some(value)
    }

    pub fn consumed_character_count(&self) -> usize {
        match &self.position {
            Position::Leaf { value } => value.chars().count(),
            Position::Machine(cursor) => {
                cursor.history.consumed_character_count()
                    + cursor
                        .active
                        .as_ref()
                        .map_or(0, |active| active.walker.consumed_character_count())
            }
        }
    }

    /// Check whether the walker is in an accepting position.
    ///
    /// A machine walker accepts when its state reaches an end state (directly
    /// or through zero-width edges) and any active sub-walker is itself
    /// accepting.
    pub fn is_accepting(&self) -> bool {
        match (&self.acceptor, &self.position) {
            (Acceptor::Text(text), Position::Leaf { value }) => {
                value.chars().count() == text.len_chars()
            }
            (Acceptor::Chars(chars), Position::Leaf { value }) => {
                chars.is_accepting(value.chars().count())
            }
            (Acceptor::Machine(machine), Position::Machine(cursor)) => match &cursor.active {
                None => machine.reaches_end(&cursor.current),
                Some(active) => active.walker.is_accepting() && machine.reaches_end(&active.target),
            },
            _ => self.mismatch(),
        }
    }

    /// Check whether any further input could be consumed.
    pub fn can_accept_more_input(&self) -> bool {
        match (&self.acceptor, &self.position) {
            (Acceptor::Text(text), Position::Leaf { value }) => {
                value.chars().count() < text.len_chars()
            }
            (Acceptor::Chars(chars), Position::Leaf { value }) => {
                chars.can_accept_more(value.chars().count())
            }
            (Acceptor::Machine(machine), Position::Machine(cursor)) => match &cursor.active {
                None => !machine.graph().edges_from(&cursor.current).is_empty(),
                Some(active) => {
                    active.walker.can_accept_more_input()
                        || (active.walker.is_accepting()
                            && !machine.graph().edges_from(&active.target).is_empty())
                }
            },
            _ => self.mismatch(),
        }
    }

    /// Check whether the walker is part-way through a value.
    ///
    /// A walker within a value must finish (or fail) it before any other
    /// edge is offered in its place.
    pub fn is_within_value(&self) -> bool {
        match (&self.acceptor, &self.position) {
            (Acceptor::Text(text), Position::Leaf { value }) => {
                let matched = value.chars().count();
                matched > 0 && matched < text.len_chars()
            }
            (Acceptor::Chars(chars), Position::Leaf { value }) => {
                let count = value.chars().count();
                count > 0 && !chars.is_accepting(count)
            }
            (Acceptor::Machine(machine), Position::Machine(cursor)) => match &cursor.active {
                Some(active) => {
                    active.walker.consumed_character_count() > 0
                        && (active.walker.is_within_value() || !active.walker.is_accepting())
                }
                // between edges, e.g. right after an opening quote
                None => {
                    cursor.history.consumed_character_count() > 0
                        && !machine.reaches_end(&cursor.current)
                }
            },
            _ => self.mismatch(),
        }
    }

    /// Check whether `unit` can be consumed in full from this position.
    pub fn accepts_input(&self, unit: &str) -> bool {
        self.consume(unit)
            .iter()
            .any(|successor| successor.remaining.is_none())
    }

    /// Literal text or characters that could extend this walker next.
    pub fn valid_continuations(&self) -> Vec<String> {
        let mut continuations = Vec::new();
        self.collect_continuations(&mut continuations);
        let mut seen = BTreeSet::new();
        continuations.retain(|c| seen.insert(c.clone()));
        continuations
    }

    fn collect_continuations(&self, out: &mut Vec<String>) {
        match (&self.acceptor, &self.position) {
            (Acceptor::Text(text), Position::Leaf { value }) => {
                let rest = text.rest(value.chars().count());
                if !rest.is_empty() {
                    out.push(rest.to_string());
                }
            }
            (Acceptor::Chars(chars), Position::Leaf { value }) => {
                if chars.can_accept_more(value.chars().count()) {
                    out.extend(chars.charset().iter().map(char::to_string));
                }
            }
            (Acceptor::Machine(_), Position::Machine(cursor)) => match &cursor.active {
                Some(active) => {
                    active.walker.collect_continuations(out);
                    if active.walker.is_accepting() {
                        self.settled().collect_continuations(out);
                    }
                }
                None => {
                    for branch in self.branch(None) {
                        if let Some(sub) = branch.active_walker() {
                            sub.collect_continuations(out);
                        }
                    }
                }
            },
            _ => self.mismatch(),
        }
    }

    /// Vocabulary tokens consistent with the walker's continuations.
    ///
    /// A token qualifies if it extends a continuation or is a prefix of one.
    pub fn find_valid_prefixes(&self, vocabulary: &Vocabulary) -> BTreeSet<String> {
        let mut prefixes = BTreeSet::new();
        for continuation in self.valid_continuations() {
            prefixes.extend(vocabulary.with_prefix(&continuation).map(str::to_string));
            prefixes.extend(vocabulary.prefixes_of(&continuation).map(str::to_string));
        }
        prefixes
    }

    fn cursor(&self) -> Option<&Cursor> {
        match &self.position {
            Position::Machine(cursor) => Some(cursor),
            Position::Leaf { .. } => None,
        }
    }

    fn active(&self) -> Option<&ActiveEdge> {
        self.cursor().and_then(|cursor| cursor.active.as_ref())
    }

    fn mismatch(&self) -> ! {
        panic!("walker position does not match acceptor {}", self.acceptor)
    }
}

fn integral(number: Number) -> Number {
    match number.as_f64() {
        Some(float)
            if number.is_f64() && float.fract() == 0.0 && float.abs() < i64::MAX as f64 =>
        {
            Number::from(float as i64)
        }
        _ => number,
    }
}

impl fmt::Display for Walker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_accepting() {
            f.write_str("✅ ")?;
        }
        match &self.position {
            Position::Leaf { value } => write!(f, "{}.Walker({value:?})", self.acceptor)?,
            Position::Machine(cursor) => {
                write!(f, "StateMachine.Walker(state: {}", cursor.current)?;
                if let Some(value) = cursor.history.raw_value() {
                    write!(f, ", history: {value:?}")?;
                }
                if let Some(active) = &cursor.active {
                    write!(f, ", {} ➔ {}: {}", active.source, active.target, active.walker)?;
                }
                f.write_str(")")?;
            }
        }
        if let Some(remaining) = &self.remaining {
            write!(f, " remaining {remaining:?}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acceptor::CharacterAcceptor;
    use serde_json::json;

    fn number_machine() -> Arc<StateMachine> {
        Arc::new(
            StateMachine::builder()
                .optional_edge(0, Acceptor::text("-"), 1)
                .edge(1, Acceptor::chars(CharacterAcceptor::digits()), "$")
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn leaf_walker_has_no_state() {
        let walker = Acceptor::text("ab").start_walker();
        assert!(walker.current_state().is_none());
        assert!(walker.history().is_empty());
        assert!(walker.raw_value().is_none());
        assert!(walker.can_accept_more_input());
    }

    #[test]
    fn text_walker_tracks_progress() {
        let walker = Acceptor::text("abc").start_walker();
        let walker = walker.consume("ab").remove(0);
        assert!(walker.is_within_value());
        assert!(!walker.is_accepting());
        assert_eq!(walker.valid_continuations(), vec!["c".to_string()]);
        assert_eq!(walker.consumed_character_count(), 2);
    }

    #[test]
    fn open_edge_reports_partial_value() {
        let machine = number_machine();
        let walker = machine.step(&machine.start_walker(), "4").remove(0);

        assert_eq!(walker.current_state(), Some(&State::ordinal(1)));
        assert_eq!(walker.target_state(), Some(&State::terminal()));
        assert_eq!(
            walker.current_edge(),
            Some(VisitedEdge::open(State::ordinal(1), Some("4".to_string())))
        );
        assert_eq!(walker.visited_edges().len(), 2);
        assert_eq!(walker.raw_value().as_deref(), Some("4"));
        assert!(walker.is_accepting());
        assert!(!walker.is_within_value());
    }

    #[test]
    fn machine_between_edges_is_within_value() {
        let machine = Arc::new(
            StateMachine::builder()
                .edge(0, Acceptor::text("\""), 1)
                .edge(1, Acceptor::chars(CharacterAcceptor::new('a'..='z')), 2)
                .edge(2, Acceptor::text("\""), "$")
                .build()
                .unwrap(),
        );
        let acceptor = Acceptor::machine(Arc::clone(&machine));
        assert!(!machine.start_walker().is_within_value());

        let opened = machine.step(&machine.start_walker(), "\"").remove(0);
        assert!(opened.active_walker().is_none());
        assert_eq!(opened.current_state(), Some(&State::ordinal(1)));
        assert!(opened.is_within_value());
        assert!(acceptor.is_within_value(&opened));

        let closed = machine.step(&opened, "ab\"").remove(0);
        assert!(closed.is_accepting());
        assert!(!closed.is_within_value());
    }

    #[test]
    fn current_value_parses_consumed_text() {
        let machine = number_machine();
        assert_eq!(machine.start_walker().current_value(), None);

        let walker = machine.step(&machine.start_walker(), "-42").remove(0);
        assert_eq!(walker.current_value(), Some(json!(-42)));

        let float = Acceptor::text("2.0").start_walker().consume("2.0").remove(0);
        assert_eq!(float.current_value(), Some(json!(2)));
        let fraction = Acceptor::text("1.5").start_walker().consume("1.5").remove(0);
        assert_eq!(fraction.current_value(), Some(json!(1.5)));

        let quoted = Acceptor::text("\"ab\"").start_walker();
        let closed = quoted.consume("\"ab\"").remove(0);
        assert_eq!(closed.current_value(), Some(json!("ab")));
        let open = quoted.consume("\"ab").remove(0);
        assert_eq!(open.current_value(), Some(json!("\"ab")));
    }

    #[test]
    fn continuations_from_start_cover_every_edge() {
        let machine = number_machine();
        let continuations = machine.start_walker().valid_continuations();
        assert_eq!(continuations[0], "-");
        assert!(continuations.contains(&"0".to_string()));
        assert!(continuations.contains(&"9".to_string()));
        assert_eq!(continuations.len(), 11);
    }

    #[test]
    fn valid_prefixes_use_vocabulary() {
        let walker = Acceptor::text("true").start_walker();
        let vocab: Vocabulary = ["t", "tr", "true", "true,", "false"].into_iter().collect();
        let prefixes: Vec<_> = walker.find_valid_prefixes(&vocab).into_iter().collect();
        assert_eq!(prefixes, vec!["t", "tr", "true", "true,"]);
    }

    #[test]
    fn display_marks_accepting_walkers() {
        let machine = number_machine();
        let walker = machine.step(&machine.start_walker(), "-7").remove(0);
        let rendered = walker.to_string();
        assert!(rendered.starts_with("✅ StateMachine.Walker(state: 1"));
        assert!(rendered.contains("history: \"-\""));
    }
}
