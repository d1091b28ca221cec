//! Stepping walkers through their acceptors.

use super::{ActiveEdge, Cursor, Position, Walker};
use crate::acceptor::{Acceptor, Advance};
use crate::core::{History, State, VisitedEdge};
use crate::machine::StateMachine;
use std::collections::BTreeSet;
use tracing::trace;

/// Pending work while advancing one machine level.
struct Task {
    walker: Walker,
    /// `None` once the walker is done with the unit
    input: Option<String>,
    /// input was handed back by a completed edge rather than given by the caller
    leftover: bool,
}

impl Walker {
    /// Consume one unit, returning every viable successor.
    ///
    /// Successors are ordered by edge priority. A successor whose acceptor
    /// completed before the end of the unit carries the rest as
    /// [`remaining_input`](Walker::remaining_input); callers wanting whole
    /// units only should use [`StateMachine::step`].
    ///
    /// Within one machine level the search uses an explicit work stack.
    /// Nested machines recurse once per level, so stack depth grows with the
    /// nesting depth of the grammar, not with the input length.
    pub fn consume(&self, unit: &str) -> Vec<Walker> {
        if unit.is_empty() {
            return vec![self.clone()];
        }
        match (&self.acceptor, &self.position) {
            (Acceptor::Text(text), Position::Leaf { value }) => {
                self.leaf_successor(text.advance(value, unit))
            }
            (Acceptor::Chars(chars), Position::Leaf { value }) => {
                self.leaf_successor(chars.advance(value, unit))
            }
            (Acceptor::Machine(_), Position::Machine(_)) => self.consume_in_machine(unit),
            _ => self.mismatch(),
        }
    }

    /// Fork one walker per edge that can start on `unit`.
    ///
    /// Edges leaving the current state are tried in insertion order. A
    /// skippable edge additionally contributes the edges of its destination,
    /// recorded behind a zero-width visited edge. Walkers with an edge already
    /// in progress and leaf walkers do not branch.
    pub fn branch(&self, unit: Option<&str>) -> Vec<Walker> {
        let (Acceptor::Machine(machine), Position::Machine(cursor)) =
            (&self.acceptor, &self.position)
        else {
            return Vec::new();
        };
        if cursor.active.is_some() {
            return Vec::new();
        }
        let first = unit.and_then(|unit| unit.chars().next());
        let mut branches = Vec::new();
        let mut visited = BTreeSet::new();
        self.branch_from(
            machine,
            &cursor.current,
            &cursor.history,
            first,
            &mut visited,
            &mut branches,
        );
        branches
    }

    fn branch_from(
        &self,
        machine: &StateMachine,
        state: &State,
        history: &History,
        first: Option<char>,
        visited: &mut BTreeSet<State>,
        branches: &mut Vec<Walker>,
    ) {
        if !visited.insert(state.clone()) {
            return;
        }
        for edge in machine.graph().edges_from(state) {
            if first.map_or(true, |c| edge.acceptor().can_start_with(c)) {
                branches.push(Walker {
                    acceptor: self.acceptor.clone(),
                    position: Position::Machine(Cursor {
                        current: state.clone(),
                        active: Some(ActiveEdge {
                            source: state.clone(),
                            target: edge.target().clone(),
                            walker: Box::new(edge.acceptor().start_walker()),
                        }),
                        history: history.clone(),
                    }),
                    remaining: None,
                });
            }
            if edge.is_skippable() {
                let skipped = history.record(VisitedEdge::skipped(state.clone(), edge.target().clone()));
                self.branch_from(machine, edge.target(), &skipped, first, visited, branches);
            }
        }
    }

    fn leaf_successor(&self, advance: Option<Advance>) -> Vec<Walker> {
        advance
            .map(|advance| Walker {
                acceptor: self.acceptor.clone(),
                position: Position::Leaf {
                    value: advance.value,
                },
                remaining: advance.remaining,
            })
            .into_iter()
            .collect()
    }

    fn consume_in_machine(&self, unit: &str) -> Vec<Walker> {
        let mut successors = Vec::new();
        let mut stack = vec![Task {
            walker: self.clone(),
            input: Some(unit.to_string()),
            leftover: false,
        }];
        while let Some(Task {
            walker,
            input,
            leftover,
        }) = stack.pop()
        {
            let Some(input) = input else {
                successors.push(walker);
                continue;
            };
            let children = walker.expand(input, leftover);
            // reversed so the highest-priority child is popped first
            stack.extend(children.into_iter().rev());
        }
        trace!(unit, successors = successors.len(), "consumed unit");
        successors
    }

    /// One search step for a machine walker holding `input`.
    fn expand(&self, input: String, leftover: bool) -> Vec<Task> {
        let mut children = Vec::new();
        let Some(cursor) = self.cursor() else {
            return children;
        };
        match &cursor.active {
            Some(active) => {
                if active.walker.can_accept_more_input() {
                    for sub in active.walker.consume(&input) {
                        if let Some(mut next) = self.complete_transition(sub) {
                            let rest = next.remaining.take();
                            let leftover = rest.is_some();
                            children.push(Task {
                                walker: next,
                                input: rest,
                                leftover,
                            });
                        }
                    }
                }
                // the sub-walker may also stop here and let the next edge take the input
                if active.walker.is_accepting()
                    && active.walker.consumed_character_count() > 0
                    && !active.walker.is_within_value()
                {
                    children.push(Task {
                        walker: self.settled(),
                        input: Some(input),
                        leftover,
                    });
                }
            }
            None => {
                let branches = self.branch(Some(&input));
                let hand_back = leftover && (branches.is_empty() || self.is_accepting());
                children.extend(branches.into_iter().map(|walker| Task {
                    walker,
                    input: Some(input.clone()),
                    leftover,
                }));
                if hand_back {
                    let mut partial = self.clone();
                    partial.remaining = Some(input);
                    children.push(Task {
                        walker: partial,
                        input: None,
                        leftover,
                    });
                }
            }
        }
        children
    }

    /// Replace the active sub-walker with its successor `sub`.
    ///
    /// A completed sub-walker is folded into the history as one collapsed
    /// visited edge and the walker moves to the edge destination. Returns
    /// `None` when `sub` handed input back without being complete.
    fn complete_transition(&self, mut sub: Walker) -> Option<Walker> {
        let cursor = self.cursor()?;
        let active = cursor.active.as_ref()?;
        let remaining = sub.remaining.take();
        if remaining.is_some() && !sub.is_accepting() {
            return None;
        }
        let cursor = if sub.is_accepting() && (remaining.is_some() || !sub.can_accept_more_input()) {
            fold(cursor, active, &sub)
        } else {
            Cursor {
                current: cursor.current.clone(),
                active: Some(ActiveEdge {
                    source: active.source.clone(),
                    target: active.target.clone(),
                    walker: Box::new(sub),
                }),
                history: cursor.history.clone(),
            }
        };
        Some(Walker {
            acceptor: self.acceptor.clone(),
            position: Position::Machine(cursor),
            remaining,
        })
    }

    /// Fold an accepting active sub-walker, moving to its edge destination.
    ///
    /// Walkers without an active edge are returned unchanged.
    pub(super) fn settled(&self) -> Walker {
        let Some(cursor) = self.cursor() else {
            return self.clone();
        };
        let Some(active) = &cursor.active else {
            return self.clone();
        };
        Walker {
            acceptor: self.acceptor.clone(),
            position: Position::Machine(fold(cursor, active, &active.walker)),
            remaining: self.remaining.clone(),
        }
    }
}

/// Collapse the sub-walker's traversal into a single visited edge.
fn fold(cursor: &Cursor, active: &ActiveEdge, sub: &Walker) -> Cursor {
    let value = sub.raw_value().unwrap_or_default();
    Cursor {
        current: active.target.clone(),
        active: None,
        history: cursor.history.record(VisitedEdge::completed(
            active.source.clone(),
            active.target.clone(),
            value,
        )),
    }
}
