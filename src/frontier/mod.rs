//! Driver that explores the walker set of one machine.
//!
//! A [`Frontier`] is an arena of walkers addressed by [`WalkerId`] handles.
//! Each slot remembers the walker it was forked from, so the full lineage of
//! any handle can be recovered even after its ancestors were released. Every
//! driver action is appended to a journal, which is what checkpoints persist.

use crate::machine::StateMachine;
use crate::walker::Walker;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

pub mod config;
pub mod error;

pub use config::{Retention, TraversalConfig};
pub use error::FrontierError;

/// Handle of a walker inside a [`Frontier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalkerId(usize);

impl WalkerId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WalkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A journaled driver action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontierEvent {
    Advance { unit: String },
    Select { id: WalkerId },
    Discard { id: WalkerId },
    Backtrack,
}

#[derive(Debug)]
struct Slot {
    // None once released
    walker: Option<Walker>,
    parent: Option<WalkerId>,
}

#[derive(Debug)]
struct BranchPoint {
    alternatives: Vec<WalkerId>,
    depth: usize,
}

/// Walker set driven unit by unit.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use trellis::acceptor::Acceptor;
/// use trellis::frontier::{Frontier, Retention, TraversalConfig};
/// use trellis::machine::StateMachine;
///
/// let machine = Arc::new(
///     StateMachine::builder()
///         .edge(0, Acceptor::text("a"), 1)
///         .edge(0, Acceptor::text("ab"), 2)
///         .end_states([1, 2])
///         .build()
///         .unwrap(),
/// );
///
/// let config = TraversalConfig::new().retention(Retention::Backtrack);
/// let mut frontier = Frontier::new(machine, config);
///
/// let forks = frontier.advance("a");
/// assert_eq!(forks.len(), 2);
///
/// frontier.select(forks[0]).unwrap();
/// assert!(frontier.advance("b").is_empty());
///
/// assert_eq!(frontier.backtrack(), Some(1));
/// assert_eq!(frontier.advance("b").len(), 1);
/// assert_eq!(frontier.consumed_input(), "ab");
/// ```
///
/// # Memory
///
/// Slots are never reused. A released walker drops its value but keeps its
/// slot and parent link, so handles stay stable and `lineage` keeps working.
/// The journal also grows by one event per action. Memory therefore grows
/// with the number of forks and actions over the frontier's lifetime. Long
/// traversals should checkpoint and start a fresh frontier.
#[derive(Debug)]
pub struct Frontier {
    machine: Arc<StateMachine>,
    config: TraversalConfig,
    slots: Vec<Slot>,
    active: Vec<WalkerId>,
    units: Vec<String>,
    branch_points: Vec<BranchPoint>,
    journal: Vec<FrontierEvent>,
}

impl Frontier {
    /// Create a frontier holding one root walker at the initial state.
    pub fn new(machine: Arc<StateMachine>, config: TraversalConfig) -> Self {
        let root = machine.start_walker();
        let mut frontier = Self {
            machine,
            config,
            slots: Vec::new(),
            active: Vec::new(),
            units: Vec::new(),
            branch_points: Vec::new(),
            journal: Vec::new(),
        };
        let id = frontier.allocate(root, None);
        frontier.active.push(id);
        frontier
    }

    pub fn machine(&self) -> &Arc<StateMachine> {
        &self.machine
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    pub fn journal(&self) -> &[FrontierEvent] {
        &self.journal
    }

    /// Step every active walker by `unit`, in priority order.
    ///
    /// The successors become the active set and their predecessors are
    /// released. With `max_walkers` set, the lowest-priority successors
    /// beyond the limit are dropped.
    pub fn advance(&mut self, unit: &str) -> Vec<WalkerId> {
        let predecessors = std::mem::take(&mut self.active);
        let mut stepped = Vec::new();
        for parent in predecessors {
            if let Some(walker) = self.slots[parent.0].walker.take() {
                stepped.extend(
                    self.machine
                        .step(&walker, unit)
                        .into_iter()
                        .map(|successor| (parent, successor)),
                );
            }
        }

        if let Some(limit) = self.config.max_walkers {
            if stepped.len() > limit {
                trace!(dropped = stepped.len() - limit, limit, "beam limit reached");
                stepped.truncate(limit);
            }
        }

        let mut active = Vec::with_capacity(stepped.len());
        for (parent, walker) in stepped {
            active.push(self.allocate(walker, Some(parent)));
        }
        self.active = active;
        self.units.push(unit.to_string());
        self.journal.push(FrontierEvent::Advance {
            unit: unit.to_string(),
        });

        trace!(unit, successors = self.active.len(), "advanced frontier");
        self.active.clone()
    }

    /// Commit to one active walker.
    ///
    /// The other active walkers are released under [`Retention::Prune`] and
    /// kept as a branch point under [`Retention::Backtrack`].
    pub fn select(&mut self, id: WalkerId) -> Result<(), FrontierError> {
        let position = self
            .active
            .iter()
            .position(|active| *active == id)
            .ok_or_else(|| self.missing(id))?;

        let mut others = std::mem::take(&mut self.active);
        others.remove(position);
        self.active.push(id);

        match self.config.retention {
            Retention::Prune => {
                for other in others {
                    self.release(other);
                }
            }
            Retention::Backtrack if !others.is_empty() => {
                self.branch_points.push(BranchPoint {
                    alternatives: others,
                    depth: self.units.len(),
                });
            }
            Retention::Backtrack => {}
        }

        self.journal.push(FrontierEvent::Select { id });
        debug!(walker = %id, branch_points = self.branch_points.len(), "selected walker");
        Ok(())
    }

    /// Drop a walker, active or retained. It never reappears.
    pub fn discard(&mut self, id: WalkerId) -> Result<(), FrontierError> {
        if let Some(position) = self.active.iter().position(|active| *active == id) {
            self.active.remove(position);
        } else {
            let point = self
                .branch_points
                .iter()
                .position(|point| point.alternatives.contains(&id))
                .ok_or_else(|| self.missing(id))?;
            self.branch_points[point].alternatives.retain(|other| *other != id);
            self.branch_points.retain(|point| !point.alternatives.is_empty());
        }
        self.release(id);

        self.journal.push(FrontierEvent::Discard { id });
        debug!(walker = %id, "discarded walker");
        Ok(())
    }

    /// Return to the most recent branch point.
    ///
    /// The current active walkers are released and the retained alternatives
    /// become active again. Returns how many units were rolled back, or
    /// `None` when there is nothing to return to.
    pub fn backtrack(&mut self) -> Option<usize> {
        if self.config.retention == Retention::Prune {
            return None;
        }
        let point = self.branch_points.pop()?;

        for id in std::mem::take(&mut self.active) {
            self.release(id);
        }
        self.active = point.alternatives;
        let rolled_back = self.units.len() - point.depth;
        self.units.truncate(point.depth);

        self.journal.push(FrontierEvent::Backtrack);
        debug!(rolled_back, restored = self.active.len(), "backtracked");
        Some(rolled_back)
    }

    /// Live walker for `id`, if it has not been released.
    pub fn walker(&self, id: WalkerId) -> Option<&Walker> {
        self.slots.get(id.0)?.walker.as_ref()
    }

    /// Active handles in priority order.
    pub fn active(&self) -> &[WalkerId] {
        &self.active
    }

    /// Active walkers in priority order.
    pub fn active_walkers(&self) -> impl Iterator<Item = (WalkerId, &Walker)> + '_ {
        self.active
            .iter()
            .filter_map(|id| self.walker(*id).map(|walker| (*id, walker)))
    }

    /// Active handles whose walker is accepting.
    pub fn accepting(&self) -> Vec<WalkerId> {
        self.active_walkers()
            .filter(|(_, walker)| self.machine.is_accepting(walker))
            .map(|(id, _)| id)
            .collect()
    }

    /// True when no walker is active. Retained branch points may remain.
    pub fn is_exhausted(&self) -> bool {
        self.active.is_empty()
    }

    pub fn can_backtrack(&self) -> bool {
        self.config.retention == Retention::Backtrack && !self.branch_points.is_empty()
    }

    /// Ancestry of `id`, root first and ending with `id`.
    pub fn lineage(&self, id: WalkerId) -> Result<Vec<WalkerId>, FrontierError> {
        let mut slot = self.slots.get(id.0).ok_or(FrontierError::UnknownWalker(id))?;
        let mut lineage = vec![id];
        while let Some(parent) = slot.parent {
            lineage.push(parent);
            slot = &self.slots[parent.0];
        }
        lineage.reverse();
        Ok(lineage)
    }

    /// Units consumed by the active walkers, concatenated.
    pub fn consumed_input(&self) -> String {
        self.units.concat()
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    /// Re-run a journaled action.
    pub(crate) fn apply(&mut self, event: &FrontierEvent) -> Result<(), FrontierError> {
        match event {
            FrontierEvent::Advance { unit } => {
                self.advance(unit);
            }
            FrontierEvent::Select { id } => self.select(*id)?,
            FrontierEvent::Discard { id } => self.discard(*id)?,
            FrontierEvent::Backtrack => {
                self.backtrack();
            }
        }
        Ok(())
    }

    fn allocate(&mut self, walker: Walker, parent: Option<WalkerId>) -> WalkerId {
        let id = WalkerId(self.slots.len());
        self.slots.push(Slot {
            walker: Some(walker),
            parent,
        });
        id
    }

    fn release(&mut self, id: WalkerId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.walker = None;
        }
    }

    fn missing(&self, id: WalkerId) -> FrontierError {
        if id.0 < self.slots.len() {
            FrontierError::InactiveWalker(id)
        } else {
            FrontierError::UnknownWalker(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acceptor::{Acceptor, CharacterAcceptor};
    use crate::core::State;

    // 0 --"ab"--> 1 --digits--> $
    // 0 --"a"---> 2 --"c"-----> $
    fn forking_machine() -> Arc<StateMachine> {
        Arc::new(
            StateMachine::builder()
                .edge(0, Acceptor::text("ab"), 1)
                .edge(0, Acceptor::text("a"), 2)
                .edge(1, Acceptor::chars(CharacterAcceptor::digits()), "$")
                .edge(2, Acceptor::text("c"), "$")
                .build()
                .unwrap(),
        )
    }

    fn frontier(retention: Retention) -> Frontier {
        Frontier::new(forking_machine(), TraversalConfig::new().retention(retention))
    }

    #[test]
    fn starts_with_one_root_walker() {
        let frontier = frontier(Retention::Prune);
        assert_eq!(frontier.active().len(), 1);
        assert!(frontier.accepting().is_empty());
        assert!(!frontier.is_exhausted());
        assert_eq!(frontier.consumed_input(), "");
    }

    #[test]
    fn advance_preserves_edge_priority_and_releases_parents() {
        let mut frontier = frontier(Retention::Prune);
        let root = frontier.active()[0];

        let forks = frontier.advance("a");
        assert_eq!(forks.len(), 2);
        assert!(frontier.walker(root).is_none());

        let first = frontier.walker(forks[0]).unwrap();
        let second = frontier.walker(forks[1]).unwrap();
        assert_eq!(first.current_state(), Some(&State::ordinal(0)));
        assert_eq!(second.current_state(), Some(&State::ordinal(2)));
    }

    #[test]
    fn select_prunes_alternatives() {
        let mut frontier = frontier(Retention::Prune);
        let forks = frontier.advance("a");

        frontier.select(forks[1]).unwrap();
        assert_eq!(frontier.active(), &[forks[1]]);
        assert!(frontier.walker(forks[0]).is_none());
        assert_eq!(frontier.backtrack(), None);
        assert!(!frontier.can_backtrack());
    }

    #[test]
    fn select_rejects_inactive_and_unknown_handles() {
        let mut frontier = frontier(Retention::Prune);
        let root = frontier.active()[0];
        frontier.advance("a");

        assert_eq!(frontier.select(root), Err(FrontierError::InactiveWalker(root)));
        let unknown = WalkerId(99);
        assert_eq!(frontier.select(unknown), Err(FrontierError::UnknownWalker(unknown)));
    }

    #[test]
    fn discarded_walker_never_reappears() {
        let mut frontier = frontier(Retention::Prune);
        let forks = frontier.advance("a");

        frontier.discard(forks[0]).unwrap();
        assert_eq!(
            frontier.discard(forks[0]),
            Err(FrontierError::InactiveWalker(forks[0]))
        );

        let next = frontier.advance("c");
        assert_eq!(next.len(), 1);
        assert_eq!(frontier.lineage(next[0]).unwrap()[1], forks[1]);
        assert!(!frontier.active().contains(&forks[0]));
    }

    #[test]
    fn backtrack_restores_retained_alternatives() {
        let mut frontier = frontier(Retention::Backtrack);
        let forks = frontier.advance("a");

        frontier.select(forks[1]).unwrap();
        assert!(frontier.can_backtrack());
        let done = frontier.advance("c");
        assert_eq!(frontier.accepting(), done);
        assert_eq!(frontier.consumed_input(), "ac");

        assert_eq!(frontier.backtrack(), Some(1));
        assert_eq!(frontier.active(), &[forks[0]]);
        assert_eq!(frontier.consumed_input(), "a");
        assert!(frontier.walker(done[0]).is_none());

        frontier.advance("b");
        let end = frontier.advance("7");
        assert_eq!(frontier.accepting(), end);
        assert_eq!(frontier.consumed_input(), "ab7");
        assert_eq!(frontier.backtrack(), None);
    }

    #[test]
    fn discarding_retained_alternative_empties_branch_point() {
        let mut frontier = frontier(Retention::Backtrack);
        let forks = frontier.advance("a");
        frontier.select(forks[1]).unwrap();

        frontier.discard(forks[0]).unwrap();
        assert!(!frontier.can_backtrack());
        assert_eq!(frontier.backtrack(), None);
    }

    #[test]
    fn beam_keeps_highest_priority_successors() {
        let config = TraversalConfig::new().max_walkers(1);
        let mut frontier = Frontier::new(forking_machine(), config);

        let forks = frontier.advance("a");
        assert_eq!(forks.len(), 1);
        let kept = frontier.walker(forks[0]).unwrap();
        assert_eq!(kept.current_state(), Some(&State::ordinal(0)));
    }

    #[test]
    fn lineage_runs_root_first() {
        let mut frontier = frontier(Retention::Prune);
        let root = frontier.active()[0];
        let forks = frontier.advance("a");
        let next = frontier.advance("b");

        assert_eq!(frontier.lineage(next[0]).unwrap(), vec![root, forks[0], next[0]]);
        assert_eq!(
            frontier.lineage(WalkerId(42)),
            Err(FrontierError::UnknownWalker(WalkerId(42)))
        );
    }

    #[test]
    fn released_slots_keep_handles_stable() {
        let mut frontier = frontier(Retention::Prune);
        let root = frontier.active()[0];
        frontier.advance("a");
        frontier.advance("b");

        let mut previous = frontier.active()[0];
        for digit in ["1", "2", "3", "4", "5"] {
            let next = frontier.advance(digit);
            assert_eq!(next.len(), 1);
            assert!(next[0] > previous);
            assert!(frontier.walker(previous).is_none());
            previous = next[0];
        }

        assert_eq!(previous.index(), 8);
        assert!(frontier.walker(root).is_none());
        assert_eq!(frontier.lineage(previous).unwrap().len(), 8);
        assert_eq!(frontier.journal().len(), 7);
    }

    #[test]
    fn exhaustion_after_rejected_unit() {
        let mut frontier = frontier(Retention::Prune);
        assert!(frontier.advance("z").is_empty());
        assert!(frontier.is_exhausted());
    }

    #[test]
    fn journal_records_every_action() {
        let mut frontier = frontier(Retention::Backtrack);
        let forks = frontier.advance("a");
        frontier.select(forks[1]).unwrap();
        frontier.backtrack();
        frontier.discard(forks[0]).unwrap();

        assert_eq!(
            frontier.journal(),
            &[
                FrontierEvent::Advance { unit: "a".into() },
                FrontierEvent::Select { id: forks[1] },
                FrontierEvent::Backtrack,
                FrontierEvent::Discard { id: forks[0] },
            ]
        );
    }
}
