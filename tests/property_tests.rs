//! Property-based tests for traversal.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated grammars and inputs.

use proptest::prelude::*;
use std::sync::Arc;
use trellis::acceptor::{Acceptor, CharacterAcceptor};
use trellis::core::{History, State, VisitedEdge};
use trellis::frontier::{Frontier, FrontierError, TraversalConfig};
use trellis::machine::StateMachine;
use trellis::Walker;

// -?digits(.digits)?
fn number_machine() -> Arc<StateMachine> {
    Arc::new(
        StateMachine::builder()
            .optional_edge(0, Acceptor::text("-"), 1)
            .edge(1, Acceptor::chars(CharacterAcceptor::digits()), 2)
            .optional_edge(2, Acceptor::text("."), 3)
            .edge(3, Acceptor::chars(CharacterAcceptor::digits()), 4)
            .end_states([2, 4])
            .build()
            .unwrap(),
    )
}

fn run(machine: &Arc<StateMachine>, units: &[String]) -> Vec<Vec<Walker>> {
    let mut walkers = vec![machine.start_walker()];
    let mut steps = Vec::new();
    for unit in units {
        walkers = machine.step_all(&walkers, unit);
        steps.push(walkers.clone());
    }
    steps
}

prop_compose! {
    fn arbitrary_state()(variant in 0..3u8, n in 0..100i64, name in "[a-z]{1,6}") -> State {
        match variant {
            0 => State::ordinal(n),
            1 => State::named(name),
            _ => State::terminal(),
        }
    }
}

proptest! {
    #[test]
    fn replay_is_deterministic(units in prop::collection::vec("[-0-9.x]{1,3}", 1..6)) {
        let machine = number_machine();
        let first = run(&machine, &units);
        let second = run(&machine, &units);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn first_edge_walker_comes_first(prefix in "[a-z]{1,4}", suffix in "[a-z]{1,4}") {
        let machine = Arc::new(
            StateMachine::builder()
                .edge(0, Acceptor::text(prefix.clone()), 1)
                .edge(0, Acceptor::text(format!("{prefix}{suffix}")), 2)
                .end_states([1, 2])
                .build()
                .unwrap(),
        );

        let walkers = machine.step(&machine.start_walker(), &prefix);
        prop_assert_eq!(walkers.len(), 2);
        prop_assert_eq!(walkers[0].current_state(), Some(&State::ordinal(1)));
        prop_assert_eq!(walkers[1].target_state(), Some(&State::ordinal(2)));
    }

    #[test]
    fn nested_machine_folds_to_one_edge(word in "[a-z]{1,8}") {
        let inner = StateMachine::builder()
            .edge(0, Acceptor::text(word.clone()), "$")
            .build()
            .unwrap();
        let outer = Arc::new(
            StateMachine::builder()
                .edge(0, Acceptor::machine(inner), 1)
                .end_state(1)
                .build()
                .unwrap(),
        );

        let mut walkers = vec![outer.start_walker()];
        for c in word.chars() {
            walkers = outer.step_all(&walkers, &c.to_string());
            prop_assert_eq!(walkers.len(), 1);
        }

        prop_assert!(outer.is_accepting(&walkers[0]));
        prop_assert_eq!(
            walkers[0].history(),
            &[VisitedEdge::completed(State::ordinal(0), State::ordinal(1), word.clone())]
        );
    }

    #[test]
    fn chunking_does_not_change_acceptance(digits in "[0-9]{1,8}") {
        let machine = number_machine();
        let whole = run(&machine, &[digits.clone()]);
        let chars: Vec<String> = digits.chars().map(String::from).collect();
        let split = run(&machine, &chars);

        let whole = whole.last().unwrap();
        let split = split.last().unwrap();
        prop_assert!(whole.iter().any(|w| machine.is_accepting(w)));
        prop_assert!(split.iter().any(|w| machine.is_accepting(w)));
        prop_assert_eq!(whole[0].raw_value(), split[0].raw_value());
    }

    #[test]
    fn discarded_walker_never_reappears(pick in 0..3usize, next in "[a-z]{1,2}") {
        let machine = Arc::new(
            StateMachine::builder()
                .edge(0, Acceptor::text("a"), "$")
                .edge(0, Acceptor::text("ab"), "$")
                .edge(0, Acceptor::chars(CharacterAcceptor::new('a'..='z')), "$")
                .build()
                .unwrap(),
        );
        let mut frontier = Frontier::new(machine, TraversalConfig::default());

        let forks = frontier.advance("a");
        prop_assert_eq!(forks.len(), 3);
        let dropped = forks[pick];

        frontier.discard(dropped).unwrap();
        prop_assert_eq!(frontier.discard(dropped), Err(FrontierError::InactiveWalker(dropped)));
        prop_assert!(!frontier.active().contains(&dropped));

        for id in frontier.advance(&next) {
            prop_assert!(!frontier.lineage(id).unwrap().contains(&dropped));
        }
    }

    #[test]
    fn history_record_is_pure(source in arbitrary_state(), target in arbitrary_state()) {
        let history = History::new();
        let recorded = history.record(VisitedEdge::completed(source, target, "x"));

        prop_assert!(history.is_empty());
        prop_assert_eq!(recorded.len(), 1);
    }

    #[test]
    fn state_roundtrip_serialization(state in arbitrary_state()) {
        let json = serde_json::to_string(&state).unwrap();
        let from_json: State = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(&state, &from_json);

        let bytes = bincode::serialize(&state).unwrap();
        let from_binary: State = bincode::deserialize(&bytes).unwrap();
        prop_assert_eq!(state, from_binary);
    }
}
