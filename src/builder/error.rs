//! Build errors for state machine construction.

use crate::core::State;
use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No end states declared. Call .end_state(state) or keep the default terminal")]
    NoEndStates,

    #[error("Invalid state graph: {}", describe(.faults))]
    InvalidGraph { faults: Vec<GraphFault> },
}

impl BuildError {
    /// Structural faults found in the graph, if that is what failed.
    pub fn faults(&self) -> &[GraphFault] {
        match self {
            BuildError::InvalidGraph { faults } => faults,
            BuildError::NoEndStates => &[],
        }
    }
}

/// A single structural defect in a state graph.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphFault {
    #[error("edge #{index} from state '{from}' targets unknown state '{to}'")]
    DanglingTarget { from: State, index: usize, to: State },

    #[error("initial state '{0}' is neither a graph state nor an end state")]
    UnknownInitialState(State),
}

fn describe(faults: &[GraphFault]) -> String {
    faults
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
