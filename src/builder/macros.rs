//! Macros for state graph construction.

/// Build a [`StateGraph`](crate::core::StateGraph) from a literal.
///
/// Each entry maps a source state to its ordered edges. An edge is written
/// `(acceptor, target)`, or `(acceptor, target, optional)` for an edge that
/// may be skipped. Sources are declared even when their edge list is empty.
///
/// # Example
///
/// ```
/// use trellis::acceptor::{Acceptor, CharacterAcceptor};
/// use trellis::core::State;
/// use trellis::state_graph;
///
/// let graph = state_graph! {
///     0 => [(Acceptor::text("-"), 1, optional)],
///     1 => [(Acceptor::chars(CharacterAcceptor::digits()), "$")],
/// };
///
/// assert_eq!(graph.edge_count(), 2);
/// assert!(graph.edges_from(&State::ordinal(0))[0].is_optional());
/// ```
#[macro_export]
macro_rules! state_graph {
    (@edge $acceptor:expr, $target:expr) => {
        $crate::core::Edge::new($acceptor, $target)
    };
    (@edge $acceptor:expr, $target:expr, optional) => {
        $crate::core::Edge::new($acceptor, $target).optional()
    };
    (
        $(
            $source:expr => [
                $( ($acceptor:expr, $target:expr $(, $flag:ident)?) ),* $(,)?
            ]
        ),* $(,)?
    ) => {{
        #[allow(unused_mut)]
        let mut graph = $crate::core::StateGraph::new();
        $(
            graph.add_state($source);
            $(
                graph.add_edge(
                    $source,
                    $crate::state_graph!(@edge $acceptor, $target $(, $flag)?),
                );
            )*
        )*
        graph
    }};
}

#[cfg(test)]
mod tests {
    use crate::acceptor::Acceptor;
    use crate::core::State;

    #[test]
    fn empty_literal_is_empty_graph() {
        let graph = state_graph! {};
        assert!(graph.is_empty());
    }

    #[test]
    fn edges_keep_declaration_order() {
        let graph = state_graph! {
            0 => [(Acceptor::text("a"), 1), (Acceptor::text("ab"), 2)],
            1 => [],
            "done" => [(Acceptor::text("!"), "$", optional)],
        };

        let from_zero = graph.edges_from(&State::ordinal(0));
        assert_eq!(from_zero.len(), 2);
        assert_eq!(from_zero[1].target(), &State::ordinal(2));
        assert!(graph.contains(&State::ordinal(1)));
        assert!(graph.edges_from(&State::named("done"))[0].is_optional());
    }
}
