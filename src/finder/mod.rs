//! Product-graph breadth-first path exploration
//!
//! The explorer walks the RDF graph and a compiled NFA simultaneously.
//! One invariant governs everything: an ε-transition advances the
//! automaton without moving in the graph or growing the witness, while a
//! predicate transition advances both, consulting forward or reverse
//! neighbors according to the label's direction.
//!
//! Termination on cyclic graphs under Kleene closure rests on the visited
//! map: each `(node, state)` product pair records the minimum witness
//! length at first enqueue, and re-entries are admitted only at depth
//! `<=` that minimum. The `<=` (rather than `<`) deliberately readmits
//! equal-length arrivals so that distinct walks of tied length all
//! produce witnesses.

pub mod filter;
pub mod witness;

pub use filter::keep_shortest;
pub use witness::{format_rows_json, witness_rows, PathWitness, Step, WitnessRow};

use std::collections::VecDeque;

use fnv::FnvHashMap;

use crate::automaton::{compile, Direction, Label, Nfa, StateId};
use crate::error::PathResult;
use crate::expr::{PathParser, PrefixMap};
use crate::graph::GraphAdapter;
use crate::term::Term;

/// Cap on witness length when no explicit limit is configured
///
/// Generous enough never to bind a legitimate query; finite so that
/// pathological inputs cannot expand forever.
pub const DEFAULT_LENGTH_CEILING: usize = 4096;

/// Configuration for a path search
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Cap on predicate count per witness; `None` applies only the
    /// safety ceiling
    pub max_path_length: Option<usize>,
    /// Retain witnesses whose destination is a literal
    pub include_literal_endpoints: bool,
}

impl Default for FinderConfig {
    fn default() -> Self {
        FinderConfig {
            max_path_length: None,
            include_literal_endpoints: false,
        }
    }
}

/// Counters collected during one search
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Search states dequeued from the main frontier
    pub states_expanded: usize,
    /// Graph edges walked through predicate transitions
    pub edges_walked: usize,
    /// Witnesses accepted before filtering
    pub paths_accepted: usize,
}

/// A unit of search progress: a position in the product of graph and
/// automaton, with the witness accumulated so far
///
/// The graph node is the witness's last node; two states sharing
/// `(node, nfa_state)` are the same frontier position with independent
/// witnesses.
struct SearchState {
    nfa_state: StateId,
    path: PathWitness,
}

/// Product-graph BFS explorer over a borrowed graph adapter
pub struct PathFinder<'a, G: GraphAdapter> {
    graph: &'a G,
    config: FinderConfig,
    stats: SearchStats,
}

impl<'a, G: GraphAdapter> PathFinder<'a, G> {
    /// Create a finder with the default configuration
    pub fn new(graph: &'a G) -> Self {
        Self::with_config(graph, FinderConfig::default())
    }

    /// Create a finder with a custom configuration
    pub fn with_config(graph: &'a G, config: FinderConfig) -> Self {
        PathFinder {
            graph,
            config,
            stats: SearchStats::default(),
        }
    }

    /// Counters from the most recent search
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Run the product BFS from `start` and return the filtered witnesses
    ///
    /// Accepts every walk that lands on a final NFA state, then keeps the
    /// shortest witnesses per destination (ties included, duplicates
    /// dropped). A start node unknown to the graph yields an empty result.
    pub fn find(&mut self, start: &Term, nfa: &Nfa) -> PathResult<Vec<PathWitness>> {
        self.stats = SearchStats::default();

        let mut queue: VecDeque<SearchState> = VecDeque::new();
        let mut visited: FnvHashMap<(Term, StateId), usize> = FnvHashMap::default();
        let mut accepted: Vec<PathWitness> = Vec::new();

        let length_cap = self
            .config
            .max_path_length
            .unwrap_or(DEFAULT_LENGTH_CEILING);

        // Seed the frontier with the ε-closure of the initial product state.
        let seed = SearchState {
            nfa_state: nfa.initial(),
            path: PathWitness::start(start.clone()),
        };
        enqueue_closure(seed, nfa, &mut queue, &mut visited);

        while let Some(state) = queue.pop_front() {
            self.stats.states_expanded += 1;
            let node = state.path.destination().clone();

            if nfa.is_final(state.nfa_state) {
                self.stats.paths_accepted += 1;
                accepted.push(state.path.clone());
                // Longer continuations may still reach other destinations.
            }

            for transition in nfa.transitions(state.nfa_state) {
                match &transition.label {
                    Label::Epsilon => {
                        let next = SearchState {
                            nfa_state: transition.target,
                            path: state.path.clone(),
                        };
                        enqueue_closure(next, nfa, &mut queue, &mut visited);
                    }
                    Label::Predicate { iri, direction } => {
                        // Literals close the branch; only resources walk.
                        if !node.is_resource() {
                            continue;
                        }
                        if state.path.len() >= length_cap {
                            continue;
                        }

                        let neighbors = match direction {
                            Direction::Forward => self.graph.forward_neighbors(&node, iri)?,
                            Direction::Reverse => self.graph.reverse_neighbors(&node, iri)?,
                        };

                        for neighbor in neighbors {
                            self.stats.edges_walked += 1;

                            if !neighbor.is_resource() && !self.config.include_literal_endpoints {
                                continue;
                            }

                            let step = Step {
                                predicate: iri.clone(),
                                direction: *direction,
                            };
                            let next = SearchState {
                                nfa_state: transition.target,
                                path: state.path.extend(step, neighbor),
                            };
                            enqueue_closure(next, nfa, &mut queue, &mut visited);
                        }
                    }
                }
            }
        }

        Ok(keep_shortest(accepted))
    }
}

/// Feed the ε-closure of `seed` into the main frontier
///
/// Inner BFS over ε-transitions only; every member carries the seed's
/// witness unchanged. The visited rule gates both the seed and each
/// closure member, which bounds the expansion.
fn enqueue_closure(
    seed: SearchState,
    nfa: &Nfa,
    queue: &mut VecDeque<SearchState>,
    visited: &mut FnvHashMap<(Term, StateId), usize>,
) {
    let mut epsilon_queue: VecDeque<SearchState> = VecDeque::new();

    if can_visit(&seed, visited) {
        visited.insert(
            (seed.path.destination().clone(), seed.nfa_state),
            seed.path.len(),
        );
        epsilon_queue.push_back(seed);
    }

    while let Some(state) = epsilon_queue.pop_front() {
        for transition in nfa.transitions(state.nfa_state) {
            if transition.label.is_epsilon() {
                let next = SearchState {
                    nfa_state: transition.target,
                    path: state.path.clone(),
                };
                if can_visit(&next, visited) {
                    visited.insert(
                        (next.path.destination().clone(), next.nfa_state),
                        next.path.len(),
                    );
                    epsilon_queue.push_back(next);
                }
            }
        }
        queue.push_back(state);
    }
}

/// Visited rule: admit a product pair if unseen, or if the new witness is
/// no longer than the best known one (equal-length ties stay alive)
fn can_visit(state: &SearchState, visited: &FnvHashMap<(Term, StateId), usize>) -> bool {
    match visited.get(&(state.path.destination().clone(), state.nfa_state)) {
        Some(&depth) => state.path.len() <= depth,
        None => true,
    }
}

/// Parse, compile, and evaluate `expression` from `start_iri` with the
/// default configuration
pub fn find_paths<G: GraphAdapter>(
    start_iri: &str,
    expression: &str,
    prefixes: &PrefixMap,
    graph: &G,
) -> PathResult<Vec<PathWitness>> {
    find_paths_with_config(start_iri, expression, prefixes, graph, FinderConfig::default())
}

/// Parse, compile, and evaluate `expression` from `start_iri`
///
/// Parser and compiler errors surface before any graph access. The
/// returned collection has no guaranteed order.
pub fn find_paths_with_config<G: GraphAdapter>(
    start_iri: &str,
    expression: &str,
    prefixes: &PrefixMap,
    graph: &G,
    config: FinderConfig,
) -> PathResult<Vec<PathWitness>> {
    let expr = PathParser::new(expression, prefixes).parse()?;
    let nfa = compile(&expr)?;

    let start = graph.node_for_iri(start_iri);
    PathFinder::with_config(graph, config).find(&start, &nfa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PathError;
    use crate::graph::{GraphError, MemoryGraph, Triple};
    use crate::term::Uri;

    const EX: &str = "http://ex.org/";

    fn iri(name: &str) -> String {
        format!("{}{}", EX, name)
    }

    fn node(name: &str) -> Term {
        Term::uri(iri(name))
    }

    fn triple(subject: &str, predicate: &str, object: &str) -> Triple {
        Triple::new(iri(subject), iri(predicate), node(object))
    }

    fn prefixes() -> PrefixMap {
        let mut map = PrefixMap::new();
        map.add("ex", EX);
        map
    }

    /// A knows B, B knows C, C knows A, A worksAt X
    fn graph_g1() -> MemoryGraph {
        let mut graph = MemoryGraph::new();
        graph.add(triple("A", "knows", "B"));
        graph.add(triple("B", "knows", "C"));
        graph.add(triple("C", "knows", "A"));
        graph.add(triple("A", "worksAt", "X"));
        graph
    }

    /// G1 plus A knows D, D knows C
    fn graph_g2() -> MemoryGraph {
        let mut graph = graph_g1();
        graph.add(triple("A", "knows", "D"));
        graph.add(triple("D", "knows", "C"));
        graph
    }

    fn run(graph: &MemoryGraph, start: &str, expression: &str) -> Vec<PathWitness> {
        let map = prefixes();
        let witnesses = find_paths(&iri(start), expression, &map, graph).unwrap();
        check_invariants(&witnesses, graph);
        witnesses
    }

    /// Universal witness invariants: node/step length, edge existence,
    /// equal length per destination, no duplicates.
    fn check_invariants(witnesses: &[PathWitness], graph: &MemoryGraph) {
        for witness in witnesses {
            assert_eq!(witness.nodes().len(), witness.len() + 1);

            for (i, step) in witness.steps().iter().enumerate() {
                let (from, to) = (&witness.nodes()[i], &witness.nodes()[i + 1]);
                let traversed = match step.direction {
                    Direction::Forward => graph
                        .forward_neighbors(from, &step.predicate)
                        .unwrap()
                        .contains(to),
                    Direction::Reverse => graph
                        .reverse_neighbors(from, &step.predicate)
                        .unwrap()
                        .contains(to),
                };
                assert!(traversed, "witness step {} not backed by a triple", i);
            }
        }

        for a in witnesses {
            for b in witnesses {
                if a.destination() == b.destination() {
                    assert_eq!(a.len(), b.len());
                }
            }
        }

        for (i, a) in witnesses.iter().enumerate() {
            for b in &witnesses[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    fn destinations(witnesses: &[PathWitness]) -> Vec<Term> {
        witnesses.iter().map(|w| w.destination().clone()).collect()
    }

    #[test]
    fn test_single_predicate() {
        let witnesses = run(&graph_g1(), "A", "ex:knows");
        assert_eq!(witnesses.len(), 1);
        assert_eq!(format!("{}", witnesses[0]), "(A) --[knows]--> (B)");
    }

    #[test]
    fn test_one_or_more_over_cycle() {
        let witnesses = run(&graph_g1(), "A", "ex:knows+");
        assert_eq!(witnesses.len(), 3);

        let mut by_destination: Vec<(Term, usize)> = witnesses
            .iter()
            .map(|w| (w.destination().clone(), w.len()))
            .collect();
        by_destination.sort_by_key(|(_, len)| *len);
        assert_eq!(
            by_destination,
            vec![(node("B"), 1), (node("C"), 2), (node("A"), 3)]
        );
    }

    #[test]
    fn test_zero_or_more_over_cycle() {
        let witnesses = run(&graph_g1(), "A", "ex:knows*");

        // The trivial witness at A wins destination A at length 0, so the
        // full cycle back to A is filtered out.
        assert_eq!(witnesses.len(), 3);
        assert!(witnesses.iter().any(|w| w.is_empty() && w.destination() == &node("A")));
        assert!(destinations(&witnesses).contains(&node("B")));
        assert!(destinations(&witnesses).contains(&node("C")));
    }

    #[test]
    fn test_reverse_step() {
        let witnesses = run(&graph_g1(), "B", "^ex:knows");
        assert_eq!(witnesses.len(), 1);
        assert_eq!(format!("{}", witnesses[0]), "(B) --[^knows]--> (A)");
    }

    #[test]
    fn test_sequence_with_no_match_is_empty() {
        let witnesses = run(&graph_g1(), "A", "ex:knows/ex:worksAt");
        assert!(witnesses.is_empty());
    }

    #[test]
    fn test_alternative() {
        let witnesses = run(&graph_g1(), "A", "ex:knows | ex:worksAt");
        assert_eq!(witnesses.len(), 2);
        let dests = destinations(&witnesses);
        assert!(dests.contains(&node("B")));
        assert!(dests.contains(&node("X")));
    }

    #[test]
    fn test_equal_length_ties_both_retained() {
        let witnesses = run(&graph_g2(), "A", "ex:knows/ex:knows");
        assert_eq!(witnesses.len(), 2);
        assert!(witnesses.iter().all(|w| w.len() == 2));
        assert!(witnesses.iter().all(|w| w.destination() == &node("C")));

        let renderings: Vec<String> = witnesses.iter().map(|w| w.to_string()).collect();
        assert!(renderings.contains(&"(A) --[knows]--> (B) --[knows]--> (C)".to_string()));
        assert!(renderings.contains(&"(A) --[knows]--> (D) --[knows]--> (C)".to_string()));
    }

    #[test]
    fn test_optional_returns_trivial_plus_successors() {
        let witnesses = run(&graph_g1(), "A", "ex:knows?");
        assert_eq!(witnesses.len(), 2);
        assert!(witnesses.iter().any(|w| w.is_empty() && w.destination() == &node("A")));
        assert!(witnesses.iter().any(|w| w.len() == 1 && w.destination() == &node("B")));
    }

    #[test]
    fn test_predicate_equivalent_to_optional_tail() {
        let plain = run(&graph_g1(), "A", "ex:knows");
        let padded = run(&graph_g1(), "A", "ex:knows/(<http://ex.org/anything>?)");

        let padded_length_one: Vec<&PathWitness> =
            padded.iter().filter(|w| w.len() == 1).collect();
        assert_eq!(plain.len(), padded_length_one.len());
        for witness in &plain {
            assert!(padded_length_one.contains(&witness));
        }
    }

    #[test]
    fn test_double_inverse_is_plain_traversal() {
        let plain = run(&graph_g1(), "A", "ex:knows");
        let doubled = run(&graph_g1(), "A", "^^ex:knows");
        assert_eq!(plain, doubled);
    }

    #[test]
    fn test_unknown_start_node_is_empty() {
        let witnesses = run(&graph_g1(), "Nobody", "ex:knows+");
        assert!(witnesses.is_empty());
    }

    #[test]
    fn test_literal_endpoints_dropped_by_default() {
        let mut graph = graph_g1();
        graph.add(Triple::new(iri("A"), iri("name"), Term::literal("Ada")));

        let witnesses = run(&graph, "A", "ex:name");
        assert!(witnesses.is_empty());
    }

    #[test]
    fn test_literal_endpoints_retained_when_configured() {
        let mut graph = graph_g1();
        graph.add(Triple::new(iri("A"), iri("name"), Term::literal("Ada")));

        let config = FinderConfig {
            include_literal_endpoints: true,
            ..Default::default()
        };
        let witnesses =
            find_paths_with_config(&iri("A"), "ex:name", &prefixes(), &graph, config).unwrap();
        assert_eq!(witnesses.len(), 1);
        assert_eq!(format!("{}", witnesses[0]), "(A) --[name]--> (\"Ada\")");
    }

    #[test]
    fn test_literal_never_walked_through() {
        let mut graph = MemoryGraph::new();
        graph.add(Triple::new(iri("A"), iri("p"), Term::literal("stop")));

        // Even with literal endpoints on, a two-step path through the
        // literal cannot exist.
        let config = FinderConfig {
            include_literal_endpoints: true,
            ..Default::default()
        };
        let witnesses =
            find_paths_with_config(&iri("A"), "ex:p/ex:p", &prefixes(), &graph, config).unwrap();
        assert!(witnesses.is_empty());
    }

    #[test]
    fn test_max_path_length_caps_expansion() {
        let config = FinderConfig {
            max_path_length: Some(1),
            ..Default::default()
        };
        let graph = graph_g1();
        let witnesses =
            find_paths_with_config(&iri("A"), "ex:knows+", &prefixes(), &graph, config).unwrap();

        assert_eq!(witnesses.len(), 1);
        assert_eq!(witnesses[0].destination(), &node("B"));
    }

    #[test]
    fn test_parse_error_reported_before_graph_access() {
        let graph = graph_g1();
        let result = find_paths(&iri("A"), "ex:knows ++", &prefixes(), &graph);
        assert!(matches!(result, Err(PathError::Syntax { .. })));
    }

    #[test]
    fn test_stats_collected() {
        let graph = graph_g1();
        let map = prefixes();
        let expr = PathParser::new("ex:knows+", &map).parse().unwrap();
        let nfa = compile(&expr).unwrap();

        let mut finder = PathFinder::new(&graph);
        let witnesses = finder.find(&node("A"), &nfa).unwrap();

        assert!(!witnesses.is_empty());
        assert!(finder.stats().states_expanded > 0);
        assert!(finder.stats().edges_walked > 0);
        assert!(finder.stats().paths_accepted >= witnesses.len());
    }

    /// Adapter that fails on every neighbor lookup
    struct FailingGraph;

    impl GraphAdapter for FailingGraph {
        fn forward_neighbors(&self, _: &Term, _: &Uri) -> Result<Vec<Term>, GraphError> {
            Err(GraphError("backend offline".into()))
        }

        fn reverse_neighbors(&self, _: &Term, _: &Uri) -> Result<Vec<Term>, GraphError> {
            Err(GraphError("backend offline".into()))
        }

        fn node_for_iri(&self, iri: &str) -> Term {
            Term::uri(iri)
        }
    }

    #[test]
    fn test_graph_error_aborts_search() {
        let result = find_paths(&iri("A"), "ex:knows", &prefixes(), &FailingGraph);
        match result {
            Err(PathError::Graph(err)) => assert_eq!(err.0, "backend offline"),
            other => panic!("expected graph error, got {:?}", other),
        }
    }
}
