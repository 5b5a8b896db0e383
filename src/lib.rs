//! rdfpath — property-path search over RDF graphs
//!
//! Evaluates SPARQL-style property-path expressions against an RDF graph
//! and returns the **actual paths** that match, not just the reachable
//! endpoints. Each result is a witness: the concrete node and edge
//! sequence of a walk whose predicate labels are accepted by the
//! expression. Per destination, only the shortest witnesses are kept
//! (equal-length ties included).
//!
//! # Architecture
//!
//! - [`expr`] — path expression AST and recursive-descent parser
//! - [`automaton`] — Thompson construction of an ε-NFA from the AST
//! - [`graph`] — triple-source abstraction ([`GraphAdapter`]) and the
//!   bundled in-memory store
//! - [`finder`] — product-graph BFS over graph × NFA, with ε-closure,
//!   cycle-safe visited pruning, and shortest-per-destination filtering
//! - [`parser`] — N-Triples loading for the CLI
//! - [`config`] — TOML/environment configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use rdfpath::{find_paths, MemoryGraph, PrefixMap, Term, Triple};
//!
//! let mut graph = MemoryGraph::new();
//! graph.add(Triple::new(
//!     "http://example.org/alice",
//!     "http://example.org/knows",
//!     Term::uri("http://example.org/bob"),
//! ));
//!
//! let mut prefixes = PrefixMap::with_defaults();
//! prefixes.add("ex", "http://example.org/");
//!
//! let witnesses = find_paths("http://example.org/alice", "ex:knows+", &prefixes, &graph)?;
//! for witness in &witnesses {
//!     println!("{}", witness);
//! }
//! ```

pub mod automaton;
pub mod config;
pub mod error;
pub mod expr;
pub mod finder;
pub mod graph;
pub mod parser;
pub mod term;

// Re-export term types
pub use term::{Datatype, Literal, Term, Uri};

// Re-export expression types
pub use expr::{PathExpr, PathParser, PrefixMap};

// Re-export automaton types
pub use automaton::{compile, AutomatonBuilder, Direction, Label, Nfa, StateId, Transition};

// Re-export graph types
pub use graph::{GraphAdapter, GraphError, MemoryGraph, Triple};

// Re-export finder types
pub use finder::{
    find_paths, find_paths_with_config, format_rows_json, keep_shortest, witness_rows,
    FinderConfig, PathFinder, PathWitness, SearchStats, Step, WitnessRow,
    DEFAULT_LENGTH_CEILING,
};

// Re-export graph file parsing
pub use parser::{parse_ntriples, ParseError};

// Re-export configuration types
pub use config::{ConfigError, FinderSection, RdfPathConfig};

// Re-export error types
pub use error::{PathError, PathResult};
