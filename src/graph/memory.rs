//! In-memory triple store
//!
//! Holds triples in insertion order with bidirectional adjacency indexes,
//! so forward and reverse neighbor lookup are both O(1) map probes.

use fnv::FnvHashMap;

use crate::term::{Term, Uri};

use super::{GraphAdapter, GraphError, Triple};

/// An in-memory RDF graph
#[derive(Clone, Default)]
pub struct MemoryGraph {
    /// The triples, in insertion order
    triples: Vec<Triple>,
    /// (subject, predicate) -> objects
    forward: FnvHashMap<(Term, Uri), Vec<Term>>,
    /// (object, predicate) -> subjects
    reverse: FnvHashMap<(Term, Uri), Vec<Term>>,
}

impl MemoryGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triple; duplicates are ignored
    pub fn add(&mut self, triple: Triple) {
        if self.contains(&triple) {
            return;
        }

        let subject = Term::from_uri(triple.subject.clone());
        self.forward
            .entry((subject.clone(), triple.predicate.clone()))
            .or_default()
            .push(triple.object.clone());
        self.reverse
            .entry((triple.object.clone(), triple.predicate.clone()))
            .or_default()
            .push(subject);
        self.triples.push(triple);
    }

    /// Add multiple triples
    pub fn add_all(&mut self, triples: impl IntoIterator<Item = Triple>) {
        for triple in triples {
            self.add(triple);
        }
    }

    /// Check if the graph contains a triple
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.iter().any(|t| t == triple)
    }

    /// Get the number of triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate over all triples
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }
}

impl GraphAdapter for MemoryGraph {
    fn forward_neighbors(&self, node: &Term, predicate: &Uri) -> Result<Vec<Term>, GraphError> {
        Ok(self
            .forward
            .get(&(node.clone(), predicate.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn reverse_neighbors(&self, node: &Term, predicate: &Uri) -> Result<Vec<Term>, GraphError> {
        Ok(self
            .reverse
            .get(&(node.clone(), predicate.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn node_for_iri(&self, iri: &str) -> Term {
        Term::uri(iri)
    }
}
