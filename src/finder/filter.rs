//! Shortest-per-destination result filtering
//!
//! The raw BFS accepts every walk that lands on a final NFA state, so a
//! single destination can appear with several lengths and the equal-depth
//! visited rule can emit the same walk more than once. This pass keeps,
//! per destination, only the witnesses of minimum length, and drops
//! element-wise duplicates.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::term::Term;

use super::witness::PathWitness;

/// Keep only the shortest witnesses per destination, deduplicated
///
/// Equal-length ties to the same destination are all retained. First-seen
/// order is preserved, which makes the output deterministic for a
/// deterministic graph adapter (callers must still not rely on order).
pub fn keep_shortest(paths: Vec<PathWitness>) -> Vec<PathWitness> {
    let mut shortest: HashMap<String, usize> = HashMap::new();

    for path in &paths {
        let key = destination_key(path.destination());
        shortest
            .entry(key)
            .and_modify(|min| *min = (*min).min(path.len()))
            .or_insert_with(|| path.len());
    }

    let mut unique: IndexSet<PathWitness> = IndexSet::new();
    for path in paths {
        let key = destination_key(path.destination());
        if shortest[&key] == path.len() {
            unique.insert(path);
        }
    }

    unique.into_iter().collect()
}

/// Grouping key for a destination: resources by IRI, literals by their
/// lexical form
fn destination_key(term: &Term) -> String {
    match term {
        Term::Uri(uri) => uri.to_string(),
        Term::Literal(lit) => lit.value().to_string(),
    }
}
