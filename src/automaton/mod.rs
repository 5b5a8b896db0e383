//! Finite automata over predicate labels
//!
//! [`Nfa`] is a Thompson-style non-deterministic finite automaton with
//! ε-transitions. States are integers unique within one compilation;
//! transitions are labeled with a predicate IRI plus a traversal
//! [`Direction`], or with ε. Adjacency lists keep insertion order, so
//! iteration is deterministic. An `Nfa` is immutable once the compiler
//! hands it out.

pub mod builder;

pub use builder::{compile, AutomatonBuilder};

use fnv::FnvHashSet;
use indexmap::IndexMap;

use crate::error::{PathError, PathResult};
use crate::term::Uri;

/// Integer identifier of an NFA state
pub type StateId = u32;

/// Traversal direction of a predicate label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Walk the edge subject-to-object
    Forward,
    /// Walk the edge object-to-subject
    Reverse,
}

impl Direction {
    /// The opposite direction
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Label on an NFA transition
///
/// Inversion toggles the direction bit rather than rewriting the IRI, so
/// inverting twice restores the label exactly. ε never carries a
/// direction and is unaffected by inversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// Empty transition: advances the automaton without consuming an edge
    Epsilon,
    /// Match one graph edge with this predicate, walked in `direction`
    Predicate { iri: Uri, direction: Direction },
}

impl Label {
    /// A forward predicate label
    pub fn predicate(iri: Uri) -> Self {
        Label::Predicate {
            iri,
            direction: Direction::Forward,
        }
    }

    /// Check if this is the empty label
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    /// Copy of this label with the direction toggled; ε is unchanged
    pub fn inverted(&self) -> Self {
        match self {
            Label::Epsilon => Label::Epsilon,
            Label::Predicate { iri, direction } => Label::Predicate {
                iri: iri.clone(),
                direction: direction.flipped(),
            },
        }
    }
}

/// A transition to `target` labeled with `label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub label: Label,
    pub target: StateId,
}

/// A non-deterministic finite automaton with ε-transitions
#[derive(Debug, Clone)]
pub struct Nfa {
    pub(crate) initial: StateId,
    pub(crate) finals: FnvHashSet<StateId>,
    /// Adjacency lists, insertion-ordered per source state
    pub(crate) transitions: IndexMap<StateId, Vec<Transition>>,
}

impl Nfa {
    pub(crate) fn new(initial: StateId, finals: FnvHashSet<StateId>) -> Self {
        Nfa {
            initial,
            finals,
            transitions: IndexMap::new(),
        }
    }

    /// The initial state
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// The set of accepting states
    pub fn finals(&self) -> &FnvHashSet<StateId> {
        &self.finals
    }

    /// Check if the state is accepting
    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(&state)
    }

    pub(crate) fn add_transition(&mut self, source: StateId, label: Label, target: StateId) {
        self.transitions
            .entry(source)
            .or_default()
            .push(Transition { label, target });
    }

    /// Outgoing transitions of a state, in insertion order
    pub fn transitions(&self, source: StateId) -> &[Transition] {
        self.transitions
            .get(&source)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Merge another fragment's transitions into this automaton
    ///
    /// State ids come from one shared counter per compilation, so the key
    /// sets never overlap.
    pub(crate) fn absorb(&mut self, other: Nfa) {
        for (source, transitions) in other.transitions {
            self.transitions.entry(source).or_default().extend(transitions);
        }
    }

    /// Copy with every predicate label's direction toggled
    ///
    /// States, initial state, and final states are unchanged. Applying
    /// this twice yields an automaton identical to the original.
    pub fn inverted(&self) -> Nfa {
        let mut inverted = Nfa::new(self.initial, self.finals.clone());
        for (source, transitions) in &self.transitions {
            for transition in transitions {
                inverted.add_transition(*source, transition.label.inverted(), transition.target);
            }
        }
        inverted
    }

    /// Check structural invariants
    ///
    /// The final set must be non-empty and every transition target must be
    /// a known state (a transition source, a final state, or the initial
    /// state — every state the compiler creates is one of those).
    pub fn validate(&self) -> PathResult<()> {
        if self.finals.is_empty() {
            return Err(PathError::Internal("empty final-state set".into()));
        }

        for (source, transitions) in &self.transitions {
            for transition in transitions {
                let target = transition.target;
                let known = target == self.initial
                    || self.finals.contains(&target)
                    || self.transitions.contains_key(&target);
                if !known {
                    return Err(PathError::Internal(format!(
                        "transition {} -> {} references an unknown state",
                        source, target
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        Uri::from(s)
    }

    #[test]
    fn test_transitions_ordered_by_insertion() {
        let mut nfa = Nfa::new(0, [2].into_iter().collect());
        nfa.add_transition(0, Label::predicate(uri("http://example.org/b")), 1);
        nfa.add_transition(0, Label::Epsilon, 2);
        nfa.add_transition(0, Label::predicate(uri("http://example.org/a")), 2);

        let labels: Vec<&Label> = nfa.transitions(0).iter().map(|t| &t.label).collect();
        assert_eq!(
            labels,
            vec![
                &Label::predicate(uri("http://example.org/b")),
                &Label::Epsilon,
                &Label::predicate(uri("http://example.org/a")),
            ]
        );
    }

    #[test]
    fn test_no_transitions_is_empty_slice() {
        let nfa = Nfa::new(0, [0].into_iter().collect());
        assert!(nfa.transitions(7).is_empty());
    }

    #[test]
    fn test_is_final() {
        let nfa = Nfa::new(0, [1, 3].into_iter().collect());
        assert!(nfa.is_final(1));
        assert!(nfa.is_final(3));
        assert!(!nfa.is_final(0));
    }

    #[test]
    fn test_inverted_flips_predicates_only() {
        let mut nfa = Nfa::new(0, [2].into_iter().collect());
        nfa.add_transition(0, Label::predicate(uri("http://example.org/p")), 1);
        nfa.add_transition(1, Label::Epsilon, 2);

        let inverted = nfa.inverted();
        assert_eq!(inverted.initial(), 0);
        assert_eq!(inverted.finals(), nfa.finals());
        assert_eq!(
            inverted.transitions(0)[0].label,
            Label::Predicate {
                iri: uri("http://example.org/p"),
                direction: Direction::Reverse,
            }
        );
        assert_eq!(inverted.transitions(1)[0].label, Label::Epsilon);
    }

    #[test]
    fn test_double_inversion_is_identity() {
        let mut nfa = Nfa::new(0, [2].into_iter().collect());
        nfa.add_transition(0, Label::predicate(uri("http://example.org/p")), 1);
        nfa.add_transition(1, Label::Epsilon, 2);

        let twice = nfa.inverted().inverted();
        assert_eq!(twice.transitions(0), nfa.transitions(0));
        assert_eq!(twice.transitions(1), nfa.transitions(1));
    }

    #[test]
    fn test_validate_rejects_empty_finals() {
        let nfa = Nfa::new(0, FnvHashSet::default());
        assert!(matches!(nfa.validate(), Err(PathError::Internal(_))));
    }

    #[test]
    fn test_validate_rejects_dangling_target() {
        let mut nfa = Nfa::new(0, [1].into_iter().collect());
        nfa.add_transition(0, Label::Epsilon, 9);
        assert!(matches!(nfa.validate(), Err(PathError::Internal(_))));
    }
}
