//! Thompson construction of NFAs from path expressions
//!
//! Each operator of the path language maps to one fragment shape. A
//! builder carries the monotonic state-id counter for one compilation;
//! ids are never reused within a compilation, so fragments can be merged
//! without renumbering. No dead states are produced: every state created
//! here is wired into its fragment immediately.

use fnv::FnvHashSet;

use crate::error::PathResult;
use crate::expr::PathExpr;
use crate::term::Uri;

use super::{Label, Nfa, StateId};

/// Compile a path expression into a validated NFA
///
/// Every call allocates a fresh builder, so state numbering restarts at
/// zero and no compilation state outlives the call.
pub fn compile(expr: &PathExpr) -> PathResult<Nfa> {
    let mut builder = AutomatonBuilder::new();
    let nfa = builder.compile(expr);
    nfa.validate()?;
    Ok(nfa)
}

/// Fragment constructor with a per-compilation state-id counter
#[derive(Debug, Default)]
pub struct AutomatonBuilder {
    next_state_id: StateId,
}

impl AutomatonBuilder {
    /// Create a builder with state numbering starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    fn new_state(&mut self) -> StateId {
        let id = self.next_state_id;
        self.next_state_id += 1;
        id
    }

    /// Translate an expression tree into an NFA fragment
    pub fn compile(&mut self, expr: &PathExpr) -> Nfa {
        match expr {
            PathExpr::Predicate(iri) => self.from_predicate(iri.clone()),
            PathExpr::Inverse(inner) => self.compile(inner).inverted(),
            PathExpr::Sequence(left, right) => {
                let a = self.compile(left);
                let b = self.compile(right);
                self.sequence(a, b)
            }
            PathExpr::Alternative(left, right) => {
                let a = self.compile(left);
                let b = self.compile(right);
                self.alternative(a, b)
            }
            PathExpr::ZeroOrMore(inner) => {
                let a = self.compile(inner);
                self.zero_or_more(a)
            }
            PathExpr::OneOrMore(inner) => {
                let a = self.compile(inner);
                self.one_or_more(a)
            }
            PathExpr::ZeroOrOne(inner) => {
                let a = self.compile(inner);
                self.zero_or_one(a)
            }
            PathExpr::Group(inner) => self.compile(inner),
        }
    }

    /// `(start) --p--> (final)`
    fn from_predicate(&mut self, iri: Uri) -> Nfa {
        let start = self.new_state();
        let end = self.new_state();

        let mut nfa = Nfa::new(start, single(end));
        nfa.add_transition(start, Label::predicate(iri), end);
        nfa
    }

    /// `a / b`: ε from every final of `a` to the initial of `b`
    fn sequence(&mut self, a: Nfa, b: Nfa) -> Nfa {
        let mut result = Nfa::new(a.initial, b.finals.clone());
        let a_finals: Vec<StateId> = a.finals.iter().copied().collect();
        let b_initial = b.initial;

        result.absorb(a);
        result.absorb(b);

        for final_a in a_finals {
            result.add_transition(final_a, Label::Epsilon, b_initial);
        }

        result
    }

    /// `a | b`: fresh initial with ε into both branches; finals are the
    /// union of both branches' finals
    fn alternative(&mut self, a: Nfa, b: Nfa) -> Nfa {
        let start = self.new_state();
        let finals: FnvHashSet<StateId> = a.finals.union(&b.finals).copied().collect();

        let mut result = Nfa::new(start, finals);
        let a_initial = a.initial;
        let b_initial = b.initial;

        result.absorb(a);
        result.absorb(b);

        result.add_transition(start, Label::Epsilon, a_initial);
        result.add_transition(start, Label::Epsilon, b_initial);

        result
    }

    /// `a*`: fresh initial and final; the empty walk bypasses `a`, and
    /// every final of `a` loops back to its initial
    fn zero_or_more(&mut self, a: Nfa) -> Nfa {
        let start = self.new_state();
        let end = self.new_state();

        let mut result = Nfa::new(start, single(end));
        let a_initial = a.initial;
        let a_finals: Vec<StateId> = a.finals.iter().copied().collect();

        result.absorb(a);

        result.add_transition(start, Label::Epsilon, a_initial);
        result.add_transition(start, Label::Epsilon, end);

        for final_a in a_finals {
            result.add_transition(final_a, Label::Epsilon, a_initial);
            result.add_transition(final_a, Label::Epsilon, end);
        }

        result
    }

    /// `a+`: one mandatory pass through `a`, then the same loop as `a*`
    fn one_or_more(&mut self, a: Nfa) -> Nfa {
        let end = self.new_state();

        let mut result = Nfa::new(a.initial, single(end));
        let a_initial = a.initial;
        let a_finals: Vec<StateId> = a.finals.iter().copied().collect();

        result.absorb(a);

        for final_a in a_finals {
            result.add_transition(final_a, Label::Epsilon, a_initial);
            result.add_transition(final_a, Label::Epsilon, end);
        }

        result
    }

    /// `a?`: fresh initial with ε into `a` and ε directly to every final
    fn zero_or_one(&mut self, a: Nfa) -> Nfa {
        let start = self.new_state();

        let mut result = Nfa::new(start, a.finals.clone());
        let a_initial = a.initial;
        let a_finals: Vec<StateId> = a.finals.iter().copied().collect();

        result.absorb(a);

        result.add_transition(start, Label::Epsilon, a_initial);

        for final_a in a_finals {
            result.add_transition(start, Label::Epsilon, final_a);
        }

        result
    }
}

fn single(state: StateId) -> FnvHashSet<StateId> {
    let mut set = FnvHashSet::default();
    set.insert(state);
    set
}
