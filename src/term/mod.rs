//! RDF term representations
//!
//! This module defines the node model the path engine operates on:
//! - URIs (named resources) — the only walkable nodes
//! - Literals (with optional datatype or language tag) — terminal
//!   observations; an edge into a literal closes a path branch

use std::fmt;
use std::sync::Arc;

pub mod uri;
mod literal;

pub use literal::{Datatype, Literal};
pub use uri::Uri;

/// A node in an RDF graph
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A URI reference (named node)
    Uri(Arc<Uri>),
    /// A literal value
    Literal(Arc<Literal>),
}

impl Term {
    /// Create a URI term
    pub fn uri(s: impl Into<String>) -> Self {
        Term::Uri(Arc::new(Uri::new(s.into())))
    }

    /// Wrap an existing URI as a term
    pub fn from_uri(uri: Uri) -> Self {
        Term::Uri(Arc::new(uri))
    }

    /// Create a plain literal
    pub fn literal(s: impl Into<String>) -> Self {
        Term::Literal(Arc::new(Literal::plain(s.into())))
    }

    /// Create a typed literal
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal(Arc::new(Literal::typed(value.into(), datatype.into())))
    }

    /// Create a language-tagged literal
    pub fn lang_literal(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Term::Literal(Arc::new(Literal::with_language(value.into(), lang.into())))
    }

    /// Check if this term is a named resource (walkable)
    pub fn is_resource(&self) -> bool {
        matches!(self, Term::Uri(_))
    }

    /// Get the URI if this is a URI term
    pub fn as_uri(&self) -> Option<&Uri> {
        match self {
            Term::Uri(u) => Some(u),
            Term::Literal(_) => None,
        }
    }

    /// Get the literal if this is a literal term
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(l) => Some(l),
            Term::Uri(_) => None,
        }
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Uri(u) => write!(f, "<{}>", u.as_str()),
            Term::Literal(l) => write!(f, "{:?}", l),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Uri(u) => write!(f, "<{}>", u.as_str()),
            Term::Literal(l) => write!(f, "{}", l),
        }
    }
}
