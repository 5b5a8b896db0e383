//! Error taxonomy for property-path evaluation
//!
//! Parser and compiler failures surface before any graph access; graph
//! failures abort an in-flight search and discard partial results. An
//! empty result set is a legitimate outcome, never an error.

use crate::graph::GraphError;

/// Errors produced while parsing, compiling, or evaluating a property path
#[derive(Debug, Clone, thiserror::Error)]
pub enum PathError {
    /// Ungrammatical path expression
    #[error("syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// Prefixed name whose prefix has no namespace binding
    #[error("undefined prefix: {prefix}")]
    UnknownPrefix { prefix: String },

    /// IRI that does not match the reference grammar
    #[error("malformed IRI: {iri}")]
    MalformedIri { iri: String },

    /// Adapter-layer failure
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Automaton invariant violation; indicates a compiler bug
    #[error("automaton invariant violated: {0}")]
    Internal(String),
}

impl PathError {
    /// Create a syntax error at a byte position in the expression
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        PathError::Syntax {
            position,
            message: message.into(),
        }
    }
}

/// A Result type using [`PathError`]
pub type PathResult<T> = Result<T, PathError>;
