//! Property-path expression parser
//!
//! Recursive-descent parser for the textual path language:
//!
//! ```text
//! path       := sequence ('|' sequence)*
//! sequence   := inverse ('/' inverse)*
//! inverse    := '^' inverse | element
//! element    := primary ('*' | '+' | '?')?
//! primary    := '<' IRI '>' | prefixedName | '(' path ')'
//! ```
//!
//! Operator precedence is encoded in the grammar: alternatives bind
//! weakest, then sequences, then inversion, then the repetition
//! modifiers. Whitespace outside IRI brackets is insignificant.
//! Prefixed names are expanded through a [`PrefixMap`]; bracketed IRIs
//! must be absolute (start with a scheme).

use indexmap::IndexMap;

use crate::error::{PathError, PathResult};
use crate::term::uri::ns;
use crate::term::Uri;

use super::PathExpr;

/// Prefix-to-namespace bindings used to expand prefixed names
#[derive(Debug, Clone, Default)]
pub struct PrefixMap {
    prefixes: IndexMap<String, String>,
}

impl PrefixMap {
    /// Create an empty prefix map
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a prefix map with the standard namespaces pre-bound
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        map.add("rdf", ns::RDF);
        map.add("rdfs", ns::RDFS);
        map.add("xsd", ns::XSD);
        map.add("foaf", ns::FOAF);
        map
    }

    /// Bind a prefix to a namespace IRI
    pub fn add(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Look up a namespace by prefix
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Expand a prefixed name into a full IRI
    pub fn resolve(&self, prefix: &str, local: &str) -> PathResult<Uri> {
        match self.prefixes.get(prefix) {
            Some(namespace) => Ok(Uri::new(format!("{}{}", namespace, local))),
            None => Err(PathError::UnknownPrefix {
                prefix: prefix.to_string(),
            }),
        }
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Check if no prefixes are bound
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// Parser over a path expression string
pub struct PathParser<'a> {
    input: &'a str,
    pos: usize,
    prefixes: &'a PrefixMap,
}

impl<'a> PathParser<'a> {
    /// Create a parser for `input` resolving prefixes through `prefixes`
    pub fn new(input: &'a str, prefixes: &'a PrefixMap) -> Self {
        PathParser {
            input,
            pos: 0,
            prefixes,
        }
    }

    /// Parse the full expression; trailing input is an error
    pub fn parse(mut self) -> PathResult<PathExpr> {
        let expr = self.parse_path()?;
        self.skip_whitespace();
        match self.current_char() {
            None => Ok(expr),
            Some(c) => Err(PathError::syntax(
                self.pos,
                format!("unexpected character '{}'", c),
            )),
        }
    }

    /// path := sequence ('|' sequence)*
    fn parse_path(&mut self) -> PathResult<PathExpr> {
        let mut expr = self.parse_sequence()?;

        loop {
            self.skip_whitespace();
            if self.current_char() == Some('|') {
                self.bump();
                let right = self.parse_sequence()?;
                expr = PathExpr::Alternative(Box::new(expr), Box::new(right));
            } else {
                return Ok(expr);
            }
        }
    }

    /// sequence := inverse ('/' inverse)*
    fn parse_sequence(&mut self) -> PathResult<PathExpr> {
        let mut expr = self.parse_inverse()?;

        loop {
            self.skip_whitespace();
            if self.current_char() == Some('/') {
                self.bump();
                let right = self.parse_inverse()?;
                expr = PathExpr::Sequence(Box::new(expr), Box::new(right));
            } else {
                return Ok(expr);
            }
        }
    }

    /// inverse := '^' inverse | element
    fn parse_inverse(&mut self) -> PathResult<PathExpr> {
        self.skip_whitespace();
        if self.current_char() == Some('^') {
            self.bump();
            let inner = self.parse_inverse()?;
            Ok(PathExpr::Inverse(Box::new(inner)))
        } else {
            self.parse_element()
        }
    }

    /// element := primary ('*' | '+' | '?')?
    fn parse_element(&mut self) -> PathResult<PathExpr> {
        let primary = self.parse_primary()?;

        self.skip_whitespace();
        let expr = match self.current_char() {
            Some('*') => {
                self.bump();
                PathExpr::ZeroOrMore(Box::new(primary))
            }
            Some('+') => {
                self.bump();
                PathExpr::OneOrMore(Box::new(primary))
            }
            Some('?') => {
                self.bump();
                PathExpr::ZeroOrOne(Box::new(primary))
            }
            _ => primary,
        };
        Ok(expr)
    }

    /// primary := '<' IRI '>' | '(' path ')' | prefixedName
    fn parse_primary(&mut self) -> PathResult<PathExpr> {
        self.skip_whitespace();
        match self.current_char() {
            Some('<') => {
                let iri = self.parse_bracketed_iri()?;
                Ok(PathExpr::Predicate(iri))
            }
            Some('(') => {
                self.bump();
                let inner = self.parse_path()?;
                self.skip_whitespace();
                if self.current_char() == Some(')') {
                    self.bump();
                    Ok(PathExpr::Group(Box::new(inner)))
                } else {
                    Err(PathError::syntax(self.pos, "expected ')'"))
                }
            }
            Some(_) => {
                let iri = self.parse_prefixed_name()?;
                Ok(PathExpr::Predicate(iri))
            }
            None => Err(PathError::syntax(
                self.pos,
                "expected IRI, prefixed name, or '('",
            )),
        }
    }

    /// `<...>` — the body must be an absolute IRI
    fn parse_bracketed_iri(&mut self) -> PathResult<Uri> {
        let input = self.input;
        self.bump(); // consume '<'
        let start = self.pos;
        while let Some(c) = self.current_char() {
            if c == '>' {
                let iri = &input[start..self.pos];
                self.bump();
                if iri.is_empty() || !has_scheme(iri) {
                    return Err(PathError::MalformedIri {
                        iri: iri.to_string(),
                    });
                }
                return Ok(Uri::from(iri));
            }
            self.bump();
        }
        Err(PathError::syntax(self.pos, "unterminated IRI, expected '>'"))
    }

    /// `prefix:localName` — the prefix may be empty, the local name too
    fn parse_prefixed_name(&mut self) -> PathResult<Uri> {
        let input = self.input;
        let start = self.pos;
        while let Some(c) = self.current_char() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        let prefix = &input[start..self.pos];

        if self.current_char() != Some(':') {
            return Err(PathError::syntax(
                start,
                "expected IRI, prefixed name, or '('",
            ));
        }
        self.bump(); // consume ':'

        let local_start = self.pos;
        while let Some(c) = self.current_char() {
            if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' {
                self.bump();
            } else {
                break;
            }
        }
        let local = &input[local_start..self.pos];

        self.prefixes.resolve(prefix, local)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.current_char() {
            self.pos += c.len_utf8();
        }
    }
}

/// Check for an RFC 3986 scheme: `ALPHA (ALPHA / DIGIT / "+" / "-" / ".")* ":"`
fn has_scheme(iri: &str) -> bool {
    let mut chars = iri.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    for c in chars {
        if c == ':' {
            return true;
        }
        if !c.is_ascii_alphanumeric() && c != '+' && c != '-' && c != '.' {
            return false;
        }
    }
    false
}
