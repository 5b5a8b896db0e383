//! N-Triples graph loading
//!
//! Parses the line-oriented N-Triples subset the CLI consumes: one triple
//! per line, IRI or literal objects, language tags and datatypes on
//! literals, `#` comments, and blank lines. Blank nodes are rejected —
//! the path engine has no blank-node semantics.

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, opt, value},
    sequence::{delimited, preceded},
    IResult,
};

use crate::graph::Triple;
use crate::term::{Term, Uri};

/// Graph file parsing error
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("unsupported construct on line {line}: {construct}")]
    Unsupported { line: usize, construct: String },
}

/// Parse an N-Triples document into triples
///
/// Triples keep document order. Comment-only and blank lines are skipped.
pub fn parse_ntriples(input: &str) -> Result<Vec<Triple>, ParseError> {
    let mut triples = Vec::new();

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match triple_line(trimmed) {
            Ok((rest, triple)) if rest.trim().is_empty() => triples.push(triple),
            Ok((rest, _)) => {
                return Err(ParseError::Syntax {
                    line,
                    message: format!("trailing content after '.': {}", rest.trim()),
                });
            }
            // Literals containing "_:" parse fine and never reach here.
            Err(_) if trimmed.contains("_:") => {
                return Err(ParseError::Unsupported {
                    line,
                    construct: "blank node".into(),
                });
            }
            Err(_) => {
                return Err(ParseError::Syntax {
                    line,
                    message: format!("expected '<subject> <predicate> <object> .', got: {}", trimmed),
                });
            }
        }
    }

    Ok(triples)
}

fn triple_line(input: &str) -> IResult<&str, Triple> {
    let (input, subject) = preceded(multispace0, iri_ref)(input)?;
    let (input, predicate) = preceded(multispace0, iri_ref)(input)?;
    let (input, object) = preceded(multispace0, object)(input)?;
    let (input, _) = preceded(multispace0, char('.'))(input)?;
    Ok((input, Triple::new(subject, predicate, object)))
}

fn iri_ref(input: &str) -> IResult<&str, Uri> {
    map(
        delimited(char('<'), take_while1(|c| c != '>'), char('>')),
        Uri::from,
    )(input)
}

fn object(input: &str) -> IResult<&str, Term> {
    alt((map(iri_ref, Term::from_uri), literal))(input)
}

fn literal(input: &str) -> IResult<&str, Term> {
    let (input, body) = delimited(char('"'), opt(string_body), char('"'))(input)?;
    let body = body.unwrap_or_default();

    let (input, lang) = opt(preceded(
        char('@'),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-'),
    ))(input)?;
    if let Some(lang) = lang {
        return Ok((input, Term::lang_literal(body, lang)));
    }

    let (input, datatype) = opt(preceded(tag("^^"), iri_ref))(input)?;
    let term = match datatype {
        Some(dt) => Term::typed_literal(body, dt.as_str()),
        None => Term::literal(body),
    };
    Ok((input, term))
}

fn string_body(input: &str) -> IResult<&str, String> {
    escaped_transform(
        take_while1(|c| c != '"' && c != '\\'),
        '\\',
        alt((
            value("\"", char('"')),
            value("\\", char('\\')),
            value("\n", char('n')),
            value("\t", char('t')),
        )),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_triple() {
        let triples = parse_ntriples(
            "<http://ex.org/a> <http://ex.org/knows> <http://ex.org/b> .\n",
        )
        .unwrap();

        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject.as_str(), "http://ex.org/a");
        assert_eq!(triples[0].predicate.as_str(), "http://ex.org/knows");
        assert_eq!(triples[0].object, Term::uri("http://ex.org/b"));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let input = "\n# a comment\n<http://ex.org/a> <http://ex.org/p> <http://ex.org/b> .\n\n";
        assert_eq!(parse_ntriples(input).unwrap().len(), 1);
    }

    #[test]
    fn test_plain_literal_object() {
        let triples =
            parse_ntriples("<http://ex.org/a> <http://ex.org/name> \"Ada\" .").unwrap();
        assert_eq!(triples[0].object, Term::literal("Ada"));
    }

    #[test]
    fn test_language_tagged_literal() {
        let triples =
            parse_ntriples("<http://ex.org/a> <http://ex.org/name> \"Ada\"@en .").unwrap();
        assert_eq!(triples[0].object, Term::lang_literal("Ada", "en"));
    }

    #[test]
    fn test_typed_literal() {
        let input = "<http://ex.org/a> <http://ex.org/age> \"36\"^^<http://www.w3.org/2001/XMLSchema#integer> .";
        let triples = parse_ntriples(input).unwrap();
        assert_eq!(
            triples[0].object,
            Term::typed_literal("36", "http://www.w3.org/2001/XMLSchema#integer")
        );
    }

    #[test]
    fn test_escapes_in_literal() {
        let triples = parse_ntriples(
            r#"<http://ex.org/a> <http://ex.org/note> "line\none\ttab \"quoted\"" ."#,
        )
        .unwrap();
        assert_eq!(
            triples[0].object,
            Term::literal("line\none\ttab \"quoted\"")
        );
    }

    #[test]
    fn test_empty_literal() {
        let triples =
            parse_ntriples("<http://ex.org/a> <http://ex.org/name> \"\" .").unwrap();
        assert_eq!(triples[0].object, Term::literal(""));
    }

    #[test]
    fn test_document_order_preserved() {
        let input = "<http://ex.org/a> <http://ex.org/p> <http://ex.org/b> .\n\
                     <http://ex.org/a> <http://ex.org/p> <http://ex.org/c> .\n";
        let triples = parse_ntriples(input).unwrap();
        assert_eq!(triples[0].object, Term::uri("http://ex.org/b"));
        assert_eq!(triples[1].object, Term::uri("http://ex.org/c"));
    }

    #[test]
    fn test_missing_dot_is_error() {
        let result = parse_ntriples("<http://ex.org/a> <http://ex.org/p> <http://ex.org/b>");
        match result {
            Err(ParseError::Syntax { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_reports_line_number() {
        let input = "<http://ex.org/a> <http://ex.org/p> <http://ex.org/b> .\nnot a triple\n";
        match parse_ntriples(input) {
            Err(ParseError::Syntax { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_node_rejected() {
        let result = parse_ntriples("_:b1 <http://ex.org/p> <http://ex.org/b> .");
        assert!(matches!(result, Err(ParseError::Unsupported { .. })));
    }
}
