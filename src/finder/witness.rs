//! Path witnesses and their row serialization
//!
//! A witness is a concrete walk through the graph: the visited nodes and
//! the edges between them. Witnesses flatten into one row per step for
//! row-oriented consumers; the JSON rendering follows the SPARQL results
//! document shape.

use std::fmt;

use crate::automaton::Direction;
use crate::term::uri::ns;
use crate::term::{Datatype, Term, Uri};

/// One traversed edge: the predicate and the direction it was walked
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Step {
    pub predicate: Uri,
    pub direction: Direction,
}

impl Step {
    /// A forward step over `predicate`
    pub fn forward(predicate: Uri) -> Self {
        Step {
            predicate,
            direction: Direction::Forward,
        }
    }

    /// A reverse step over `predicate`
    pub fn reverse(predicate: Uri) -> Self {
        Step {
            predicate,
            direction: Direction::Reverse,
        }
    }
}

/// A concrete walk through the graph
///
/// Invariant: `nodes.len() == steps.len() + 1`. A witness with no steps
/// is the trivial single-node walk. Extension copies; witnesses share no
/// mutable state.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PathWitness {
    nodes: Vec<Term>,
    steps: Vec<Step>,
}

impl PathWitness {
    /// The trivial witness at `origin`, no edges walked yet
    pub fn start(origin: Term) -> Self {
        PathWitness {
            nodes: vec![origin],
            steps: Vec::new(),
        }
    }

    /// A new witness extending this one by a single step
    pub fn extend(&self, step: Step, node: Term) -> Self {
        let mut nodes = self.nodes.clone();
        nodes.push(node);
        let mut steps = self.steps.clone();
        steps.push(step);
        PathWitness { nodes, steps }
    }

    /// The visited nodes, origin first
    pub fn nodes(&self) -> &[Term] {
        &self.nodes
    }

    /// The traversed edges, in walk order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of edges walked
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if this is the trivial single-node witness
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The first node
    pub fn origin(&self) -> &Term {
        &self.nodes[0]
    }

    /// The last node
    pub fn destination(&self) -> &Term {
        self.nodes.last().expect("witness has at least one node")
    }
}

impl fmt::Display for PathWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", short(&self.nodes[0]))?;
        for (i, step) in self.steps.iter().enumerate() {
            let marker = match step.direction {
                Direction::Forward => "",
                Direction::Reverse => "^",
            };
            write!(
                f,
                " --[{}{}]--> ({})",
                marker,
                step.predicate.local_name(),
                short(&self.nodes[i + 1])
            )?;
        }
        Ok(())
    }
}

impl fmt::Debug for PathWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Compact node rendering for the arrow display
fn short(term: &Term) -> String {
    match term {
        Term::Uri(uri) => uri.local_name().to_string(),
        Term::Literal(lit) => format!("\"{}\"", lit.value()),
    }
}

/// One row of the flattened witness table
///
/// `predicate` is `None` on the origin row (`step_index` 0) and the IRI
/// traversed into `node` on every later row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessRow {
    pub path_id: usize,
    pub step_index: usize,
    pub predicate: Option<Uri>,
    pub node: Term,
}

/// Flatten witnesses into rows, one per node per witness
///
/// Path ids are assigned in emission order starting at zero.
pub fn witness_rows(witnesses: &[PathWitness]) -> Vec<WitnessRow> {
    let mut rows = Vec::new();

    for (path_id, witness) in witnesses.iter().enumerate() {
        for (step_index, node) in witness.nodes().iter().enumerate() {
            let predicate = if step_index > 0 {
                Some(witness.steps()[step_index - 1].predicate.clone())
            } else {
                None
            };
            rows.push(WitnessRow {
                path_id,
                step_index,
                predicate,
                node: node.clone(),
            });
        }
    }

    rows
}

/// Render rows as a JSON document in SPARQL-results style
pub fn format_rows_json(rows: &[WitnessRow]) -> String {
    let mut output = String::new();
    output.push_str("{\n");
    output.push_str("  \"head\": {\n");
    output.push_str("    \"vars\": [\"pathId\", \"stepIndex\", \"predicate\", \"node\"]\n");
    output.push_str("  },\n");
    output.push_str("  \"results\": {\n");
    output.push_str("    \"bindings\": [\n");

    for (i, row) in rows.iter().enumerate() {
        output.push_str("      {\n");
        output.push_str(&format!(
            "        \"pathId\": {},\n",
            format_integer_json(row.path_id)
        ));
        output.push_str(&format!(
            "        \"stepIndex\": {},\n",
            format_integer_json(row.step_index)
        ));
        if let Some(predicate) = &row.predicate {
            output.push_str(&format!(
                "        \"predicate\": {{ \"type\": \"uri\", \"value\": \"{}\" }},\n",
                escape_json(predicate.as_str())
            ));
        }
        output.push_str(&format!(
            "        \"node\": {}\n",
            format_term_json(&row.node)
        ));
        output.push_str("      }");
        if i < rows.len() - 1 {
            output.push(',');
        }
        output.push('\n');
    }

    output.push_str("    ]\n");
    output.push_str("  }\n");
    output.push_str("}\n");
    output
}

fn format_integer_json(value: usize) -> String {
    format!(
        "{{ \"type\": \"literal\", \"value\": \"{}\", \"datatype\": \"{}integer\" }}",
        value,
        ns::XSD
    )
}

fn format_term_json(term: &Term) -> String {
    match term {
        Term::Uri(uri) => format!(
            "{{ \"type\": \"uri\", \"value\": \"{}\" }}",
            escape_json(uri.as_str())
        ),
        Term::Literal(lit) => match lit.datatype() {
            Datatype::Plain => format!(
                "{{ \"type\": \"literal\", \"value\": \"{}\" }}",
                escape_json(lit.value())
            ),
            Datatype::Language(lang) => format!(
                "{{ \"type\": \"literal\", \"value\": \"{}\", \"xml:lang\": \"{}\" }}",
                escape_json(lit.value()),
                lang
            ),
            Datatype::Typed(dt) => format!(
                "{{ \"type\": \"literal\", \"value\": \"{}\", \"datatype\": \"{}\" }}",
                escape_json(lit.value()),
                escape_json(dt)
            ),
        },
    }
}

fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
}
