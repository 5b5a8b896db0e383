//! rdfpath — property-path search over RDF graphs
//!
//! Command-line interface: load an N-Triples graph, evaluate one
//! property-path expression from a start node, print the witnesses.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use rdfpath::{
    find_paths_with_config, format_rows_json, parse_ntriples, witness_rows, MemoryGraph,
    RdfPathConfig,
};

#[derive(Parser)]
#[command(name = "rdfpath")]
#[command(version)]
#[command(about = "Find the concrete paths matching a property-path expression in an RDF graph", long_about = None)]
struct Cli {
    /// N-Triples graph file
    #[arg(value_name = "GRAPH_FILE")]
    graph: PathBuf,

    /// Start node IRI
    #[arg(short, long, value_name = "IRI")]
    start: String,

    /// Property-path expression (e.g. "foaf:knows+/foaf:name?")
    #[arg(short, long, value_name = "EXPRESSION")]
    path: String,

    /// Extra prefix binding, name=namespace (repeatable)
    #[arg(long = "prefix", value_name = "NAME=IRI")]
    prefixes: Vec<String>,

    /// Cap on predicate count per witness
    #[arg(long, value_name = "N")]
    max_length: Option<usize>,

    /// Keep witnesses ending at literal objects
    #[arg(long)]
    include_literals: bool,

    /// Config file (default: ./rdfpath.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print one tab-separated row per step instead of arrows
    #[arg(long)]
    rows: bool,

    /// Print the step rows as a JSON document
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = RdfPathConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    let contents = fs::read_to_string(&cli.graph)
        .with_context(|| format!("failed to read graph file {}", cli.graph.display()))?;
    let triples = parse_ntriples(&contents)
        .with_context(|| format!("failed to parse graph file {}", cli.graph.display()))?;
    if triples.is_empty() {
        bail!("graph file {} contains no triples", cli.graph.display());
    }

    let mut graph = MemoryGraph::new();
    graph.add_all(triples);

    let mut prefixes = config.prefix_map();
    for binding in &cli.prefixes {
        let (name, namespace) = binding
            .split_once('=')
            .with_context(|| format!("invalid prefix binding '{}', expected NAME=IRI", binding))?;
        prefixes.add(name, namespace);
    }

    let mut finder_config = config.finder_config();
    if cli.max_length.is_some() {
        finder_config.max_path_length = cli.max_length;
    }
    if cli.include_literals {
        finder_config.include_literal_endpoints = true;
    }

    let witnesses =
        find_paths_with_config(&cli.start, &cli.path, &prefixes, &graph, finder_config)?;

    if cli.json {
        print!("{}", format_rows_json(&witness_rows(&witnesses)));
        return Ok(());
    }

    if cli.rows {
        for row in witness_rows(&witnesses) {
            let predicate = row
                .predicate
                .map(|p| p.as_str().to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("{}\t{}\t{}\t{}", row.path_id, row.step_index, predicate, row.node);
        }
        return Ok(());
    }

    if witnesses.is_empty() {
        println!("No paths found.");
    } else {
        println!("Found {} path(s):", witnesses.len());
        for (i, witness) in witnesses.iter().enumerate() {
            println!("Path {}: {}", i + 1, witness);
        }
    }

    Ok(())
}
