//! lilgraph CLI - check, format and rank lilgraph files
//!
//! Usage:
//!   lilgraph check <file>           # Parse and validate, print counts
//!   lilgraph fmt <file> [--write]   # Print (or write back) the canonical form
//!   lilgraph topo <file>            # Print node ids in topological order
//!   lilgraph ast <file>             # Print the raw AST as JSON

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use lilgraph_core::{parse_file, GraphError};
use tracing_subscriber::EnvFilter;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "lilgraph")]
#[command(version)]
#[command(about = "lilgraph - a tiny text format for typed, attributed graphs")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins if set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and build a file, then print node and edge counts
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the canonical form of a file
    Fmt {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Rewrite the file in place instead of printing
        #[arg(short, long)]
        write: bool,
    },
    /// Print node ids in topological order, one per line
    Topo {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the parsed AST as JSON
    Ast {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Command::Check { file } => check(file),
        Command::Fmt { file, write } => fmt(file, *write),
        Command::Topo { file } => topo(file),
        Command::Ast { file } => ast(file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn check(file: &Path) -> CliResult {
    let graph = parse_file(file)?;
    println!(
        "✓ {}: {} nodes, {} edges",
        file.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(())
}

fn fmt(file: &Path, write: bool) -> CliResult {
    let graph = parse_file(file)?;
    let text = graph.marshal_text();
    if write {
        std::fs::write(file, &text).map_err(|source| GraphError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        tracing::info!(file = %file.display(), bytes = text.len(), "rewrote file");
    } else {
        print!("{graph}");
    }
    Ok(())
}

fn topo(file: &Path) -> CliResult {
    let mut graph = parse_file(file)?;
    graph.sort_topo()?;
    for node in graph.nodes() {
        println!("{}", node.id());
    }
    Ok(())
}

fn ast(file: &Path) -> CliResult {
    let source = std::fs::read_to_string(file).map_err(|source| GraphError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    let name = file.display().to_string();
    let ast = lilgraph_frontend::parse_graph_with_file(&source, Some(&name))?;
    println!("{}", serde_json::to_string_pretty(&ast)?);
    Ok(())
}
