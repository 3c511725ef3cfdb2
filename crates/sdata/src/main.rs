//! sdata CLI - structured data annotation engine.
//!
//! Provides commands for:
//! - `annotate`: Rewrite `data-sd` directives in HTML files
//! - `inspect`: Show a vocabulary type or property
//! - `types`: List vocabulary types

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AnnotateArgs, InspectArgs, TypesArgs};
use output::Output;

/// sdata - Microdata and RDFa annotation for HTML.
#[derive(Parser)]
#[command(name = "sdata", version, about)]
struct Cli {
    /// Enable verbose output (per-document logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite directive attributes into structured data markup.
    Annotate(AnnotateArgs),
    /// Show the inheritance chain and properties of a type.
    Inspect(InspectArgs),
    /// List vocabulary types.
    Types(TypesArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Annotate(args) => args.execute(),
        Commands::Inspect(args) => args.execute(),
        Commands::Types(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
