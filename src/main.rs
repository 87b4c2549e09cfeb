//! classdoc: generate cross-linked reference documentation for PHP classes.
//!
//! Declarations are found by scanning the source roots statically; nothing
//! is executed. One page is written per class, interface and trait, one per
//! visible method, and an index:
//!
//! `classdoc -o docs -s src -e examples`

mod builder;
mod config;
mod error;
mod generate;
mod introspect;
mod model;
mod parser;
mod render;
mod types;
mod xref;

use anyhow::Result;
use clap::Parser;
use config::{Format, GeneratorConfig, VisibilityFilter};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    name = "classdoc",
    about = "Generate reference documentation from PHP classes and their doc comments"
)]
struct Cli {
    /// Output directory (created if missing)
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Source root to document. Can be given multiple times.
    #[arg(short = 's', long = "source", required = true)]
    sources: Vec<PathBuf>,

    /// Directory searched for @example files, in order
    #[arg(short = 'e', long = "examples")]
    examples: Vec<PathBuf>,

    /// Library root: introspected for inheritance, never documented
    #[arg(short = 'l', long = "library")]
    libraries: Vec<PathBuf>,

    /// Project directory; other roots are relative to it
    #[arg(short = 'p', long, default_value = ".")]
    project: PathBuf,

    /// Output format: markdown (default) or html
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Include private members
    #[arg(long)]
    show_private: bool,

    /// Include protected members
    #[arg(long)]
    show_protected: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = GeneratorConfig::new(cli.project, cli.output);
    config.source_roots = cli.sources;
    config.example_roots = cli.examples;
    config.library_roots = cli.libraries;
    config.format = Format::parse(&cli.format)?;
    config.visibility = VisibilityFilter {
        show_private: cli.show_private,
        show_protected: cli.show_protected,
    };

    generate::run(&config)?;
    Ok(())
}
