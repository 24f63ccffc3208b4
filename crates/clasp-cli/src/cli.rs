//! CLI argument definitions for Clasp.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "clasp",
    version,
    about = "A dependency resolver and classpath builder for JVM libraries",
    long_about = "Clasp reads deps.toml, resolves the transitive dependency graph \
                  against a local artifact repository, and prints trees or classpaths."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved dependency tree
    Tree {
        #[command(flatten)]
        resolve: ResolveOpts,
    },

    /// Print the classpath for the resolved dependencies
    Classpath {
        #[command(flatten)]
        resolve: ResolveOpts,
    },
}

/// Options shared by every resolving command.
#[derive(Args, Debug, Default)]
pub struct ResolveOpts {
    /// Aliases to apply, in order
    #[arg(short = 'A', long = "alias")]
    pub aliases: Vec<String>,

    /// Path to the deps manifest (default: nearest deps.toml)
    #[arg(long)]
    pub deps_file: Option<PathBuf>,

    /// Worker pool size (default: host CPU count)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Write an include-decision trace to trace.json
    #[arg(long)]
    pub trace: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
