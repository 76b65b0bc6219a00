//! CLI module for sage
//!
//! Provides command-line interface parsing for the sage binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sage - question answering over a startup-essay corpus
///
/// Ingests a fixed corpus of essays into a local vector index and answers
/// founder questions against it with cited sources and a confidence score.
#[derive(Parser, Debug)]
#[command(
    name = "sage",
    version,
    about = "sage - startup advice grounded in an essay corpus",
    long_about = "Ingests a corpus of startup essays into a local vector index, then answers\n\
                  questions against it: retrieval, context assembly, LLM generation, and\n\
                  deterministic confidence scoring with cited sources.",
    after_help = "EXAMPLES:\n    \
                  sage ingest                              # Build the vector index from the corpus\n    \
                  sage query \"How do I find startup ideas?\"  # Ask with the quality model\n    \
                  sage query --fast \"What is growth?\"       # Ask with the cheaper, faster model\n    \
                  sage info                                # Show corpus and index statistics"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "sage.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest the essay corpus and build the vector index
    ///
    /// Reads the configured essays JSON, chunks and embeds every document,
    /// and persists the resulting index for query-time use.
    Ingest,

    /// Ask a question against the ingested corpus
    Query {
        /// The question to answer
        question: String,

        /// Use the cheaper, lower-latency model instead of the quality model
        #[arg(long)]
        fast: bool,
    },

    /// Show configuration and index statistics
    Info,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
