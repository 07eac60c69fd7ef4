use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command line interface configuration using `clap`.
/// This struct defines the arguments and flags accepted by the program.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Function listings to scan (files or directories).
    /// Directories are walked for `*.json` listing files.
    /// When no paths are provided, defaults to the current directory.
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Minimum blocks a reported class must span.
    #[arg(long)]
    pub min_size: Option<usize>,

    /// Require the head block's first bytes to lie inside the matched
    /// subgraph.
    #[arg(long)]
    pub min_head_size: Option<u64>,

    /// Output raw JSON.
    #[arg(long)]
    pub json: bool,

    /// Write the textual class report to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Write one matcher state file per function into this directory.
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Helper enum for the available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find the subgraphs matched with one containing the given blocks
    Similar {
        /// Listing file to analyze
        listing: PathBuf,

        /// Block ids of the queried subgraph, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        nodes: Vec<u32>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}
