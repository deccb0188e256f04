//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// KIMBALL: dimensional model recommendations for untyped tables
#[derive(Parser)]
#[command(name = "kimball")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a directory of bronze-layer files and recommend a model
    Analyze {
        /// Directory of CSV/TSV files, one table per file
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output path for the model build (default: <DIR>/kimball_model.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Minimum relationship confidence (0.0-1.0)
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Infer the type and classification of a single column
    Infer {
        /// Column name
        #[arg(value_name = "COLUMN")]
        column: String,

        /// Sample values
        #[arg(value_name = "VALUES", required = true)]
        values: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize a saved model build
    Status {
        /// Path to a model build JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
