//! KIMBALL CLI - dimensional modeling for bronze-layer tables.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            dir,
            output,
            config,
            threshold,
        } => commands::analyze::run(dir, output, config, threshold, cli.verbose),

        Commands::Infer {
            column,
            values,
            json,
        } => commands::infer::run(column, values, json),

        Commands::Status { file, json } => commands::status::run(file, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so JSON on stdout stays clean. `RUST_LOG` overrides the default.
fn init_logging(verbose: bool) {
    let default = if verbose { "kimball=debug" } else { "kimball=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
