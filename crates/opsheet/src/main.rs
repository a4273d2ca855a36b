//! opsheet CLI - Operator cheatsheet generator.
//!
//! Provides commands for:
//! - `build`: Render the cheatsheet page from section documents

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::BuildArgs;
use output::Output;

/// opsheet - Operator cheatsheet generator.
#[derive(Parser)]
#[command(name = "opsheet", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the cheatsheet page.
    Build(BuildArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Build(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
    };

    if let Err(err) = result {
        output.failed(&err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_args() {
        let cli = Cli::try_parse_from([
            "opsheet",
            "build",
            "cheatsheet.html",
            "--tag",
            "v4.0.0",
            "--escape-html",
            "-v",
        ])
        .unwrap();

        let Commands::Build(args) = cli.command;
        assert!(args.verbose);
    }

    #[test]
    fn test_build_requires_output() {
        assert!(Cli::try_parse_from(["opsheet", "build"]).is_err());
    }
}
