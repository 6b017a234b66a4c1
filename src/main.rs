//! Pyoutline CLI entry point.

use clap::Parser;
use pyoutline::cli::{self, Cli, Commands, EXIT_FAILED};

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Analyze(args) => match cli::run_analyze(&args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_FAILED
            }
        },
        Commands::Outline(args) => match cli::run_outline(&args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_FAILED
            }
        },
        Commands::Report(args) => match cli::run_report(&args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_FAILED
            }
        },
    };

    std::process::exit(exit_code);
}
