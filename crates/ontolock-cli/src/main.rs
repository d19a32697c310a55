//! Ontolock CLI
//!
//! Command-line interface for reviewing and approving API surface changes

use clap::{Parser, Subcommand};

mod commands;
mod prompt;

#[derive(Debug, Parser)]
#[command(name = "ontolock")]
#[command(about = "Ontolock - change control for the security-relevant API surface", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the content hash of the live API surface
    Hash(commands::hash::HashArgs),
    /// Show the diff between the approved and the live surface
    Diff(commands::diff::DiffArgs),
    /// Print pending changes; exit 1 if there are any
    Check(commands::check::CheckArgs),
    /// Review pending changes and write the lock on approval
    Approve(commands::approve::ApproveArgs),
    /// Process-start gate: exit 2 if the surface is not approved in production
    Gate(commands::gate::GateArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Hash(args) => commands::hash::execute(args),
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Check(args) => commands::check::execute(args),
        Commands::Approve(args) => commands::approve::execute(args),
        Commands::Gate(args) => commands::gate::execute(args),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(commands::EXIT_FAILURE);
        }
    }
}
