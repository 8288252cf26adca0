use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Pre-commit hook that blocks commits until the test suite passes.
#[derive(Debug, Parser)]
#[command(name = "commit-gate", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the verification steps; exit non-zero to block the commit
    Run {
        /// Path to the KDL config file (default: .commit-gate.kdl at the repository root)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Install the pre-commit hook into the current repository
    Install {
        /// Config file the installed hook should pass to `run`
        #[arg(long)]
        config: Option<PathBuf>,
        /// Replace an existing hook that commit-gate did not write
        #[arg(long)]
        force: bool,
    },
    /// Remove the pre-commit hook installed by commit-gate
    Uninstall,
    /// Show the steps `run` would execute without running them
    Plan {
        /// Path to the KDL config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    commit_gate::logging::init();

    match cli.command {
        Commands::Run { config } => commit_gate::run_gate(config.as_deref()),
        Commands::Install { config, force } => commit_gate::install_hook(config.as_deref(), force),
        Commands::Uninstall => commit_gate::uninstall_hook(),
        Commands::Plan { config, json } => commit_gate::show_plan(config.as_deref(), json),
    }
}
