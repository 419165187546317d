//! vzdiff CLI
//!
//! Command-line interface for semantic drift detection

use clap::{Parser, Subcommand, ValueEnum};
use vzdiff_core::logging_facility::{self, Profile};

mod commands;

/// Exit status when a command fails before producing a result
const EXIT_ERROR: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "vzdiff")]
#[command(about = "vzdiff - Semantic diff for reconciled objects", long_about = None)]
struct Cli {
    /// Log output style; RUST_LOG overrides the level
    #[arg(long, value_enum, global = true, default_value_t = LogProfile::Development)]
    log_profile: LogProfile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogProfile {
    Development,
    Production,
}

impl From<LogProfile> for Profile {
    fn from(profile: LogProfile) -> Self {
        match profile {
            LogProfile::Development => Profile::Development,
            LogProfile::Production => Profile::Production,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare a reference document against a candidate document
    Compare(commands::compare::CompareArgs),
    /// ISM policy operations
    Policy(commands::policy::PolicyArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile.into());

    let result = match cli.command {
        Commands::Compare(args) => commands::compare::execute(args),
        Commands::Policy(args) => commands::policy::execute(args),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_ERROR);
        }
    }
}
