use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "lead-sync")]
#[command(about = "Run the lead registration and HubSpot sync handlers locally")]
pub struct CliConfig {
    /// TOML config file; the environment is used when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Register a lead from a JSON submission
    Register {
        #[arg(long)]
        payload: PathBuf,
    },
    /// Push a stored lead to HubSpot again
    Sync {
        #[arg(long)]
        payload: PathBuf,
    },
}
