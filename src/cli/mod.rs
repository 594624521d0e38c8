pub mod session;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "journal",
    about = "Reflective journaling companion with mood and theme analysis"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactive journaling session (default)
    Session,
    /// Analyze saved entries and print the mood and theme reports
    Analyze {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Write a single entry without starting a session
    Write { text: String },
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    Ai {
        #[command(subcommand)]
        command: AiCommands,
    },
    Doctor,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    Set { key: String, value: String },
    Get { key: String },
}

#[derive(Debug, Subcommand)]
pub enum AiCommands {
    Test {
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
}
