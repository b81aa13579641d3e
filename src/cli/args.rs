//! CLI argument definitions using clap
//!
//! Commands:
//! - regform validate
//! - regform submit --config <path>
//! - regform show --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// regform - registration form core
#[derive(Parser, Debug)]
#[command(name = "regform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a draft read from stdin without storing it
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./regform.json")]
        config: PathBuf,
    },

    /// Submit a draft read from stdin to the local registry
    Submit {
        /// Path to configuration file
        #[arg(long, default_value = "./regform.json")]
        config: PathBuf,
    },

    /// Print the last stored registration
    Show {
        /// Path to configuration file
        #[arg(long, default_value = "./regform.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
