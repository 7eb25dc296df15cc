//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::commands::codes::CodesArgs;
use crate::cli::commands::config::ConfigArgs;
use crate::cli::commands::run::RunArgs;

#[derive(Parser, Debug)]
#[command(name = "bler-sweep")]
#[command(about = "Adaptive Monte Carlo BLER sweeps for error-correcting codes", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./bler-sweep.yaml when present)
    #[arg(short, long, global = true, env = "BLER_SWEEP_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the BLER sweep for every configured combination
    Run(RunArgs),

    /// List the built-in code structures
    Codes(CodesArgs),

    /// Print the effective configuration
    Config(ConfigArgs),
}
