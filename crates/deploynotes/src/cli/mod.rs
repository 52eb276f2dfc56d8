//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;

use deploynotes_core::config::{load_config, load_config_or_default};
use deploynotes_core::Config;

use commands::{GenerateCommand, InitCommand, ValidateCommand};

/// deploynotes - release notes for the latest Octopus Deploy release
#[derive(Debug, Parser)]
#[command(name = "deploynotes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file (default: search the working directory and its parents)
    #[arg(short, long, global = true, env = "DEPLOYNOTES_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate release notes for the latest deployment
    Generate(GenerateCommand),

    /// Write a default configuration file
    Init(InitCommand),

    /// Validate the configuration
    Validate(ValidateCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Generate(ref cmd) => cmd.execute(&self),
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Validate(ref cmd) => cmd.execute(&self),
        }
    }

    /// Load the explicit config file, or search from `dir` falling back to defaults
    pub fn load_config(&self, dir: &Path) -> anyhow::Result<(Config, Option<PathBuf>)> {
        match &self.config {
            Some(path) => {
                debug!(path = %path.display(), "using explicit config file");
                Ok((load_config(path)?, Some(path.clone())))
            }
            None => Ok(load_config_or_default(dir)?),
        }
    }
}
