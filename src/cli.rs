//! Command-line argument parsing for the generator
//!
//! Supports:
//! - `generate` with optional positional roots
//! - An explicit config file
//! - Overriding the artifact directory

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ConfigError, GeneratorConfig};

/// Compile code snippets and example files into a static registry
#[derive(Parser, Debug)]
#[command(
    name = "snippet-registry",
    version,
    about = "Compile code snippets into a static, pre-highlighted registry"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan, highlight and write the registry artifacts
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Directories to scan (replaces the configured roots)
    #[arg(value_name = "ROOTS")]
    pub roots: Vec<PathBuf>,

    /// Config file (default: ./snippet-registry.yaml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory the artifacts are written to
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

impl GenerateArgs {
    /// Load the config file and apply command-line overrides on top
    pub fn into_config(self) -> Result<GeneratorConfig, ConfigError> {
        let config = GeneratorConfig::load(self.config.as_deref())?;
        Ok(self.apply(config))
    }

    fn apply(self, mut config: GeneratorConfig) -> GeneratorConfig {
        if !self.roots.is_empty() {
            config.roots = self.roots;
        }
        if let Some(out_dir) = self.out_dir {
            config.out_dir = out_dir;
        }
        config
    }
}
