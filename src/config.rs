//! Generator configuration
//!
//! Read from `snippet-registry.yaml` in the working directory, or from an
//! explicit `--config` path. Every field has a default, so the file is
//! optional and may set only what it needs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compiler::CompileOptions;

/// Flavour of the data artifact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    /// `registry_data.rs`, a `'static` table for `include!`
    #[default]
    Rust,
    /// `registry_data.json`, loaded with `Registry::from_json`
    Json,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Settings for one `generate` run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Directories to scan, in order
    pub roots: Vec<PathBuf>,
    /// Where the artifacts are written
    pub out_dir: PathBuf,
    pub format: DataFormat,
    /// Path the generated Rust uses to name this crate's artifact types
    pub crate_path: String,
    /// Fail on a repeated registry key instead of last-write-wins
    pub strict_duplicates: bool,
    /// Worker threads for highlighting (0 = available parallelism)
    pub jobs: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from("snippets"), PathBuf::from("demos")],
            out_dir: PathBuf::from("generated"),
            format: DataFormat::default(),
            crate_path: "snippet_registry".to_string(),
            strict_duplicates: false,
            jobs: 0,
        }
    }
}

impl GeneratorConfig {
    /// Load the config for a run.
    ///
    /// With `explicit`, that file must exist and parse. Without it, a missing
    /// `snippet-registry.yaml` means defaults, but one that exists must parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = crate::config_paths::default_config_file();
                if !path.exists() {
                    tracing::debug!(
                        "Config file not found at {}, using defaults",
                        path.display()
                    );
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_yaml(&content, &path)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse config text; relative paths are taken relative to `path`'s
    /// directory
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        // An empty document deserializes as null, not as an empty mapping
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        };
        let base = path.parent().unwrap_or(Path::new(""));
        Ok(config.relative_to(base))
    }

    fn relative_to(mut self, base: &Path) -> Self {
        for root in &mut self.roots {
            if root.is_relative() {
                *root = base.join(&*root);
            }
        }
        if self.out_dir.is_relative() {
            self.out_dir = base.join(&self.out_dir);
        }
        self
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            jobs: self.jobs,
            strict_duplicates: self.strict_duplicates,
        }
    }
}
