//! Descriptor module loading
//!
//! A descriptor module is a YAML document whose top-level keys play the role
//! of named exports. Every sequence-valued export is a list of snippet
//! descriptors; other exports are ignored. Malformed elements are skipped
//! with a warning so one bad snippet never empties a whole module.
//!
//! The same parser serves the build step (reading from disk) and the runtime
//! (reading text embedded by the generated loader module).

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use thiserror::Error;

use crate::descriptor::{kind_of, SnippetDescriptor};

/// Export name given to a module whose top level is a bare sequence
pub const DEFAULT_EXPORT: &str = "default";

/// A descriptor module could not be loaded at all
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read descriptor module {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse descriptor module {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("descriptor module {origin} must be a mapping of exports, found {found}")]
    NotAModule { origin: String, found: &'static str },
}

/// Load a descriptor module from disk.
///
/// Any failure is logged and yields zero descriptors; loading never aborts
/// a compilation.
pub fn load(path: &Path) -> Vec<SnippetDescriptor> {
    match try_load(path) {
        Ok(descriptors) => descriptors,
        Err(e) => {
            tracing::warn!("Skipping descriptor module: {}", e);
            Vec::new()
        }
    }
}

/// Load a descriptor module from disk, reporting module-level failures
pub fn try_load(path: &Path) -> Result<Vec<SnippetDescriptor>, LoadError> {
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let descriptors = parse_descriptors(&source, &path.display().to_string())?;
    tracing::debug!(
        "Loaded {} descriptors from {}",
        descriptors.len(),
        path.display()
    );
    Ok(descriptors)
}

/// Parse descriptor module text into its valid descriptors, in export order
/// then element order. `origin` names the module in diagnostics.
pub fn parse_descriptors(source: &str, origin: &str) -> Result<Vec<SnippetDescriptor>, LoadError> {
    let document: Value = serde_yaml::from_str(source).map_err(|source| LoadError::Parse {
        origin: origin.to_string(),
        source,
    })?;

    let exports: Vec<(String, Value)> = match document {
        Value::Mapping(mapping) => mapping
            .into_iter()
            .map(|(key, value)| (export_name(&key), value))
            .collect(),
        sequence @ Value::Sequence(_) => vec![(DEFAULT_EXPORT.to_string(), sequence)],
        other => {
            return Err(LoadError::NotAModule {
                origin: origin.to_string(),
                found: kind_of(&other),
            })
        }
    };

    let mut descriptors = Vec::new();
    for (export, value) in exports {
        let Value::Sequence(elements) = value else {
            tracing::debug!("{}: export `{}` is not a sequence, ignoring", origin, export);
            continue;
        };

        for (index, element) in elements.into_iter().enumerate() {
            match SnippetDescriptor::from_value(element) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(e) => {
                    tracing::warn!(
                        module = origin,
                        export = export.as_str(),
                        index,
                        "Skipping malformed snippet descriptor: {}",
                        e
                    );
                }
            }
        }
    }

    Ok(descriptors)
}

fn export_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| "<key>".to_string()),
    }
}
