//! Snippet and example-file descriptors
//!
//! A [`SnippetDescriptor`] is an author-declared unit of code; a
//! [`FileDescriptor`] is an example source file found on disk.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named unit of source code to register
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetDescriptor {
    pub id: String,
    pub code: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 1-based line numbers to mark
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub highlight_lines: BTreeSet<u32>,
}

/// An example source file discovered under a scan root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// `/`-separated path relative to the scan root; doubles as registry key
    pub relative_path: String,
    /// Where the file lives on disk
    pub path: PathBuf,
    /// Tag derived from the file extension
    pub language: String,
}

/// Why a descriptor element was rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("expected a mapping, found {0}")]
    NotAMapping(&'static str),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` must be a non-empty string")]
    EmptyField(&'static str),
    #[error("field `{field}` must be a string, found {found}")]
    NotAString {
        field: &'static str,
        found: &'static str,
    },
    #[error("field `highlightLines` must be a sequence of positive integers")]
    BadHighlightLines,
    #[error("malformed descriptor: {0}")]
    BadMetadata(String),
}

/// Unvalidated descriptor shape as authored
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDescriptor {
    id: Option<serde_yaml::Value>,
    code: Option<serde_yaml::Value>,
    language: Option<serde_yaml::Value>,
    title: Option<serde_yaml::Value>,
    description: Option<serde_yaml::Value>,
    #[serde(alias = "highlight_lines")]
    highlight_lines: Option<serde_yaml::Value>,
}

pub(crate) fn kind_of(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

fn required_string(
    value: Option<serde_yaml::Value>,
    field: &'static str,
) -> Result<String, DescriptorError> {
    match value {
        None | Some(serde_yaml::Value::Null) => Err(DescriptorError::MissingField(field)),
        Some(serde_yaml::Value::String(s)) if s.is_empty() => {
            Err(DescriptorError::EmptyField(field))
        }
        Some(serde_yaml::Value::String(s)) => Ok(s),
        Some(other) => Err(DescriptorError::NotAString {
            field,
            found: kind_of(&other),
        }),
    }
}

/// Display metadata is opaque: scalars are kept as their text, anything
/// else is dropped without rejecting the descriptor
fn metadata_string(value: Option<serde_yaml::Value>, field: &'static str) -> Option<String> {
    match value? {
        serde_yaml::Value::Null => None,
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        other => {
            tracing::warn!(
                "Ignoring `{}`: expected a scalar, found {}",
                field,
                kind_of(&other)
            );
            None
        }
    }
}

fn highlight_lines(value: Option<serde_yaml::Value>) -> Result<BTreeSet<u32>, DescriptorError> {
    let items = match value {
        None | Some(serde_yaml::Value::Null) => return Ok(BTreeSet::new()),
        Some(serde_yaml::Value::Sequence(items)) => items,
        Some(_) => return Err(DescriptorError::BadHighlightLines),
    };

    items
        .iter()
        .map(|item| {
            item.as_u64()
                .filter(|&n| n > 0)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or(DescriptorError::BadHighlightLines)
        })
        .collect()
}

impl SnippetDescriptor {
    /// Create a descriptor with no display metadata or marked lines
    pub fn new(id: impl Into<String>, code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            language: language.into(),
            title: None,
            description: None,
            highlight_lines: BTreeSet::new(),
        }
    }

    /// Validate one authored element against the descriptor shape
    pub fn from_value(value: serde_yaml::Value) -> Result<Self, DescriptorError> {
        if !value.is_mapping() {
            return Err(DescriptorError::NotAMapping(kind_of(&value)));
        }

        // Every field is an optional raw value; types are checked below
        let raw: RawDescriptor = serde_yaml::from_value(value)
            .map_err(|e| DescriptorError::BadMetadata(e.to_string()))?;

        Ok(Self {
            id: required_string(raw.id, "id")?,
            code: required_string(raw.code, "code")?,
            language: required_string(raw.language, "language")?,
            title: metadata_string(raw.title, "title"),
            description: metadata_string(raw.description, "description"),
            highlight_lines: highlight_lines(raw.highlight_lines)?,
        })
    }
}
