//! The compiled registry: id/path → {raw, highlighted, metadata}

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::artifact::{StaticEntry, StaticRegistry};

/// Display metadata carried alongside each entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub language: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub highlight_lines: BTreeSet<u32>,
}

/// Compiled output for one snippet or example file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub raw: String,
    pub highlighted: String,
    pub metadata: EntryMetadata,
}

/// The full compiled registry
///
/// `files` is ordered by key so serialized output is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    pub files: BTreeMap<String, RegistryEntry>,
    pub last_generated: DateTime<Utc>,
}

impl Registry {
    /// An empty registry stamped with the current time
    pub fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            last_generated: Utc::now(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.files.get(id)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Insert an entry, returning the one it replaced
    pub fn insert(&mut self, key: String, entry: RegistryEntry) -> Option<RegistryEntry> {
        self.files.insert(key, entry)
    }

    /// Load the JSON flavour of the data artifact
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Serialize as the JSON flavour of the data artifact
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The `files` content alone, for comparing two compilations while
    /// ignoring their timestamps
    pub fn files_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.files)
    }

    /// Copy a generated static registry into an owned one.
    ///
    /// An unparseable timestamp (hand-edited artifact) falls back to the
    /// Unix epoch.
    pub fn from_static(data: &StaticRegistry) -> Self {
        let last_generated = DateTime::parse_from_rfc3339(data.last_generated)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_default();

        let files = data
            .files
            .iter()
            .map(|entry| (entry.id.to_string(), RegistryEntry::from_static(entry)))
            .collect();

        Self {
            files,
            last_generated,
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryEntry {
    fn from_static(entry: &StaticEntry) -> Self {
        Self {
            raw: entry.raw.to_string(),
            highlighted: entry.highlighted.to_string(),
            metadata: EntryMetadata {
                title: entry.title.map(str::to_string),
                description: entry.description.map(str::to_string),
                language: entry.language.to_string(),
                highlight_lines: entry.highlight_lines.iter().copied().collect(),
            },
        }
    }
}
