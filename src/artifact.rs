//! Types the generated Rust artifacts are written in terms of
//!
//! `registry_data.rs` defines a `pub static REGISTRY: StaticRegistry` and
//! `registry_loader.rs` defines a `pub static DESCRIPTOR_SOURCES:
//! &[DescriptorSource]`. Both are plain `'static` data: a host crate
//! `include!`s them and needs no filesystem access at runtime.

/// One precomputed registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticEntry {
    pub id: &'static str,
    pub raw: &'static str,
    pub highlighted: &'static str,
    pub language: &'static str,
    pub title: Option<&'static str>,
    pub description: Option<&'static str>,
    pub highlight_lines: &'static [u32],
}

/// The whole precomputed registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticRegistry {
    /// RFC 3339 generation timestamp
    pub last_generated: &'static str,
    /// Entries sorted by id
    pub files: &'static [StaticEntry],
}

/// A descriptor module embedded with `include_str!`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorSource {
    /// Path the module was discovered at, for diagnostics
    pub path: &'static str,
    /// Module text
    pub contents: &'static str,
}

impl StaticRegistry {
    /// Look up an entry by id
    pub fn get(&self, id: &str) -> Option<&'static StaticEntry> {
        let files: &'static [StaticEntry] = self.files;
        files
            .binary_search_by(|entry| entry.id.cmp(id))
            .ok()
            .map(|index| &files[index])
    }
}
