//! Centralized file names for snippet-registry
//!
//! This module is the single source of truth for the fixed names the
//! generator reads and writes.

use std::path::{Component, Path, PathBuf};

/// Sentinel file name marking a descriptor module
pub const DESCRIPTOR_FILE_NAME: &str = "snippets.yaml";

/// Generator config looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "snippet-registry.yaml";

/// Data artifact, Rust flavour
pub const DATA_RUST_FILE_NAME: &str = "registry_data.rs";

/// Data artifact, JSON flavour
pub const DATA_JSON_FILE_NAME: &str = "registry_data.json";

/// Loader-module artifact
pub const LOADER_FILE_NAME: &str = "registry_loader.rs";

/// `./snippet-registry.yaml`
pub fn default_config_file() -> PathBuf {
    PathBuf::from(CONFIG_FILE_NAME)
}

/// `<out_dir>/registry_loader.rs`
pub fn loader_file(out_dir: &Path) -> PathBuf {
    out_dir.join(LOADER_FILE_NAME)
}

/// Render a relative path with `/` separators regardless of platform
pub fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lexical path from `base` to `path`. Both should be absolute; `.` and
/// `..` are resolved without touching the filesystem.
pub fn relative_path(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);

    let common = path
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &path[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

fn normalize(path: &Path) -> Vec<Component<'_>> {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            other => components.push(other),
        }
    }
    components
}

/// Whether `path` names a descriptor module
pub fn is_descriptor_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n == DESCRIPTOR_FILE_NAME)
}
