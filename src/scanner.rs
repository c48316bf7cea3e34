//! Directory scanning
//!
//! Walks each root depth-first and classifies files into descriptor modules
//! (the sentinel file name) and example files (allow-listed extensions).
//! Entries are visited sorted by file name, so two scans of an unchanged
//! tree produce identical lists.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::config_paths::{is_descriptor_file, slash_path};
use crate::descriptor::FileDescriptor;
use crate::syntax::LanguageId;

/// Directory names never descended into
const IGNORE_DIRS: &[&str] = &["node_modules", "target", "dist", "build"];

/// A fatal scanning error; the registry would otherwise be silently partial
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan root {0} does not exist")]
    MissingRoot(PathBuf),
    #[error("scan root {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("directory cycle: {path} loops back to {ancestor}")]
    Cycle { path: PathBuf, ancestor: PathBuf },
    #[error("failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// Everything discovered under the scan roots, in scan order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub descriptor_files: Vec<PathBuf>,
    pub example_files: Vec<FileDescriptor>,
}

/// Scan every root in order
pub fn scan<P: AsRef<Path>>(roots: &[P]) -> Result<ScanResult, ScanError> {
    let mut result = ScanResult::default();
    for root in roots {
        scan_root(root.as_ref(), &mut result)?;
    }
    tracing::debug!(
        "Scanned {} roots: {} descriptor modules, {} example files",
        roots.len(),
        result.descriptor_files.len(),
        result.example_files.len()
    );
    Ok(result)
}

fn scan_root(root: &Path, result: &mut ScanResult) -> Result<(), ScanError> {
    let metadata = std::fs::metadata(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ScanError::MissingRoot(root.to_path_buf()),
        _ => ScanError::Io {
            path: root.to_path_buf(),
            message: e.to_string(),
        },
    })?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    // Following links means walkdir tracks the ancestor chain and reports a
    // loop instead of recursing forever
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !should_ignore(entry.path(), entry.file_type().is_dir())
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                if skippable(&e) {
                    continue;
                }
                return Err(walk_error(root, e));
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if is_descriptor_file(path) {
            result.descriptor_files.push(path.to_path_buf());
            continue;
        }

        let Some(language) = LanguageId::tag_for_path(path) else {
            continue;
        };
        let relative = path.strip_prefix(root).unwrap_or(path);
        result.example_files.push(FileDescriptor {
            relative_path: slash_path(relative),
            path: path.to_path_buf(),
            language: language.to_string(),
        });
    }

    Ok(())
}

/// Walk errors that only affect an entry the scan would not use anyway.
///
/// `filter_entry` never sees an entry walkdir failed to stat, so ignored
/// names are checked again here. A dangling symlink is skipped with a
/// warning; a symlink loop is never skippable.
fn skippable(error: &walkdir::Error) -> bool {
    if error.loop_ancestor().is_some() || error.depth() == 0 {
        return false;
    }
    let Some(path) = error.path() else {
        return false;
    };

    if should_ignore(path, false) {
        tracing::debug!("Skipping unreadable ignored entry {}", path.display());
        return true;
    }

    let not_found = error
        .io_error()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound);
    let is_symlink = std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink());
    if not_found && is_symlink {
        tracing::warn!("Skipping dangling symlink {}", path.display());
        return true;
    }

    false
}

fn walk_error(root: &Path, error: walkdir::Error) -> ScanError {
    if let Some(ancestor) = error.loop_ancestor() {
        return ScanError::Cycle {
            path: error.path().unwrap_or(root).to_path_buf(),
            ancestor: ancestor.to_path_buf(),
        };
    }
    ScanError::Io {
        path: error.path().unwrap_or(root).to_path_buf(),
        message: error.to_string(),
    }
}

/// Hidden entries and dependency/build output directories are skipped
fn should_ignore(path: &Path, is_dir: bool) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

    if name.starts_with('.') {
        return true;
    }

    is_dir && IGNORE_DIRS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_classifies_files() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "editor/snippets.yaml");
        touch(dir.path(), "editor/config.tsx");
        touch(dir.path(), "editor/notes.md");
        touch(dir.path(), "styles.css");

        let result = scan(&[dir.path()]).unwrap();

        assert_eq!(result.descriptor_files, vec![dir.path().join("editor/snippets.yaml")]);
        let files: Vec<(&str, &str)> = result
            .example_files
            .iter()
            .map(|f| (f.relative_path.as_str(), f.language.as_str()))
            .collect();
        assert_eq!(files, vec![("editor/config.tsx", "tsx"), ("styles.css", "css")]);
    }

    #[test]
    fn test_order_is_sorted_by_name() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "b/snippets.yaml");
        touch(dir.path(), "a/snippets.yaml");
        touch(dir.path(), "c.ts");
        touch(dir.path(), "a.ts");

        let result = scan(&[dir.path()]).unwrap();

        assert_eq!(
            result.descriptor_files,
            vec![
                dir.path().join("a/snippets.yaml"),
                dir.path().join("b/snippets.yaml")
            ]
        );
        let first = &result.example_files[0].relative_path;
        assert_eq!(first, "a.ts");
    }

    #[test]
    fn test_roots_scanned_in_given_order() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        touch(first.path(), "snippets.yaml");
        touch(second.path(), "snippets.yaml");

        let result = scan(&[second.path(), first.path()]).unwrap();

        assert_eq!(result.descriptor_files[0], second.path().join("snippets.yaml"));
        assert_eq!(result.descriptor_files[1], first.path().join("snippets.yaml"));
    }

    #[test]
    fn test_ignored_directories() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "node_modules/pkg/index.js");
        touch(dir.path(), ".cache/snippets.yaml");
        touch(dir.path(), "src/index.js");

        let result = scan(&[dir.path()]).unwrap();

        assert!(result.descriptor_files.is_empty());
        assert_eq!(result.example_files.len(), 1);
        assert_eq!(result.example_files[0].relative_path, "src/index.js");
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempdir().unwrap();
        let err = scan(&[dir.path().join("nope")]).unwrap_err();
        assert!(matches!(err, ScanError::MissingRoot(_)));
    }

    #[test]
    fn test_file_root_is_fatal() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "file.ts");
        let err = scan(&[dir.path().join("file.ts")]).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_is_fatal() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a/file.ts");
        std::os::unix::fs::symlink(dir.path(), dir.path().join("a/loop")).unwrap();

        let err = scan(&[dir.path()]).unwrap_err();

        assert!(matches!(err, ScanError::Cycle { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "editor/config.tsx");
        let missing = dir.path().join("editor/missing.tsx");
        std::os::unix::fs::symlink(&missing, dir.path().join("editor/.#config.tsx")).unwrap();
        std::os::unix::fs::symlink(&missing, dir.path().join("editor/stale.ts")).unwrap();

        let result = scan(&[dir.path()]).unwrap();

        let paths: Vec<&str> = result
            .example_files
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect();
        assert_eq!(paths, vec!["editor/config.tsx"]);
    }

    #[test]
    fn test_should_ignore() {
        assert!(should_ignore(Path::new("/x/.git"), true));
        assert!(should_ignore(Path::new("/x/node_modules"), true));
        assert!(!should_ignore(Path::new("/x/build.ts"), false));
        assert!(!should_ignore(Path::new("/x/src"), true));
    }
}
