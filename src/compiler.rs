//! Registry compilation
//!
//! Scanner → Loader → Highlighter (worker pool) → Registry. Every entry is
//! highlighted independently; assembly back into job order is the only
//! synchronization point, which keeps last-write-wins deterministic no
//! matter which worker finishes first.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use thiserror::Error;

use crate::descriptor::{FileDescriptor, SnippetDescriptor};
use crate::loader;
use crate::registry::{EntryMetadata, Registry, RegistryEntry};
use crate::scanner::{self, ScanError};
use crate::syntax::Render;

/// A fatal compilation error; no artifacts are written
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("duplicate registry key `{key}`: defined by {first} and again by {second}")]
    DuplicateId {
        key: String,
        first: String,
        second: String,
    },
    #[error("failed to write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize registry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Knobs for a compilation run
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Worker threads; 0 means available parallelism
    pub jobs: usize,
    /// Treat a repeated registry key as fatal instead of last-write-wins
    pub strict_duplicates: bool,
}

/// Result of a successful compilation
#[derive(Debug, Clone)]
pub struct Compilation {
    pub registry: Registry,
    /// Descriptor modules in scan order, for the loader-module artifact
    pub descriptor_files: Vec<PathBuf>,
    pub snippet_count: usize,
    pub file_count: usize,
}

/// One unit of highlighting work
enum Job {
    Snippet {
        descriptor: SnippetDescriptor,
        origin: PathBuf,
    },
    File(FileDescriptor),
}

impl Job {
    fn key(&self) -> &str {
        match self {
            Job::Snippet { descriptor, .. } => &descriptor.id,
            Job::File(file) => &file.relative_path,
        }
    }

    fn origin(&self) -> String {
        match self {
            Job::Snippet { origin, .. } => origin.display().to_string(),
            Job::File(file) => file.path.display().to_string(),
        }
    }
}

/// Builds a [`Registry`] from scan roots
pub struct Compiler {
    renderer: Arc<dyn Render>,
    options: CompileOptions,
}

impl Compiler {
    pub fn new(renderer: Arc<dyn Render>) -> Self {
        Self {
            renderer,
            options: CompileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Scan, load, highlight and assemble.
    ///
    /// Only scanner errors and (in strict mode) duplicate keys are fatal;
    /// broken descriptor modules and unreadable example files are logged and
    /// left out.
    pub fn compile<P: AsRef<Path>>(&self, roots: &[P]) -> Result<Compilation, CompileError> {
        let scan = scanner::scan(roots)?;

        let mut jobs = Vec::new();
        for path in &scan.descriptor_files {
            for descriptor in loader::load(path) {
                jobs.push(Job::Snippet {
                    descriptor,
                    origin: path.clone(),
                });
            }
        }
        let snippet_count = jobs.len();
        jobs.extend(scan.example_files.into_iter().map(Job::File));
        let file_count = jobs.len() - snippet_count;

        self.check_duplicates(&jobs)?;

        let entries = self.run_jobs(&jobs);

        let mut registry = Registry::new();
        for (job, entry) in jobs.iter().zip(entries) {
            if let Some(entry) = entry {
                registry.insert(job.key().to_string(), entry);
            }
        }

        tracing::info!(
            "Compiled {} entries ({} snippets, {} example files) from {} descriptor modules",
            registry.len(),
            snippet_count,
            file_count,
            scan.descriptor_files.len()
        );

        Ok(Compilation {
            registry,
            descriptor_files: scan.descriptor_files,
            snippet_count,
            file_count,
        })
    }

    fn check_duplicates(&self, jobs: &[Job]) -> Result<(), CompileError> {
        let mut seen: HashMap<&str, String> = HashMap::new();
        for job in jobs {
            let origin = job.origin();
            if let Some(first) = seen.insert(job.key(), origin.clone()) {
                if self.options.strict_duplicates {
                    return Err(CompileError::DuplicateId {
                        key: job.key().to_string(),
                        first,
                        second: origin,
                    });
                }
                tracing::warn!(
                    "Duplicate registry key `{}`: {} overrides {}",
                    job.key(),
                    origin,
                    first
                );
            }
        }
        Ok(())
    }

    fn worker_count(&self, job_count: usize) -> usize {
        let requested = match self.options.jobs {
            0 => thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            n => n,
        };
        requested.min(job_count).max(1)
    }

    /// Highlight every job on a bounded pool; results come back in job order
    fn run_jobs(&self, jobs: &[Job]) -> Vec<Option<RegistryEntry>> {
        if jobs.is_empty() {
            return Vec::new();
        }

        let (tx, rx) = mpsc::channel();
        let next = AtomicUsize::new(0);
        let renderer: &dyn Render = self.renderer.as_ref();

        thread::scope(|scope| {
            for _ in 0..self.worker_count(jobs.len()) {
                let tx = tx.clone();
                let next = &next;
                scope.spawn(move || loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(job) = jobs.get(index) else {
                        break;
                    };
                    let _ = tx.send((index, build_entry(renderer, job)));
                });
            }
        });
        drop(tx);

        let mut entries = vec![None; jobs.len()];
        for (index, entry) in rx {
            entries[index] = entry;
        }
        entries
    }
}

fn build_entry(renderer: &dyn Render, job: &Job) -> Option<RegistryEntry> {
    match job {
        Job::Snippet { descriptor, .. } => Some(snippet_entry(renderer, descriptor)),
        Job::File(file) => {
            let code = match std::fs::read_to_string(&file.path) {
                Ok(code) => code,
                Err(e) => {
                    tracing::warn!("Skipping example file {}: {}", file.path.display(), e);
                    return None;
                }
            };
            let highlighted = renderer.render(&code, &file.language, &Default::default());
            Some(RegistryEntry {
                raw: code,
                highlighted,
                metadata: EntryMetadata {
                    title: None,
                    description: None,
                    language: file.language.clone(),
                    highlight_lines: Default::default(),
                },
            })
        }
    }
}

/// Highlight one snippet descriptor into a registry entry
pub fn snippet_entry(renderer: &dyn Render, descriptor: &SnippetDescriptor) -> RegistryEntry {
    RegistryEntry {
        raw: descriptor.code.clone(),
        highlighted: renderer.render(
            &descriptor.code,
            &descriptor.language,
            &descriptor.highlight_lines,
        ),
        metadata: EntryMetadata {
            title: descriptor.title.clone(),
            description: descriptor.description.clone(),
            language: descriptor.language.clone(),
            highlight_lines: descriptor.highlight_lines.clone(),
        },
    }
}
