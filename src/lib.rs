//! Snippet registry - build-time code snippet compiler
//!
//! Scans directory trees for snippet descriptor modules and example source
//! files, highlights everything once, and writes static artifacts. At
//! runtime a [`RegistryService`] serves raw and highlighted code from those
//! artifacts, highlighting descriptor-only ids lazily.

pub mod artifact;
pub mod cli;
pub mod codegen;
pub mod compiler;
pub mod config;
pub mod config_paths;
pub mod descriptor;
pub mod loader;
pub mod registry;
pub mod scanner;
pub mod service;
pub mod syntax;
pub mod tracing;

// Re-export commonly used types
pub use artifact::{DescriptorSource, StaticEntry, StaticRegistry};
pub use compiler::{Compilation, CompileError, CompileOptions, Compiler};
pub use config::{DataFormat, GeneratorConfig};
pub use descriptor::{FileDescriptor, SnippetDescriptor};
pub use registry::{EntryMetadata, Registry, RegistryEntry};
pub use service::{DescriptorTable, RegistryService};
pub use syntax::{Highlighter, Render};
