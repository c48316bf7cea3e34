//! Artifact emitters
//!
//! The data artifact is the compiled registry as a `'static` table (or JSON),
//! the loader module embeds every descriptor module with `include_str!`.
//! Both are rendered to strings and staged as temp files in the output
//! directory before either destination is replaced.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::compiler::{Compilation, CompileError, Compiler};
use crate::config::{DataFormat, GeneratorConfig};
use crate::config_paths::{loader_file, relative_path, DATA_JSON_FILE_NAME, DATA_RUST_FILE_NAME};
use crate::registry::Registry;
use crate::syntax::Render;

const HEADER: &str = "// @generated by snippet-registry. Do not edit by hand.\n";

/// Render the Rust flavour of the data artifact.
///
/// Entries come out sorted by id, which `StaticRegistry::get` relies on.
pub fn render_data_rust(registry: &Registry, crate_path: &str) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(HEADER);
    out.push('\n');
    let _ = writeln!(
        out,
        "pub static REGISTRY: {crate_path}::artifact::StaticRegistry = {crate_path}::artifact::StaticRegistry {{"
    );
    let _ = writeln!(
        out,
        "    last_generated: {:?},",
        registry.last_generated.to_rfc3339()
    );
    out.push_str("    files: &[\n");

    for (id, entry) in &registry.files {
        let meta = &entry.metadata;
        let _ = writeln!(out, "        {crate_path}::artifact::StaticEntry {{");
        let _ = writeln!(out, "            id: {:?},", id);
        let _ = writeln!(out, "            raw: {:?},", entry.raw);
        let _ = writeln!(out, "            highlighted: {:?},", entry.highlighted);
        let _ = writeln!(out, "            language: {:?},", meta.language);
        let _ = writeln!(out, "            title: {},", option_literal(&meta.title));
        let _ = writeln!(
            out,
            "            description: {},",
            option_literal(&meta.description)
        );
        let lines: Vec<String> = meta.highlight_lines.iter().map(u32::to_string).collect();
        let _ = writeln!(out, "            highlight_lines: &[{}],", lines.join(", "));
        out.push_str("        },\n");
    }

    out.push_str("    ],\n};\n");
    out
}

/// Render the JSON flavour of the data artifact
pub fn render_data_json(registry: &Registry) -> Result<String, CompileError> {
    let mut json = registry.to_json()?;
    json.push('\n');
    Ok(json)
}

/// Render the loader module: one `include_str!` per descriptor module, in
/// scan order.
///
/// Paths are relative to `out_dir`, where the module is written, so a
/// committed artifact keeps working from any checkout.
pub fn render_loader(
    descriptor_files: &[PathBuf],
    out_dir: &Path,
    crate_path: &str,
) -> String {
    let mut out = String::with_capacity(256 + descriptor_files.len() * 160);
    out.push_str(HEADER);
    out.push('\n');
    let _ = writeln!(
        out,
        "pub static DESCRIPTOR_SOURCES: &[{crate_path}::artifact::DescriptorSource] = &["
    );
    for path in descriptor_files {
        let path = include_path(path, out_dir);
        let _ = writeln!(out, "    {crate_path}::artifact::DescriptorSource {{");
        let _ = writeln!(out, "        path: {:?},", path);
        let _ = writeln!(out, "        contents: include_str!({:?}),", path);
        out.push_str("    },\n");
    }
    out.push_str("];\n");
    out
}

/// `include_str!` inside an `include!`d file resolves against that file
fn include_path(path: &Path, out_dir: &Path) -> String {
    let relative = match (std::path::absolute(path), std::path::absolute(out_dir)) {
        (Ok(path), Ok(base)) => relative_path(&path, &base),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(
                "Could not resolve {} against {}: {}",
                path.display(),
                out_dir.display(),
                e
            );
            path.to_path_buf()
        }
    };
    relative.to_string_lossy().replace('\\', "/")
}

fn option_literal(value: &Option<String>) -> String {
    match value {
        Some(s) => format!("Some({:?})", s),
        None => "None".to_string(),
    }
}

/// Name of the data artifact for `format`
pub fn data_file(out_dir: &Path, format: DataFormat) -> PathBuf {
    match format {
        DataFormat::Rust => out_dir.join(DATA_RUST_FILE_NAME),
        DataFormat::Json => out_dir.join(DATA_JSON_FILE_NAME),
    }
}

/// Render and write both artifacts into `out_dir`, returning their paths
pub fn write_artifacts(
    compilation: &Compilation,
    out_dir: &Path,
    format: DataFormat,
    crate_path: &str,
) -> Result<Vec<PathBuf>, CompileError> {
    let data = match format {
        DataFormat::Rust => render_data_rust(&compilation.registry, crate_path),
        DataFormat::Json => render_data_json(&compilation.registry)?,
    };
    let loader = render_loader(&compilation.descriptor_files, out_dir, crate_path);

    std::fs::create_dir_all(out_dir).map_err(|source| CompileError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let artifacts = [
        (data_file(out_dir, format), data),
        (loader_file(out_dir), loader),
    ];

    // Stage every artifact before replacing any. Only the window between
    // the renames below can leave a new data artifact beside an old loader.
    let mut staged = Vec::with_capacity(artifacts.len());
    for (path, contents) in artifacts {
        let file = stage(out_dir, &path, &contents)?;
        staged.push((file, path));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (file, path) in staged {
        file.persist(&path).map_err(|e| CompileError::Write {
            path: path.clone(),
            source: e.error,
        })?;
        tracing::info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// What a `generate` run produced
#[derive(Debug)]
pub struct Generated {
    pub compilation: Compilation,
    pub artifacts: Vec<PathBuf>,
}

/// Compile the configured roots and write both artifacts.
///
/// Nothing is written unless compilation succeeds.
pub fn generate(
    config: &GeneratorConfig,
    renderer: Arc<dyn Render>,
) -> Result<Generated, CompileError> {
    let compilation = Compiler::new(renderer)
        .with_options(config.compile_options())
        .compile(&config.roots)?;
    let artifacts = write_artifacts(
        &compilation,
        &config.out_dir,
        config.format,
        &config.crate_path,
    )?;
    Ok(Generated {
        compilation,
        artifacts,
    })
}

/// Write `contents` to a synced temp file in `dir`, destined for `path`
fn stage(dir: &Path, path: &Path, contents: &str) -> Result<NamedTempFile, CompileError> {
    let io_error = |source| CompileError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(contents.as_bytes()).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    Ok(file)
}
