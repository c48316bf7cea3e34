//! End-to-end compilation: scan → load → highlight → registry → artifacts

mod common;

use std::sync::Arc;

use common::{descriptor_module, marked_lines, strip_markup, write_file};
use snippet_registry::codegen::{self, generate};
use snippet_registry::config_paths::{DATA_JSON_FILE_NAME, DATA_RUST_FILE_NAME, LOADER_FILE_NAME};
use snippet_registry::{
    CompileError, CompileOptions, Compiler, DataFormat, GeneratorConfig, Highlighter, Registry,
};
use tempfile::tempdir;

fn compiler() -> Compiler {
    Compiler::new(Arc::new(Highlighter::new()))
}

#[test]
fn test_unmarked_snippet() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "snippets.yaml",
        &descriptor_module("basics", &[("a", "const x = 1;", "ts")]),
    );

    let registry = compiler().compile(&[dir.path()]).unwrap().registry;
    let a = registry.get("a").unwrap();

    assert_eq!(a.raw, "const x = 1;");
    assert!(a.highlighted.contains("hl-keyword"));
    assert!(!a.highlighted.contains("line highlighted"));
    assert!(marked_lines(&a.highlighted).is_empty());
}

#[test]
fn test_marked_lines() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "snippets.yaml",
        "lines:\n  - id: b\n    code: \"line1\\nline2\\nline3\"\n    language: text\n    highlightLines: [2]\n",
    );

    let registry = compiler().compile(&[dir.path()]).unwrap().registry;
    let b = registry.get("b").unwrap();

    assert_eq!(marked_lines(&b.highlighted), vec![2]);
    assert_eq!(b.metadata.highlight_lines.iter().copied().collect::<Vec<_>>(), vec![2]);
}

#[test]
fn test_marked_lines_with_grammar() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "snippets.yaml",
        "s:\n  - id: r\n    language: rust\n    highlight_lines: [1, 3, 9]\n    code: |-\n      fn main() {\n          let x = 1;\n          println!(\"{x}\");\n      }\n",
    );

    let registry = compiler().compile(&[dir.path()]).unwrap().registry;

    assert_eq!(marked_lines(&registry.get("r").unwrap().highlighted), vec![1, 3]);
}

#[test]
fn test_duplicate_id_later_file_wins() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "file1/snippets.yaml",
        &descriptor_module("s", &[("dup", "first()", "js")]),
    );
    write_file(
        dir.path(),
        "file2/snippets.yaml",
        &descriptor_module("s", &[("dup", "second()", "js")]),
    );

    let registry = compiler().compile(&[dir.path()]).unwrap().registry;

    assert_eq!(registry.get("dup").unwrap().raw, "second()");
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_duplicate_id_strict() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "file1/snippets.yaml",
        &descriptor_module("s", &[("dup", "first()", "js")]),
    );
    write_file(
        dir.path(),
        "file2/snippets.yaml",
        &descriptor_module("s", &[("dup", "second()", "js")]),
    );

    let result = compiler()
        .with_options(CompileOptions {
            jobs: 0,
            strict_duplicates: true,
        })
        .compile(&[dir.path()]);

    assert!(matches!(result, Err(CompileError::DuplicateId { .. })));
}

#[test]
fn test_example_file_allow_list() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "notes.md", "# notes");
    write_file(dir.path(), "editor/config.tsx", "export const App = () => <div />;");

    let registry = compiler().compile(&[dir.path()]).unwrap().registry;

    assert!(registry.get("notes.md").is_none());
    let tsx = registry.get("editor/config.tsx").unwrap();
    assert_eq!(tsx.metadata.language, "tsx");
    assert!(tsx.highlighted.contains("data-language=\"tsx\""));
}

#[test]
fn test_round_trip_strips_to_raw() {
    let dir = tempdir().unwrap();
    let samples = [
        ("ts", "interface A { b: string }\nconst a: A = { b: \"<x> & 'y'\" };\n"),
        ("rust", "/// doc\nfn f<'a>(s: &'a str) -> &'a str {\n    s // trailing\n}"),
        ("json", "{\n  \"k\": [1, true, null]\n}"),
        ("css", ".a > b { color: #fff; }"),
        ("html", "<!doctype html>\n<p class=\"x\">a &amp; b</p>"),
        ("python", "def f(x):\n    return x * 2  # twice\n"),
        ("cobol", "DISPLAY 'HI'."),
        ("text", "\tindented\n\n"),
    ];
    let snippets: Vec<(String, &str, &str)> = samples
        .iter()
        .enumerate()
        .map(|(i, (language, code))| (format!("s{i}"), *code, *language))
        .collect();
    let borrowed: Vec<(&str, &str, &str)> = snippets
        .iter()
        .map(|(id, code, language)| (id.as_str(), *code, *language))
        .collect();
    write_file(dir.path(), "snippets.yaml", &descriptor_module("all", &borrowed));

    let registry = compiler().compile(&[dir.path()]).unwrap().registry;

    assert_eq!(registry.len(), samples.len());
    for (id, entry) in &registry.files {
        if entry.metadata.language == "cobol" {
            // unknown grammar: returned untouched
            assert_eq!(entry.highlighted, entry.raw, "{id}");
        } else {
            assert_eq!(strip_markup(&entry.highlighted), entry.raw, "{id}");
        }
    }
}

#[test]
fn test_idempotent_files() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "docs/snippets.yaml",
        &descriptor_module("s", &[("a", "let a = 1;", "js"), ("b", "x = 2", "python")]),
    );
    write_file(dir.path(), "docs/demo.go", "package main\n\nfunc main() {}\n");
    write_file(dir.path(), "style.css", "a { color: red; }");

    let first = compiler().compile(&[dir.path()]).unwrap().registry;
    let second = compiler().compile(&[dir.path()]).unwrap().registry;

    assert_eq!(first.files_json().unwrap(), second.files_json().unwrap());
}

#[test]
fn test_generate_writes_both_artifacts() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("snippets");
    write_file(
        &root,
        "snippets.yaml",
        &descriptor_module("s", &[("a", "const x = 1;", "ts")]),
    );
    write_file(&root, "demo.rs", "fn main() {}\n");
    let config = GeneratorConfig {
        roots: vec![root.clone()],
        out_dir: dir.path().join("generated"),
        ..GeneratorConfig::default()
    };

    let generated = generate(&config, Arc::new(Highlighter::new())).unwrap();

    assert_eq!(generated.artifacts.len(), 2);
    let data = std::fs::read_to_string(config.out_dir.join(DATA_RUST_FILE_NAME)).unwrap();
    assert!(data.contains("id: \"a\""));
    assert!(data.contains("id: \"demo.rs\""));
    let loader = std::fs::read_to_string(config.out_dir.join(LOADER_FILE_NAME)).unwrap();
    assert_eq!(loader.matches("include_str!(").count(), 1);
    assert!(loader.contains("include_str!(\"../snippets/snippets.yaml\")"));
    assert!(!loader.contains(&*dir.path().to_string_lossy()));
}

#[test]
fn test_generate_json_reloads() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "src/snippets.yaml",
        &descriptor_module("s", &[("a", "<b>", "html")]),
    );
    let config = GeneratorConfig {
        roots: vec![dir.path().join("src")],
        out_dir: dir.path().join("out"),
        format: DataFormat::Json,
        ..GeneratorConfig::default()
    };

    let generated = generate(&config, Arc::new(Highlighter::new())).unwrap();

    let json = std::fs::read_to_string(config.out_dir.join(DATA_JSON_FILE_NAME)).unwrap();
    let reloaded = Registry::from_json(&json).unwrap();
    assert_eq!(reloaded.files, generated.compilation.registry.files);
    assert_eq!(reloaded.get("a").unwrap().raw, "<b>");
}

#[test]
fn test_missing_root_writes_nothing() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "present/snippets.yaml",
        &descriptor_module("s", &[("a", "1", "text")]),
    );
    let config = GeneratorConfig {
        roots: vec![dir.path().join("present"), dir.path().join("absent")],
        out_dir: dir.path().join("generated"),
        ..GeneratorConfig::default()
    };

    let result = generate(&config, Arc::new(Highlighter::new()));

    assert!(matches!(result, Err(CompileError::Scan(_))));
    assert!(!config.out_dir.exists());
}

#[test]
fn test_broken_descriptor_module_is_skipped() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "bad/snippets.yaml", "s:\n  - id: [unterminated\n");
    write_file(
        dir.path(),
        "good/snippets.yaml",
        "s:\n  - id: ok\n    code: x\n    language: text\n  - id: no-code\n    language: text\n  - id: bad-lines\n    code: y\n    language: text\n    highlightLines: [0]\nother: 42\n",
    );

    let compilation = compiler().compile(&[dir.path()]).unwrap();

    assert_eq!(compilation.snippet_count, 1);
    assert!(compilation.registry.get("ok").is_some());
    assert_eq!(compilation.descriptor_files.len(), 2);
}

#[test]
fn test_rendered_loader_parses_back() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "snippets.yaml",
        &descriptor_module("s", &[("a", "x", "text")]),
    );
    let compilation = compiler().compile(&[dir.path()]).unwrap();

    let loader = codegen::render_loader(
        &compilation.descriptor_files,
        dir.path(),
        "snippet_registry",
    );

    assert!(loader.starts_with("// @generated"));
    assert!(loader.contains("pub static DESCRIPTOR_SOURCES"));
    assert!(loader.contains("include_str!(\"snippets.yaml\")"));
}
