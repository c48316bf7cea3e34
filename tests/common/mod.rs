//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::path::Path;

/// Write `contents` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

/// A descriptor module holding the given `(id, code, language)` triples
/// under one export
pub fn descriptor_module(export: &str, snippets: &[(&str, &str, &str)]) -> String {
    let mut yaml = format!("{export}:\n");
    for (id, code, language) in snippets {
        yaml.push_str(&format!(
            "  - id: {id}\n    language: {language}\n    code: {}\n",
            serde_json::to_string(code).unwrap()
        ));
    }
    yaml
}

/// Remove every tag and decode the entities the highlighter emits
pub fn strip_markup(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// 1-based numbers of the lines carrying the marker class
pub fn marked_lines(html: &str) -> Vec<u32> {
    let Some(start) = html.find("<code>") else {
        return Vec::new();
    };
    html[start..]
        .split('\n')
        .enumerate()
        .filter(|(_, line)| line.contains("<span class=\"line highlighted\">"))
        .map(|(i, _)| i as u32 + 1)
        .collect()
}
