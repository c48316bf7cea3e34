//! Language identification and detection
//!
//! Maps snippet language tags and example-file extensions to language IDs.

use std::path::Path;

/// Supported language identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LanguageId {
    PlainText,
    // Web stack
    Html,
    Css,
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
    Json,
    // Systems and scripting
    Rust,
    Python,
    Go,
    Bash,
    C,
    Cpp,
    Java,
}

/// Extension allow-list for example files: `(extension, language tag)`.
///
/// Files with any other extension are not example files. The tag is what
/// ends up in the registry metadata.
pub const EXAMPLE_EXTENSIONS: &[(&str, &str)] = &[
    ("ts", "ts"),
    ("tsx", "tsx"),
    ("js", "js"),
    ("jsx", "jsx"),
    ("mjs", "js"),
    ("cjs", "js"),
    ("css", "css"),
    ("html", "html"),
    ("json", "json"),
    ("rs", "rust"),
    ("py", "python"),
    ("go", "go"),
    ("sh", "bash"),
    ("c", "c"),
    ("h", "c"),
    ("cpp", "cpp"),
    ("hpp", "cpp"),
    ("java", "java"),
];

impl LanguageId {
    /// Every language the highlighter knows, in initialization order
    pub const ALL: &'static [LanguageId] = &[
        LanguageId::PlainText,
        LanguageId::Html,
        LanguageId::Css,
        LanguageId::JavaScript,
        LanguageId::Jsx,
        LanguageId::TypeScript,
        LanguageId::Tsx,
        LanguageId::Json,
        LanguageId::Rust,
        LanguageId::Python,
        LanguageId::Go,
        LanguageId::Bash,
        LanguageId::C,
        LanguageId::Cpp,
        LanguageId::Java,
    ];

    /// Resolve a snippet language tag (case-insensitive, aliases accepted)
    pub fn from_tag(tag: &str) -> Option<Self> {
        let lang = match tag.trim().to_lowercase().as_str() {
            "text" | "txt" | "plaintext" | "plain" => LanguageId::PlainText,
            "html" | "htm" => LanguageId::Html,
            "css" => LanguageId::Css,
            "js" | "javascript" | "mjs" | "cjs" => LanguageId::JavaScript,
            "jsx" => LanguageId::Jsx,
            "ts" | "typescript" => LanguageId::TypeScript,
            "tsx" => LanguageId::Tsx,
            "json" => LanguageId::Json,
            "rust" | "rs" => LanguageId::Rust,
            "python" | "py" => LanguageId::Python,
            "go" | "golang" => LanguageId::Go,
            "bash" | "sh" | "shell" | "zsh" => LanguageId::Bash,
            "c" | "h" => LanguageId::C,
            "cpp" | "c++" | "cc" | "hpp" => LanguageId::Cpp,
            "java" => LanguageId::Java,
            _ => return None,
        };
        Some(lang)
    }

    /// Language tag for an example file extension, if it is allow-listed
    pub fn tag_for_extension(ext: &str) -> Option<&'static str> {
        let ext = ext.to_lowercase();
        EXAMPLE_EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, tag)| *tag)
    }

    /// Language tag for an example file path, if its extension is allow-listed
    pub fn tag_for_path(path: &Path) -> Option<&'static str> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::tag_for_extension)
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "Plain Text",
            LanguageId::Html => "HTML",
            LanguageId::Css => "CSS",
            LanguageId::JavaScript => "JavaScript",
            LanguageId::Jsx => "JSX",
            LanguageId::TypeScript => "TypeScript",
            LanguageId::Tsx => "TSX",
            LanguageId::Json => "JSON",
            LanguageId::Rust => "Rust",
            LanguageId::Python => "Python",
            LanguageId::Go => "Go",
            LanguageId::Bash => "Bash",
            LanguageId::C => "C",
            LanguageId::Cpp => "C++",
            LanguageId::Java => "Java",
        }
    }

    /// Check if this language has a tree-sitter grammar
    pub fn has_grammar(&self) -> bool {
        !matches!(self, LanguageId::PlainText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(LanguageId::from_tag("ts"), Some(LanguageId::TypeScript));
        assert_eq!(LanguageId::from_tag("TypeScript"), Some(LanguageId::TypeScript));
        assert_eq!(LanguageId::from_tag("tsx"), Some(LanguageId::Tsx));
        assert_eq!(LanguageId::from_tag("text"), Some(LanguageId::PlainText));
        assert_eq!(LanguageId::from_tag("sh"), Some(LanguageId::Bash));
        assert_eq!(LanguageId::from_tag("cobol"), None);
        assert_eq!(LanguageId::from_tag(""), None);
    }

    #[test]
    fn test_tag_for_extension() {
        assert_eq!(LanguageId::tag_for_extension("tsx"), Some("tsx"));
        assert_eq!(LanguageId::tag_for_extension("TSX"), Some("tsx"));
        assert_eq!(LanguageId::tag_for_extension("mjs"), Some("js"));
        assert_eq!(LanguageId::tag_for_extension("md"), None);
        assert_eq!(LanguageId::tag_for_extension("yaml"), None);
    }

    #[test]
    fn test_tag_for_path() {
        assert_eq!(
            LanguageId::tag_for_path(Path::new("demos/config.tsx")),
            Some("tsx")
        );
        assert_eq!(LanguageId::tag_for_path(Path::new("notes.md")), None);
        assert_eq!(LanguageId::tag_for_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_every_example_tag_resolves() {
        for (ext, tag) in EXAMPLE_EXTENSIONS {
            assert!(
                LanguageId::from_tag(tag).is_some(),
                "extension {ext} maps to unknown tag {tag}"
            );
        }
    }
}
