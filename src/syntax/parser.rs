//! Tree-sitter grammars and highlight extraction
//!
//! Holds one compiled highlight query per language. Queries are built once
//! and shared read-only; a fresh parser is created for every parse so the
//! grammar set can be used from many threads at once.

use std::collections::HashMap;

use streaming_iterator::StreamingIterator;
use thiserror::Error;
use tree_sitter::{Language, Parser, Query, QueryCursor};

use super::highlights::{highlight_id_for_name, SyntaxHighlights};
use super::languages::LanguageId;

// Embedded query files
const ECMA_HIGHLIGHTS: &str = include_str!("../../queries/ecma/highlights.scm");
const JSX_HIGHLIGHTS: &str = include_str!("../../queries/jsx/highlights.scm");
const TYPESCRIPT_HIGHLIGHTS: &str = include_str!("../../queries/typescript/highlights.scm");
const JSON_HIGHLIGHTS: &str = include_str!("../../queries/json/highlights.scm");
const CSS_HIGHLIGHTS: &str = include_str!("../../queries/css/highlights.scm");
const HTML_HIGHLIGHTS: &str = include_str!("../../queries/html/highlights.scm");

// Built-in queries shipped with the grammar crates (some use HIGHLIGHT_QUERY singular)
const RUST_HIGHLIGHTS: &str = tree_sitter_rust::HIGHLIGHTS_QUERY;
const PYTHON_HIGHLIGHTS: &str = tree_sitter_python::HIGHLIGHTS_QUERY;
const GO_HIGHLIGHTS: &str = tree_sitter_go::HIGHLIGHTS_QUERY;
const C_HIGHLIGHTS: &str = tree_sitter_c::HIGHLIGHT_QUERY;
const CPP_HIGHLIGHTS: &str = tree_sitter_cpp::HIGHLIGHT_QUERY;
const JAVA_HIGHLIGHTS: &str = tree_sitter_java::HIGHLIGHTS_QUERY;
const BASH_HIGHLIGHTS: &str = tree_sitter_bash::HIGHLIGHT_QUERY;

/// Why a piece of source could not be tokenized
#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("no grammar loaded for {0:?}")]
    NoGrammar(LanguageId),
    #[error("failed to set parser language for {language:?}: {message}")]
    Language {
        language: LanguageId,
        message: String,
    },
    #[error("parser produced no tree for {0:?}")]
    ParseFailed(LanguageId),
}

/// A grammar and its compiled highlight query
struct Grammar {
    language: Language,
    query: Query,
}

/// Grammar and query source for a language, `None` for plain text
fn grammar_source(lang: LanguageId) -> Option<(Language, String)> {
    let ecma = |extra: &[&str]| {
        let mut source = ECMA_HIGHLIGHTS.to_string();
        for part in extra {
            source.push('\n');
            source.push_str(part);
        }
        source
    };

    let source: (Language, String) = match lang {
        LanguageId::PlainText => return None,
        LanguageId::Html => (tree_sitter_html::LANGUAGE.into(), HTML_HIGHLIGHTS.to_string()),
        LanguageId::Css => (tree_sitter_css::LANGUAGE.into(), CSS_HIGHLIGHTS.to_string()),
        LanguageId::JavaScript | LanguageId::Jsx => {
            // The JavaScript grammar parses JSX natively
            (tree_sitter_javascript::LANGUAGE.into(), ecma(&[JSX_HIGHLIGHTS]))
        }
        LanguageId::TypeScript => (
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            ecma(&[TYPESCRIPT_HIGHLIGHTS]),
        ),
        LanguageId::Tsx => (
            tree_sitter_typescript::LANGUAGE_TSX.into(),
            ecma(&[TYPESCRIPT_HIGHLIGHTS, JSX_HIGHLIGHTS]),
        ),
        LanguageId::Json => (tree_sitter_json::LANGUAGE.into(), JSON_HIGHLIGHTS.to_string()),
        LanguageId::Rust => (tree_sitter_rust::LANGUAGE.into(), RUST_HIGHLIGHTS.to_string()),
        LanguageId::Python => (
            tree_sitter_python::LANGUAGE.into(),
            PYTHON_HIGHLIGHTS.to_string(),
        ),
        LanguageId::Go => (tree_sitter_go::LANGUAGE.into(), GO_HIGHLIGHTS.to_string()),
        LanguageId::Bash => (tree_sitter_bash::LANGUAGE.into(), BASH_HIGHLIGHTS.to_string()),
        LanguageId::C => (tree_sitter_c::LANGUAGE.into(), C_HIGHLIGHTS.to_string()),
        LanguageId::Cpp => (tree_sitter_cpp::LANGUAGE.into(), CPP_HIGHLIGHTS.to_string()),
        LanguageId::Java => (tree_sitter_java::LANGUAGE.into(), JAVA_HIGHLIGHTS.to_string()),
    };
    Some(source)
}

/// Compiled grammars for every supported language
pub struct GrammarSet {
    grammars: HashMap<LanguageId, Grammar>,
}

impl GrammarSet {
    /// Create a grammar set with every language initialized
    pub fn new() -> Self {
        let mut set = Self {
            grammars: HashMap::new(),
        };
        for &lang in LanguageId::ALL {
            set.init_language(lang);
        }
        set
    }

    /// Compile a language's query. A query that fails to compile leaves the
    /// language without a grammar, so its snippets fall back to raw text.
    fn init_language(&mut self, lang: LanguageId) {
        let Some((language, highlights_scm)) = grammar_source(lang) else {
            return;
        };

        match Query::new(&language, &highlights_scm) {
            Ok(query) => {
                self.grammars.insert(lang, Grammar { language, query });
            }
            Err(e) => {
                tracing::error!("Failed to compile query for {:?}: {:?}", lang, e);
            }
        }
    }

    /// Whether a language has a usable grammar
    pub fn supports(&self, lang: LanguageId) -> bool {
        self.grammars.contains_key(&lang)
    }

    /// Parse `source` and extract highlight tokens
    ///
    /// Plain text yields empty highlights.
    pub fn tokenize(
        &self,
        source: &str,
        language: LanguageId,
    ) -> Result<SyntaxHighlights, TokenizeError> {
        if !language.has_grammar() {
            return Ok(SyntaxHighlights::new(language));
        }

        let grammar = self
            .grammars
            .get(&language)
            .ok_or(TokenizeError::NoGrammar(language))?;

        let mut parser = Parser::new();
        parser
            .set_language(&grammar.language)
            .map_err(|e| TokenizeError::Language {
                language,
                message: e.to_string(),
            })?;

        let tree = parser
            .parse(source, None)
            .ok_or(TokenizeError::ParseFailed(language))?;

        let mut highlights = SyntaxHighlights::new(language);
        let query = &grammar.query;
        let mut cursor = QueryCursor::new();
        let line_lengths: Vec<usize> = source.split('\n').map(str::len).collect();

        // Run query and collect captures using StreamingIterator
        let mut captures = cursor.captures(query, tree.root_node(), source.as_bytes());
        while let Some((query_match, capture_idx)) = captures.next() {
            let capture = &query_match.captures[*capture_idx];
            let capture_name = &query.capture_names()[capture.index as usize];

            // Map capture name to highlight ID
            let Some(highlight_id) = highlight_id_for_name(capture_name) else {
                continue; // Skip unknown captures
            };

            let start = capture.node.start_position();
            let end = capture.node.end_position();

            if start.row == end.row {
                highlights.push(start.row, start.column, end.column, highlight_id);
                continue;
            }

            // Multi-line token: split across lines
            for row in start.row..=end.row {
                let line_len = line_lengths.get(row).copied().unwrap_or(0);
                let (from, to) = if row == start.row {
                    (start.column, line_len)
                } else if row == end.row {
                    (0, end.column)
                } else {
                    (0, line_len)
                };
                highlights.push(row, from, to, highlight_id);
            }
        }

        Ok(highlights)
    }
}

impl Default for GrammarSet {
    fn default() -> Self {
        Self::new()
    }
}
