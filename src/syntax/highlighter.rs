//! The highlighter entry point used by the compiler and the runtime service

use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};

use super::languages::LanguageId;
use super::markup::render_html;
use super::parser::GrammarSet;

/// Turns source text into highlighted markup.
///
/// Implementations must never fail: anything that cannot be rendered comes
/// back as the input text unchanged.
pub trait Render: Send + Sync {
    fn render(&self, code: &str, language: &str, marked: &BTreeSet<u32>) -> String;
}

/// Tree-sitter backed highlighter
pub struct Highlighter {
    grammars: GrammarSet,
}

impl Highlighter {
    /// Compile every grammar's highlight query
    pub fn new() -> Self {
        Self {
            grammars: GrammarSet::new(),
        }
    }

    /// Whether `language` resolves to something this highlighter can render
    pub fn supports(&self, language: &str) -> bool {
        match LanguageId::from_tag(language) {
            Some(lang) => !lang.has_grammar() || self.grammars.supports(lang),
            None => false,
        }
    }

    fn try_render(&self, code: &str, language: &str, marked: &BTreeSet<u32>) -> Option<String> {
        let lang = LanguageId::from_tag(language)?;
        match self.grammars.tokenize(code, lang) {
            Ok(highlights) => Some(render_html(code, language, &highlights, marked)),
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", language, e);
                None
            }
        }
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Render for Highlighter {
    fn render(&self, code: &str, language: &str, marked: &BTreeSet<u32>) -> String {
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
            self.try_render(code, language, marked)
        }));

        match attempt {
            Ok(Some(html)) => html,
            Ok(None) => code.to_string(),
            Err(_) => {
                tracing::warn!("Highlighter panicked on {} source, using raw text", language);
                code.to_string()
            }
        }
    }
}
