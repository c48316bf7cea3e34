//! Syntax highlighting module
//!
//! Provides tree-sitter based highlighting that renders to HTML markup:
//! - Language resolution from snippet tags and file extensions
//! - Highlight extraction from per-language queries
//! - Line-oriented markup with optional marked lines
//!
//! ## Pipeline
//!
//! ```text
//! (code, tag, marked lines) → LanguageId::from_tag → GrammarSet::tokenize
//!                           → LineHighlights::segments → render_html
//! ```
//!
//! Any failure along the way yields the input code unchanged.

mod highlighter;
mod highlights;
mod languages;
mod markup;
mod parser;

pub use highlighter::{Highlighter, Render};
pub use highlights::{
    css_class, highlight_id_for_name, HighlightId, HighlightToken, LineHighlights, Segment,
    SyntaxHighlights, HIGHLIGHT_NAMES,
};
pub use languages::{LanguageId, EXAMPLE_EXTENSIONS};
pub use markup::{escape_html, render_html, MARKED_LINE_CLASS};
pub use parser::{GrammarSet, TokenizeError};
