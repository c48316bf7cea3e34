//! Syntax highlighting data structures
//!
//! Defines tokens, per-line highlights, and the flattening step that turns
//! overlapping captures into non-overlapping segments for markup.

use std::collections::HashMap;

use super::languages::LanguageId;

/// Standard tree-sitter capture names.
/// Index into this array is the HighlightId.
pub const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",             // @attribute
    "boolean",               // @boolean (true, false)
    "comment",               // @comment
    "constant",              // @constant
    "constant.builtin",      // @constant.builtin (null, nil)
    "constructor",           // @constructor (new Foo)
    "escape",                // @escape (string escapes)
    "function",              // @function
    "function.builtin",      // @function.builtin (echo, print)
    "function.macro",        // @function.macro (println!)
    "function.method",       // @function.method
    "keyword",               // @keyword
    "keyword.return",        // @keyword.return
    "keyword.function",      // @keyword.function (function, fn)
    "keyword.operator",      // @keyword.operator (and, or)
    "label",                 // @label
    "number",                // @number
    "operator",              // @operator
    "property",              // @property
    "punctuation",           // @punctuation (general)
    "punctuation.bracket",   // @punctuation.bracket
    "punctuation.delimiter", // @punctuation.delimiter
    "punctuation.special",   // @punctuation.special
    "string",                // @string
    "string.special",        // @string.special (regex, heredoc)
    "tag",                   // @tag (HTML and JSX tags)
    "tag.attribute",         // @tag.attribute
    "type",                  // @type
    "type.builtin",          // @type.builtin (int, string, bool)
    "variable",              // @variable
    "variable.builtin",      // @variable.builtin (this, self)
    "variable.parameter",    // @variable.parameter
];

/// Index into HIGHLIGHT_NAMES
pub type HighlightId = u16;

/// A single highlighted span within a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightToken {
    /// Start byte within the line (inclusive)
    pub start: usize,
    /// End byte within the line (exclusive)
    pub end: usize,
    /// Index into HIGHLIGHT_NAMES
    pub highlight: HighlightId,
}

/// A run of bytes that renders with one (or no) highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub highlight: Option<HighlightId>,
}

/// Highlight information for a single line
#[derive(Debug, Clone, Default)]
pub struct LineHighlights {
    /// Tokens in capture order; may overlap
    pub tokens: Vec<HighlightToken>,
}

impl LineHighlights {
    /// Flatten possibly-overlapping tokens into contiguous segments covering
    /// `0..line_len`.
    ///
    /// Narrower tokens override the ranges they sit inside. For tokens with
    /// an identical range the first one captured wins.
    pub fn segments(&self, line_len: usize) -> Vec<Segment> {
        let mut order: Vec<usize> = (0..self.tokens.len()).collect();
        // Wider first, so nested tokens paint over their parents
        order.sort_by_key(|&i| {
            let t = &self.tokens[i];
            (t.start, std::cmp::Reverse(t.end), std::cmp::Reverse(i))
        });

        let mut paint: Vec<Option<HighlightId>> = vec![None; line_len];
        for i in order {
            let token = &self.tokens[i];
            let end = token.end.min(line_len);
            for cell in paint.iter_mut().take(end).skip(token.start) {
                *cell = Some(token.highlight);
            }
        }

        let mut segments: Vec<Segment> = Vec::new();
        for (pos, highlight) in paint.into_iter().enumerate() {
            match segments.last_mut() {
                Some(last) if last.highlight == highlight => last.end = pos + 1,
                _ => segments.push(Segment {
                    start: pos,
                    end: pos + 1,
                    highlight,
                }),
            }
        }
        segments
    }
}

/// Complete highlight state for one piece of source
#[derive(Debug, Clone)]
pub struct SyntaxHighlights {
    /// Map of line number (0-indexed) → tokens
    pub lines: HashMap<usize, LineHighlights>,
    /// Language the source was tokenized as
    pub language: LanguageId,
}

impl SyntaxHighlights {
    /// Create new empty highlights for a language
    pub fn new(language: LanguageId) -> Self {
        Self {
            lines: HashMap::new(),
            language,
        }
    }

    /// Get highlights for a specific line
    pub fn get_line(&self, line: usize) -> Option<&LineHighlights> {
        self.lines.get(&line)
    }

    /// Record a token on a line, dropping empty ranges
    pub fn push(&mut self, line: usize, start: usize, end: usize, highlight: HighlightId) {
        if start < end {
            self.lines
                .entry(line)
                .or_default()
                .tokens
                .push(HighlightToken {
                    start,
                    end,
                    highlight,
                });
        }
    }
}

/// Look up highlight ID by capture name
pub fn highlight_id_for_name(name: &str) -> Option<HighlightId> {
    // Handle hierarchical names: try exact match first, then progressively shorter
    // parents (e.g. "keyword.control.import" -> "keyword.control" -> "keyword").
    let mut current = name;
    loop {
        if let Some(pos) = HIGHLIGHT_NAMES.iter().position(|&n| n == current) {
            return Some(pos as HighlightId);
        }

        let Some(dot_pos) = current.rfind('.') else {
            break;
        };
        current = &current[..dot_pos];
    }

    None
}

/// CSS class for a highlight: `hl-` followed by the capture name with dots
/// replaced by dashes
pub fn css_class(id: HighlightId) -> String {
    let name = HIGHLIGHT_NAMES
        .get(id as usize)
        .copied()
        .unwrap_or("unknown");
    format!("hl-{}", name.replace('.', "-"))
}
