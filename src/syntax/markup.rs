//! Highlight tokens to HTML markup
//!
//! Every source line becomes one `<span class="line">`; marked lines carry
//! the extra `highlighted` class.

use std::collections::BTreeSet;

use super::highlights::{css_class, SyntaxHighlights};

/// Class added to marked lines
pub const MARKED_LINE_CLASS: &str = "highlighted";

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

/// Render `source` with its highlights as a `<pre><code>` block
///
/// `marked` holds 1-based line numbers; numbers past the last line are ignored.
pub fn render_html(
    source: &str,
    tag: &str,
    highlights: &SyntaxHighlights,
    marked: &BTreeSet<u32>,
) -> String {
    let mut out = String::with_capacity(source.len() * 2 + 64);
    out.push_str("<pre class=\"code-block\" data-language=\"");
    escape_html(tag, &mut out);
    out.push_str("\"><code>");

    for (row, line) in source.split('\n').enumerate() {
        if row > 0 {
            out.push('\n');
        }

        let line_number = u32::try_from(row + 1).unwrap_or(u32::MAX);
        if marked.contains(&line_number) {
            out.push_str("<span class=\"line ");
            out.push_str(MARKED_LINE_CLASS);
            out.push_str("\">");
        } else {
            out.push_str("<span class=\"line\">");
        }

        match highlights.get_line(row) {
            Some(line_highlights) => {
                for segment in line_highlights.segments(line.len()) {
                    // Token boundaries come from tree-sitter nodes; skip anything
                    // that would split a character rather than panic
                    let Some(text) = line.get(segment.start..segment.end) else {
                        continue;
                    };
                    match segment.highlight {
                        Some(id) => {
                            out.push_str("<span class=\"");
                            out.push_str(&css_class(id));
                            out.push_str("\">");
                            escape_html(text, &mut out);
                            out.push_str("</span>");
                        }
                        None => escape_html(text, &mut out),
                    }
                }
            }
            None => escape_html(line, &mut out),
        }

        out.push_str("</span>");
    }

    out.push_str("</code></pre>");
    out
}
