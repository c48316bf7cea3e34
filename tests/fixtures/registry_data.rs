// @generated by snippet-registry. Do not edit by hand.

pub static REGISTRY: snippet_registry::artifact::StaticRegistry = snippet_registry::artifact::StaticRegistry {
    last_generated: "2026-03-01T12:00:00+00:00",
    files: &[
        snippet_registry::artifact::StaticEntry {
            id: "basics/const",
            raw: "const x = 1;",
            highlighted: "<pre class=\"code-block\" data-language=\"ts\"><code><span class=\"line\"><span class=\"hl-keyword\">const</span> x = 1;</span></code></pre>",
            language: "ts",
            title: Some("Constant"),
            description: None,
            highlight_lines: &[],
        },
        snippet_registry::artifact::StaticEntry {
            id: "editor/quotes.txt",
            raw: "say \"hi\"\n\tdone \\ café",
            highlighted: "<pre class=\"code-block\" data-language=\"text\"><code><span class=\"line\">say &quot;hi&quot;</span>\n<span class=\"line highlighted\">\tdone \\ café</span></code></pre>",
            language: "text",
            title: None,
            description: Some("Quotes, tabs & a backslash"),
            highlight_lines: &[2],
        },
    ],
};
