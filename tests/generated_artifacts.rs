//! Checked-in artifacts in the generated format compile and load back

use std::path::Path;

use snippet_registry::codegen::{render_data_rust, render_loader};
use snippet_registry::{Registry, RegistryService};

mod generated {
    include!("fixtures/registry_data.rs");
    include!("fixtures/registry_loader.rs");
}

fn service() -> RegistryService {
    RegistryService::from_static(&generated::REGISTRY, generated::DESCRIPTOR_SOURCES)
}

#[test]
fn test_generated_data_loads() {
    let service = service();

    assert_eq!(
        service.get_raw("editor/quotes.txt"),
        Some("say \"hi\"\n\tdone \\ café")
    );
    assert_eq!(service.get_raw("basics/const"), Some("const x = 1;"));
    assert_eq!(
        service.last_generated().to_rfc3339(),
        "2026-03-01T12:00:00+00:00"
    );

    let quotes = service.metadata("editor/quotes.txt").unwrap();
    assert_eq!(quotes.language, "text");
    assert_eq!(quotes.title, None);
    assert_eq!(
        quotes.description.as_deref(),
        Some("Quotes, tabs & a backslash")
    );
    assert_eq!(quotes.highlight_lines.iter().copied().collect::<Vec<_>>(), vec![2]);
    assert_eq!(
        service.metadata("basics/const").unwrap().title.as_deref(),
        Some("Constant")
    );
}

#[test]
fn test_generated_loader_embeds_descriptors() {
    let service = service();

    assert_eq!(
        service.list_ids(),
        vec!["basics/const", "editor/quotes.txt", "lazy"]
    );
    assert_eq!(service.get_raw("lazy"), Some("let a = 1;\nlet b = a + 1;"));
    assert!(service.metadata("lazy").is_none());
}

#[tokio::test]
async fn test_embedded_descriptor_highlights_on_demand() {
    let service = service();

    let precomputed = service.get_highlighted("editor/quotes.txt").await.unwrap();
    assert!(precomputed.contains("say &quot;hi&quot;"));

    let html = service.get_highlighted("lazy").await.unwrap();
    assert!(html.starts_with("<pre class=\"code-block\" data-language=\"js\">"));
    assert_eq!(html.matches("line highlighted").count(), 1);
    assert_eq!(service.cached_len(), 1);
}

#[test]
fn test_data_fixture_matches_renderer() {
    let registry = Registry::from_static(&generated::REGISTRY);

    assert_eq!(
        render_data_rust(&registry, "snippet_registry"),
        include_str!("fixtures/registry_data.rs")
    );
}

#[test]
fn test_loader_fixture_matches_renderer() {
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");
    let descriptor = fixtures.join("snippets").join("snippets.yaml");

    assert_eq!(
        render_loader(&[descriptor], &fixtures, "snippet_registry"),
        include_str!("fixtures/registry_loader.rs")
    );
}
