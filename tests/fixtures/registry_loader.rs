// @generated by snippet-registry. Do not edit by hand.

pub static DESCRIPTOR_SOURCES: &[snippet_registry::artifact::DescriptorSource] = &[
    snippet_registry::artifact::DescriptorSource {
        path: "snippets/snippets.yaml",
        contents: include_str!("snippets/snippets.yaml"),
    },
];
