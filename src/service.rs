//! Runtime registry service
//!
//! Serves lookups from the compiled artifacts. The data artifact is
//! immutable; the only mutable state is the highlight cache for ids that
//! exist solely in the descriptor table. Concurrent misses on one id share a
//! single in-flight render.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;

use crate::artifact::{DescriptorSource, StaticRegistry};
use crate::descriptor::SnippetDescriptor;
use crate::loader::parse_descriptors;
use crate::registry::{EntryMetadata, Registry};
use crate::syntax::{Highlighter, Render};

/// Descriptors rebuilt from the loader-module artifact, keyed by id
#[derive(Debug, Clone, Default)]
pub struct DescriptorTable {
    entries: HashMap<String, SnippetDescriptor>,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later descriptors replace earlier ones with the same id
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = SnippetDescriptor>) -> Self {
        let mut table = Self::new();
        for descriptor in descriptors {
            table.insert(descriptor);
        }
        table
    }

    /// Parse every embedded descriptor module in order. A module that fails
    /// to parse contributes nothing.
    pub fn from_sources(sources: &[DescriptorSource]) -> Self {
        let mut table = Self::new();
        for source in sources {
            match parse_descriptors(source.contents, source.path) {
                Ok(descriptors) => {
                    for descriptor in descriptors {
                        table.insert(descriptor);
                    }
                }
                Err(e) => tracing::warn!("Skipping embedded descriptor module: {}", e),
            }
        }
        tracing::debug!(
            "Descriptor table holds {} ids from {} modules",
            table.len(),
            sources.len()
        );
        table
    }

    pub fn insert(&mut self, descriptor: SnippetDescriptor) {
        if let Some(previous) = self.entries.insert(descriptor.id.clone(), descriptor) {
            tracing::debug!("Descriptor `{}` replaced by a later module", previous.id);
        }
    }

    pub fn get(&self, id: &str) -> Option<&SnippetDescriptor> {
        self.entries.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

type PendingRender = Shared<BoxFuture<'static, Arc<str>>>;

enum Slot {
    Ready(Arc<str>),
    Pending(PendingRender),
}

type Cache = Arc<Mutex<HashMap<String, Slot>>>;

/// Lookup surface over the compiled registry.
///
/// Construct once at startup and share (it is `Send + Sync`).
/// [`get_highlighted`](Self::get_highlighted) must run inside a Tokio
/// runtime, since cache misses render on the blocking pool.
pub struct RegistryService {
    registry: Registry,
    descriptors: DescriptorTable,
    renderer: Arc<dyn Render>,
    cache: Cache,
}

impl RegistryService {
    pub fn new(registry: Registry, descriptors: DescriptorTable, renderer: Arc<dyn Render>) -> Self {
        tracing::debug!(
            "Registry service: {} compiled entries, {} descriptors",
            registry.len(),
            descriptors.len()
        );
        Self {
            registry,
            descriptors,
            renderer,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Build from the generated `REGISTRY` and `DESCRIPTOR_SOURCES` statics,
    /// highlighting misses with the tree-sitter [`Highlighter`]
    pub fn from_static(registry: &StaticRegistry, sources: &[DescriptorSource]) -> Self {
        Self::new(
            Registry::from_static(registry),
            DescriptorTable::from_sources(sources),
            Arc::new(Highlighter::new()),
        )
    }

    /// Raw source for `id`. Never highlights.
    pub fn get_raw(&self, id: &str) -> Option<&str> {
        self.registry
            .get(id)
            .map(|entry| entry.raw.as_str())
            .or_else(|| self.descriptors.get(id).map(|d| d.code.as_str()))
    }

    /// Highlighted markup for `id`, or `None` for an unknown id.
    ///
    /// Precomputed entries return immediately. Otherwise the descriptor is
    /// rendered once and cached for the life of the service; concurrent
    /// callers for the same id await the same render. Dropping the returned
    /// future does not cancel a render already started.
    pub async fn get_highlighted(&self, id: &str) -> Option<String> {
        if let Some(entry) = self.registry.get(id) {
            return Some(entry.highlighted.clone());
        }
        let descriptor = self.descriptors.get(id)?;

        let pending = {
            let mut cache = self.cache.lock();
            match cache.get(id) {
                Some(Slot::Ready(html)) => return Some(html.to_string()),
                Some(Slot::Pending(pending)) => pending.clone(),
                None => {
                    let pending = self.spawn_render(descriptor);
                    cache.insert(id.to_string(), Slot::Pending(pending.clone()));
                    pending
                }
            }
        };

        Some(pending.await.to_string())
    }

    /// Start rendering on the blocking pool. The blocking task promotes the
    /// cache slot itself, so completion does not depend on any caller.
    fn spawn_render(&self, descriptor: &SnippetDescriptor) -> PendingRender {
        let id = descriptor.id.clone();
        let code = descriptor.code.clone();
        let language = descriptor.language.clone();
        let marked = descriptor.highlight_lines.clone();
        let renderer = Arc::clone(&self.renderer);
        let cache = Arc::clone(&self.cache);

        tracing::debug!("Highlighting `{}` on demand", id);
        let handle = tokio::task::spawn_blocking({
            let id = id.clone();
            let cache = Arc::clone(&cache);
            move || {
                let html: Arc<str> = renderer.render(&code, &language, &marked).into();
                cache.lock().insert(id, Slot::Ready(Arc::clone(&html)));
                html
            }
        });

        let fallback: Arc<str> = descriptor.code.as_str().into();
        async move {
            match handle.await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("Highlighting `{}` failed, serving raw text: {}", id, e);
                    cache.lock().insert(id, Slot::Ready(Arc::clone(&fallback)));
                    fallback
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Every known id, sorted: compiled entries plus descriptor-only ids
    pub fn list_ids(&self) -> Vec<String> {
        let ids: BTreeSet<&str> = self
            .registry
            .files
            .keys()
            .map(String::as_str)
            .chain(self.descriptors.ids())
            .collect();
        ids.into_iter().map(str::to_string).collect()
    }

    /// Display metadata of a compiled entry
    pub fn metadata(&self, id: &str) -> Option<&EntryMetadata> {
        self.registry.get(id).map(|entry| &entry.metadata)
    }

    pub fn last_generated(&self) -> DateTime<Utc> {
        self.registry.last_generated
    }

    /// Number of ids with a cached or in-flight render
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}
