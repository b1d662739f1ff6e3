//! Session-wide category index of equipment items.
//!
//! The index is built once from every configured item source and read-only
//! afterwards. Items are bucketed by their base category; the aggregate
//! categories (`sim`, `mar`, `armor`, `tool`) are always recomputed as unions
//! of their constituents and never populated directly.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use futures_util::future::join_all;
use outfitter_domain::{
    CategoryKey, ContentDocument, DocumentId, DocumentUuid, ItemDocument,
};
use serde::Serialize;
use tokio::sync::OnceCell;

use super::sources::{read_source_list, ITEM_SOURCES_KEY};
use crate::infrastructure::ports::{ContentPort, SettingsPort};

/// One bucket of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    pub label: String,
    pub items: BTreeSet<DocumentUuid>,
}

impl CategoryEntry {
    fn new(key: CategoryKey) -> Self {
        Self {
            label: key.label().to_string(),
            items: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    categories: BTreeMap<CategoryKey, CategoryEntry>,
    ids: HashMap<DocumentId, DocumentUuid>,
    items: HashMap<DocumentUuid, ItemDocument>,
}

impl CategoryIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = ItemDocument>) -> Self {
        let mut index = Self::default();
        for item in items {
            index.insert(item);
        }
        index.recompute_aggregates();
        index
    }

    /// Add an item; returns whether it landed in a category bucket.
    ///
    /// Non-equipment and magical items are skipped entirely.
    fn insert(&mut self, item: ItemDocument) -> bool {
        if !item.item_type.is_equipment() || item.is_magical() {
            return false;
        }

        self.ids
            .entry(item.id.clone())
            .or_insert_with(|| item.uuid.clone());

        let bucketed = match item.category() {
            Some(key) => {
                self.categories
                    .entry(key)
                    .or_insert_with(|| CategoryEntry::new(key))
                    .items
                    .insert(item.uuid.clone());
                true
            }
            None => false,
        };

        self.items.insert(item.uuid.clone(), item);
        bucketed
    }

    fn recompute_aggregates(&mut self) {
        for aggregate in CategoryKey::aggregate_keys() {
            let mut entry = CategoryEntry::new(aggregate);
            for constituent in aggregate.constituents() {
                if let Some(base) = self.categories.get(constituent) {
                    entry.items.extend(base.items.iter().cloned());
                }
            }
            self.categories.insert(aggregate, entry);
        }
    }

    /// Items of a category sorted by display name; empty for unknown keys.
    pub fn lookup(&self, key: CategoryKey) -> Vec<&ItemDocument> {
        let Some(entry) = self.categories.get(&key) else {
            return Vec::new();
        };
        let mut items: Vec<&ItemDocument> = entry
            .items
            .iter()
            .filter_map(|uuid| self.items.get(uuid))
            .collect();
        items.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.uuid.cmp(&b.uuid))
        });
        items
    }

    pub fn entry(&self, key: CategoryKey) -> Option<&CategoryEntry> {
        self.categories.get(&key)
    }

    pub fn item(&self, uuid: &DocumentUuid) -> Option<&ItemDocument> {
        self.items.get(uuid)
    }

    pub fn uuid_for_id(&self, id: &DocumentId) -> Option<&DocumentUuid> {
        self.ids.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Lazily built [`CategoryIndex`] plus reference resolution.
pub struct ContentIndex {
    content: Arc<dyn ContentPort>,
    settings: Arc<dyn SettingsPort>,
    namespace: String,
    batch_size: usize,
    index: OnceCell<CategoryIndex>,
}

impl ContentIndex {
    pub fn new(
        content: Arc<dyn ContentPort>,
        settings: Arc<dyn SettingsPort>,
        namespace: impl Into<String>,
        batch_size: usize,
    ) -> Self {
        Self {
            content,
            settings,
            namespace: namespace.into(),
            batch_size: batch_size.max(1),
            index: OnceCell::new(),
        }
    }

    /// Build the index once; concurrent and repeated callers share the result.
    pub async fn build(&self) -> &CategoryIndex {
        self.index.get_or_init(|| self.build_index()).await
    }

    pub fn is_built(&self) -> bool {
        self.index.initialized()
    }

    async fn build_index(&self) -> CategoryIndex {
        let sources =
            match read_source_list(self.settings.as_ref(), &self.namespace, ITEM_SOURCES_KEY).await
            {
                Ok(sources) => sources,
                Err(e) => {
                    // The build still completes, with an empty index.
                    tracing::warn!(error = %e, "Failed to read item sources, category index will be empty");
                    return CategoryIndex::empty();
                }
            };

        let enumerated = join_all(
            sources
                .iter()
                .map(|source| self.content.enumerate_source(source)),
        )
        .await;

        let mut index = CategoryIndex::empty();
        let mut scanned = 0usize;
        let mut bucketed = 0usize;
        for (source, result) in sources.iter().zip(enumerated) {
            let documents = match result {
                Ok(documents) => documents,
                Err(e) => {
                    tracing::warn!(source = %source, error = %e, "Skipping item source that could not be enumerated");
                    continue;
                }
            };

            for document in documents {
                if let ContentDocument::Item(item) = document {
                    if index.insert(item) {
                        bucketed += 1;
                    }
                }
                scanned += 1;
                if scanned % self.batch_size == 0 {
                    tokio::task::yield_now().await;
                }
            }
        }
        index.recompute_aggregates();

        tracing::info!(
            sources = sources.len(),
            scanned,
            indexed = index.len(),
            bucketed,
            "Built equipment category index"
        );
        index
    }

    /// Items of a category, building the index first if needed.
    pub async fn lookup(&self, key: CategoryKey) -> Vec<ItemDocument> {
        self.build()
            .await
            .lookup(key)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Resolve a reference to an item document.
    ///
    /// Tries the content library directly, then the index's id map, then a
    /// linear search of the configured item sources by id or identifier.
    pub async fn resolve(&self, reference: &DocumentUuid) -> Option<ItemDocument> {
        match self.content.resolve(reference).await {
            Ok(Some(ContentDocument::Item(item))) => return Some(item),
            Ok(Some(ContentDocument::Source(_))) => {
                tracing::debug!(reference = %reference, "Reference points at a class or background, not an item");
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(reference = %reference, error = %e, "Direct item lookup failed");
            }
        }

        let id = reference.trailing_id();
        let index = self.build().await;
        if let Some(uuid) = index.uuid_for_id(&id) {
            if let Some(item) = index.item(uuid) {
                return Some(item.clone());
            }
        }

        self.search_sources(&id).await
    }

    async fn search_sources(&self, id: &DocumentId) -> Option<ItemDocument> {
        let sources =
            match read_source_list(self.settings.as_ref(), &self.namespace, ITEM_SOURCES_KEY).await
            {
                Ok(sources) => sources,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read item sources for fallback search");
                    return None;
                }
            };

        for source in &sources {
            match self.content.enumerate_source(source).await {
                Ok(documents) => {
                    let found = documents.into_iter().find_map(|document| match document {
                        ContentDocument::Item(item) if matches_id(&item, id) => Some(item),
                        _ => None,
                    });
                    if found.is_some() {
                        return found;
                    }
                }
                Err(e) => {
                    tracing::warn!(source = %source, error = %e, "Skipping item source during fallback search");
                }
            }
        }

        tracing::debug!(id = %id, "Item reference could not be resolved");
        None
    }
}

fn matches_id(item: &ItemDocument, id: &DocumentId) -> bool {
    item.id == *id || item.identifier() == id.as_str()
}

impl std::fmt::Debug for ContentIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentIndex")
            .field("namespace", &self.namespace)
            .field("batch_size", &self.batch_size)
            .field("built", &self.is_built())
            .finish()
    }
}
