//! In-memory content library.
//!
//! Implements the content, settings and chat ports over plain maps. The
//! demo binary and the scenario tests run against it; a host integration
//! would provide its own adapters instead.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use outfitter_domain::{ContentDocument, DocumentUuid, SourceId};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::error::EngineError;
use super::ports::{
    ChatError, ChatPort, ContentError, ContentPort, RollAnnouncement, SettingsError, SettingsPort,
};

/// Serialized form of a library: documents per source plus settings per
/// namespace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    #[serde(default)]
    pub sources: BTreeMap<String, Vec<ContentDocument>>,
    #[serde(default)]
    pub settings: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Default)]
struct Documents {
    by_source: HashMap<SourceId, Vec<ContentDocument>>,
    by_uuid: HashMap<DocumentUuid, ContentDocument>,
}

impl Documents {
    fn insert(&mut self, source: SourceId, document: ContentDocument) {
        self.by_uuid.insert(document.uuid().clone(), document.clone());
        let entries = self.by_source.entry(source).or_default();
        entries.retain(|existing| existing.uuid() != document.uuid());
        entries.push(document);
    }
}

#[derive(Debug, Default)]
pub struct MemoryContentLibrary {
    documents: RwLock<Documents>,
    settings: RwLock<HashMap<(String, String), serde_json::Value>>,
    published: RwLock<Vec<RollAnnouncement>>,
}

impl MemoryContentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library from a JSON [`LibrarySnapshot`].
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let snapshot: LibrarySnapshot = serde_json::from_str(json)?;
        let mut library = Self::new();
        for (source, documents) in snapshot.sources {
            library = library.with_documents(SourceId::new(source), documents);
        }
        for (namespace, values) in snapshot.settings {
            for (key, value) in values {
                library = library.with_setting(&namespace, &key, value);
            }
        }
        Ok(library)
    }

    pub fn with_documents(
        mut self,
        source: SourceId,
        documents: impl IntoIterator<Item = ContentDocument>,
    ) -> Self {
        let store = self.documents.get_mut();
        store.by_source.entry(source.clone()).or_default();
        for document in documents {
            store.insert(source.clone(), document);
        }
        self
    }

    pub fn with_setting(mut self, namespace: &str, key: &str, value: serde_json::Value) -> Self {
        self.settings
            .get_mut()
            .insert((namespace.to_string(), key.to_string()), value);
        self
    }

    pub async fn insert_document(&self, source: SourceId, document: ContentDocument) {
        self.documents.write().await.insert(source, document);
    }

    pub async fn set_setting(&self, namespace: &str, key: &str, value: serde_json::Value) {
        self.settings
            .write()
            .await
            .insert((namespace.to_string(), key.to_string()), value);
    }

    /// Rolls announced through [`ChatPort`], oldest first.
    pub async fn published_rolls(&self) -> Vec<RollAnnouncement> {
        self.published.read().await.clone()
    }

    pub async fn document_count(&self) -> usize {
        self.documents.read().await.by_uuid.len()
    }
}

#[async_trait]
impl ContentPort for MemoryContentLibrary {
    async fn resolve(&self, uuid: &DocumentUuid) -> Result<Option<ContentDocument>, ContentError> {
        Ok(self.documents.read().await.by_uuid.get(uuid).cloned())
    }

    async fn enumerate_source(
        &self,
        source: &SourceId,
    ) -> Result<Vec<ContentDocument>, ContentError> {
        self.documents
            .read()
            .await
            .by_source
            .get(source)
            .cloned()
            .ok_or_else(|| ContentError::SourceNotFound(source.to_string()))
    }
}

#[async_trait]
impl SettingsPort for MemoryContentLibrary {
    async fn get_setting(
        &self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, SettingsError> {
        Ok(self
            .settings
            .read()
            .await
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }
}

#[async_trait]
impl ChatPort for MemoryContentLibrary {
    async fn publish_roll(&self, announcement: RollAnnouncement) -> Result<(), ChatError> {
        tracing::info!(
            source = %announcement.source,
            total = announcement.roll.total,
            "{}",
            announcement.flavor()
        );
        self.published.write().await.push(announcement);
        Ok(())
    }
}
