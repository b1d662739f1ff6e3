//! Grant data service.
//!
//! Loads a class or background document and extracts what the renderer
//! needs: the assembled grant tree, level-one proficiencies, declared
//! starting wealth and, for sources without structured equipment, a blurb
//! recovered from the description.

use std::sync::Arc;

use futures_util::future::join_all;
use outfitter_domain::{
    ContentDocument, DocumentUuid, GrantTree, ProficiencySet, SourceDocument, SourceKind,
    WealthValue,
};

use super::error::GrantError;
use super::fallback_description::extract_fallback_description;
use super::sources::{read_source_list, settings_key, SelectedSource};
use crate::infrastructure::ports::{ContentPort, SettingsPort};

/// Everything the renderer needs from one source document.
#[derive(Debug, Clone)]
pub struct GrantData {
    pub source: SourceKind,
    pub source_uuid: DocumentUuid,
    pub source_name: String,
    pub tree: GrantTree,
    pub proficiencies: ProficiencySet,
    pub wealth: Option<WealthValue>,
    pub fallback_description: Option<String>,
}

impl GrantData {
    fn from_document(document: SourceDocument) -> Self {
        let tree = document.grant_tree();
        for rejected in &tree.rejected {
            tracing::warn!(
                source = %document.name,
                grant_id = %rejected.id,
                reason = %rejected.reason,
                "Rejected starting equipment entry"
            );
        }

        let wealth = match document.wealth_value() {
            Some(Ok(wealth)) => Some(wealth),
            Some(Err(e)) => {
                tracing::warn!(source = %document.name, error = %e, "Ignoring unparsable starting wealth");
                None
            }
            None => None,
        };

        let fallback_description = if tree.is_empty() {
            extract_fallback_description(&document.description)
        } else {
            None
        };

        Self {
            source: document.kind,
            proficiencies: document.proficiencies(),
            source_uuid: document.uuid,
            source_name: document.name,
            tree,
            wealth,
            fallback_description,
        }
    }

    /// Whether the source declares any structured starting equipment.
    pub fn has_equipment(&self) -> bool {
        !self.tree.is_empty()
    }
}

pub struct GrantService {
    content: Arc<dyn ContentPort>,
    settings: Arc<dyn SettingsPort>,
    namespace: String,
}

impl GrantService {
    pub fn new(
        content: Arc<dyn ContentPort>,
        settings: Arc<dyn SettingsPort>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            content,
            settings,
            namespace: namespace.into(),
        }
    }

    /// Fetch a source's grant data, fresh on every call.
    pub async fn fetch_grants(
        &self,
        kind: SourceKind,
        selected: &SelectedSource,
    ) -> Result<GrantData, GrantError> {
        let document = match self.content.resolve(&selected.uuid).await {
            Ok(Some(ContentDocument::Source(document))) => Some(document),
            Ok(Some(ContentDocument::Item(_))) => {
                return Err(GrantError::WrongKind {
                    reference: selected.uuid.to_string(),
                    expected: kind,
                })
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(reference = %selected.uuid, error = %e, "Source lookup failed, searching configured sources");
                None
            }
        };

        let document = match document {
            Some(document) => document,
            None => self.search_sources(kind, selected).await?.ok_or_else(|| {
                GrantError::SourceNotFound {
                    kind,
                    reference: selected.uuid.to_string(),
                }
            })?,
        };

        if document.kind != kind {
            return Err(GrantError::WrongKind {
                reference: selected.uuid.to_string(),
                expected: kind,
            });
        }

        let data = GrantData::from_document(document);
        tracing::debug!(
            source = %kind,
            name = %data.source_name,
            nodes = data.tree.node_count(),
            rejected = data.tree.rejected.len(),
            proficiencies = data.proficiencies.len(),
            "Fetched starting equipment grants"
        );
        Ok(data)
    }

    async fn search_sources(
        &self,
        kind: SourceKind,
        selected: &SelectedSource,
    ) -> Result<Option<SourceDocument>, GrantError> {
        let sources =
            read_source_list(self.settings.as_ref(), &self.namespace, settings_key(kind)).await?;

        let enumerated = join_all(
            sources
                .iter()
                .map(|source| self.content.enumerate_source(source)),
        )
        .await;

        for (source, result) in sources.iter().zip(enumerated) {
            let documents = match result {
                Ok(documents) => documents,
                Err(e) => {
                    tracing::warn!(source = %source, error = %e, "Skipping source during fallback search");
                    continue;
                }
            };
            let found = documents.into_iter().find_map(|document| match document {
                ContentDocument::Source(source)
                    if source.kind == kind && source.matches_id(selected.id.as_str()) =>
                {
                    Some(source)
                }
                _ => None,
            });
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }
}
