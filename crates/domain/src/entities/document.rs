//! Any document the content library can hand back.

use serde::{Deserialize, Serialize};

use super::item::ItemDocument;
use super::source::SourceDocument;
use crate::ids::DocumentUuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "document", rename_all = "snake_case")]
pub enum ContentDocument {
    Item(ItemDocument),
    Source(SourceDocument),
}

impl ContentDocument {
    pub fn uuid(&self) -> &DocumentUuid {
        match self {
            Self::Item(item) => &item.uuid,
            Self::Source(source) => &source.uuid,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Item(item) => &item.name,
            Self::Source(source) => &source.name,
        }
    }

    pub fn into_item(self) -> Option<ItemDocument> {
        match self {
            Self::Item(item) => Some(item),
            Self::Source(_) => None,
        }
    }

    pub fn into_source(self) -> Option<SourceDocument> {
        match self {
            Self::Source(source) => Some(source),
            Self::Item(_) => None,
        }
    }
}

impl From<ItemDocument> for ContentDocument {
    fn from(item: ItemDocument) -> Self {
        Self::Item(item)
    }
}

impl From<SourceDocument> for ContentDocument {
    fn from(source: SourceDocument) -> Self {
        Self::Source(source)
    }
}
