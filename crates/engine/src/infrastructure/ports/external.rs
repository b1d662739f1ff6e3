//! Host collaborator ports (content library, settings store, chat).

use async_trait::async_trait;
use outfitter_domain::{ContentDocument, DiceRollResult, DocumentUuid, SourceId, SourceKind};
use serde::{Deserialize, Serialize};

use super::error::{ChatError, ContentError, SettingsError};

// =============================================================================
// Content Library
// =============================================================================

/// Document lookup against the host's content library.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentPort: Send + Sync {
    /// Resolve a canonical reference. `Ok(None)` when nothing answers to it.
    async fn resolve(&self, uuid: &DocumentUuid) -> Result<Option<ContentDocument>, ContentError>;

    /// Every document of a content source (compendium pack).
    async fn enumerate_source(&self, source: &SourceId)
        -> Result<Vec<ContentDocument>, ContentError>;
}

// =============================================================================
// Settings Store
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsPort: Send + Sync {
    async fn get_setting(
        &self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, SettingsError>;
}

// =============================================================================
// Chat
// =============================================================================

/// A public starting-wealth roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollAnnouncement {
    pub source: SourceKind,
    pub source_name: String,
    pub roll: DiceRollResult,
}

impl RollAnnouncement {
    pub fn flavor(&self) -> String {
        format!("Starting wealth ({}: {})", self.source.label(), self.source_name)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatPort: Send + Sync {
    async fn publish_roll(&self, announcement: RollAnnouncement) -> Result<(), ChatError>;
}
