//! Configured content sources and the wizard's current picks.

use outfitter_domain::{DocumentId, DocumentUuid, SourceId, SourceKind};
use serde::{Deserialize, Serialize};

use super::error::IndexError;
use crate::infrastructure::ports::SettingsPort;

pub const ITEM_SOURCES_KEY: &str = "itemSources";
pub const CLASS_SOURCES_KEY: &str = "classSources";
pub const BACKGROUND_SOURCES_KEY: &str = "backgroundSources";

/// Settings key listing the sources that hold documents of `kind`.
pub fn settings_key(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Class => CLASS_SOURCES_KEY,
        SourceKind::Background => BACKGROUND_SOURCES_KEY,
    }
}

/// A class or background chosen in the wizard.
///
/// Carries both the canonical reference and the short id so a stale
/// reference can still be found by searching the configured sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedSource {
    pub uuid: DocumentUuid,
    pub id: DocumentId,
}

impl SelectedSource {
    pub fn new(uuid: impl Into<DocumentUuid>) -> Self {
        let uuid = uuid.into();
        Self {
            id: uuid.trailing_id(),
            uuid,
        }
    }

    pub fn with_id(mut self, id: impl Into<DocumentId>) -> Self {
        self.id = id.into();
        self
    }
}

/// The wizard's current class and background, passed explicitly to renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedSources {
    pub class: Option<SelectedSource>,
    pub background: Option<SelectedSource>,
}

impl SelectedSources {
    pub fn new(class: Option<SelectedSource>, background: Option<SelectedSource>) -> Self {
        Self { class, background }
    }

    pub fn get(&self, kind: SourceKind) -> Option<&SelectedSource> {
        match kind {
            SourceKind::Class => self.class.as_ref(),
            SourceKind::Background => self.background.as_ref(),
        }
    }
}

/// Read a source list setting.
///
/// Accepts a JSON array of source ids or a comma separated string. A missing
/// setting is an empty list. Duplicates keep their first position.
pub async fn read_source_list(
    settings: &dyn SettingsPort,
    namespace: &str,
    key: &str,
) -> Result<Vec<SourceId>, IndexError> {
    let Some(value) = settings.get_setting(namespace, key).await? else {
        return Ok(Vec::new());
    };
    parse_source_list(key, &value)
}

fn parse_source_list(key: &str, value: &serde_json::Value) -> Result<Vec<SourceId>, IndexError> {
    let raw: Vec<String> = match value {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::String(s) => s.split(',').map(|part| part.to_string()).collect(),
        serde_json::Value::Array(entries) => entries
            .iter()
            .map(|entry| {
                entry
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| IndexError::InvalidSourceList {
                        key: key.to_string(),
                        message: format!("expected a string, got {}", entry),
                    })
            })
            .collect::<Result<_, _>>()?,
        other => {
            return Err(IndexError::InvalidSourceList {
                key: key.to_string(),
                message: format!("unexpected value {}", other),
            })
        }
    };

    let mut sources: Vec<SourceId> = Vec::with_capacity(raw.len());
    for entry in raw {
        let entry = entry.trim();
        if entry.is_empty() || sources.iter().any(|s| s.as_str() == entry) {
            continue;
        }
        sources.push(SourceId::new(entry));
    }
    Ok(sources)
}
