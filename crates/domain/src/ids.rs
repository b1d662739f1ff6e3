use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_ref {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Content references
define_ref!(DocumentUuid);
define_ref!(DocumentId);
define_ref!(SourceId);

// Grant tree
define_ref!(GrantId);

impl DocumentUuid {
    /// Trailing id segment of a dotted canonical reference.
    ///
    /// `Compendium.dnd5e.items.Item.abc123` yields `abc123`; a bare id is
    /// returned unchanged.
    pub fn trailing_id(&self) -> DocumentId {
        let tail = self.0.rsplit('.').next().unwrap_or(&self.0);
        DocumentId::new(tail)
    }

    /// Comma-joined value used by controls that stand for several documents.
    pub fn join(uuids: &[DocumentUuid]) -> String {
        uuids
            .iter()
            .map(DocumentUuid::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Inverse of [`DocumentUuid::join`]; blank segments are dropped.
    pub fn split(value: &str) -> Vec<DocumentUuid> {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(DocumentUuid::new)
            .collect()
    }
}
