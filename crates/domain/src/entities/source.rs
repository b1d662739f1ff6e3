//! Class and background documents: the owners of grant trees.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::grant::{GrantTree, RawGrantEntry};
use crate::error::DomainError;
use crate::ids::{DocumentId, DocumentUuid};
use crate::value_objects::{ProficiencySet, WealthValue};

/// Which kind of character option owns a grant tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Class,
    Background,
}

impl SourceKind {
    pub fn all() -> [SourceKind; 2] {
        [Self::Class, Self::Background]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Class => "Class",
            Self::Background => "Background",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Background => write!(f, "background"),
        }
    }
}

impl FromStr for SourceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "class" => Ok(Self::Class),
            "background" => Ok(Self::Background),
            other => Err(DomainError::parse(format!("Unknown source kind: {}", other))),
        }
    }
}

/// An advancement step; only `Trait` advancements grant proficiencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advancement {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub grants: Vec<String>,
}

impl Advancement {
    pub fn traits(level: u8, grants: &[&str]) -> Self {
        Self {
            kind: "Trait".to_string(),
            level,
            grants: grants.iter().map(|g| g.to_string()).collect(),
        }
    }
}

/// A class or background document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    pub uuid: DocumentUuid,
    pub id: DocumentId,
    #[serde(default)]
    pub identifier: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[serde(default)]
    pub starting_equipment: Vec<RawGrantEntry>,
    #[serde(default)]
    pub wealth: Option<String>,
    #[serde(default)]
    pub advancement: Vec<Advancement>,
    /// HTML description
    #[serde(default)]
    pub description: String,
}

impl SourceDocument {
    pub fn new(uuid: impl Into<DocumentUuid>, name: impl Into<String>, kind: SourceKind) -> Self {
        let uuid = uuid.into();
        Self {
            id: uuid.trailing_id(),
            uuid,
            identifier: None,
            name: name.into(),
            kind,
            starting_equipment: Vec::new(),
            wealth: None,
            advancement: Vec::new(),
            description: String::new(),
        }
    }

    pub fn with_equipment(mut self, entries: Vec<RawGrantEntry>) -> Self {
        self.starting_equipment = entries;
        self
    }

    pub fn with_wealth(mut self, wealth: impl Into<String>) -> Self {
        self.wealth = Some(wealth.into());
        self
    }

    pub fn with_advancement(mut self, advancement: Advancement) -> Self {
        self.advancement.push(advancement);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn grant_tree(&self) -> GrantTree {
        GrantTree::from_entries(&self.starting_equipment)
    }

    /// Proficiencies granted by `Trait` advancements at level 1 or below.
    pub fn proficiencies(&self) -> ProficiencySet {
        self.advancement
            .iter()
            .filter(|a| a.kind.eq_ignore_ascii_case("trait") && a.level <= 1)
            .flat_map(|a| a.grants.iter().cloned())
            .collect()
    }

    /// Declared wealth, if present and well formed.
    pub fn wealth_value(&self) -> Option<Result<WealthValue, DomainError>> {
        self.wealth
            .as_deref()
            .filter(|w| !w.trim().is_empty())
            .map(str::parse)
    }

    /// Whether `value` names this document by id or identifier.
    pub fn matches_id(&self, value: &str) -> bool {
        self.id.as_str() == value || self.identifier.as_deref() == Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proficiencies_come_from_level_one_traits() {
        let doc = SourceDocument::new("c.fighter", "Fighter", SourceKind::Class)
            .with_advancement(Advancement::traits(1, &["weapon:sim", "weapon:mar"]))
            .with_advancement(Advancement::traits(3, &["tool:art"]))
            .with_advancement(Advancement {
                kind: "HitPoints".into(),
                level: 1,
                grants: vec!["ignored".into()],
            });
        let profs = doc.proficiencies();
        assert_eq!(profs.len(), 2);
        assert!(profs.covers("weapon:mar:longsword"));
        assert!(!profs.contains("tool:art"));
    }

    #[test]
    fn wealth_value_parses_when_present() {
        let doc = SourceDocument::new("c.fighter", "Fighter", SourceKind::Class);
        assert!(doc.wealth_value().is_none());

        let doc = doc.with_wealth("5d4*10");
        let wealth = doc.wealth_value().unwrap().unwrap();
        assert!(wealth.formula().is_some());

        let doc = SourceDocument::new("b.x", "X", SourceKind::Background).with_wealth("nope");
        assert!(doc.wealth_value().unwrap().is_err());
    }

    #[test]
    fn matches_id_checks_identifier_too() {
        let mut doc = SourceDocument::new("Compendium.srd.classes.Item.abc", "Fighter", SourceKind::Class);
        doc.identifier = Some("fighter".into());
        assert!(doc.matches_id("abc"));
        assert!(doc.matches_id("fighter"));
        assert!(!doc.matches_id("wizard"));
    }

    #[test]
    fn source_kind_parses() {
        assert_eq!("Class".parse::<SourceKind>().unwrap(), SourceKind::Class);
        assert!("race".parse::<SourceKind>().is_err());
    }
}
