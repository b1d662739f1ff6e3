//! The rendered control tree.
//!
//! A [`ControlTree`] is what the wizard displays: one [`Section`] per source,
//! each holding controls with typed members. Every option and checkbox knows
//! exactly which items (and how many) it stands for, so collection reads
//! these members instead of re-walking the grant tree or parsing labels.

use std::fmt;

use outfitter_domain::{DocumentUuid, GrantId, SourceKind, WealthValue};
use serde::{Deserialize, Serialize};

/// Generic banner shown when a section fails to load.
pub const SECTION_ERROR_MESSAGE: &str = "Starting equipment could not be loaded.";
pub const UNKNOWN_ITEM_LABEL: &str = "Unknown item";
pub const UNKNOWN_CHOICE_MESSAGE: &str = "Unknown choice";
pub const GROUP_LABEL: &str = "Choose all of the following";
pub const LACKS_PROFICIENCY_SUFFIX: &str = " (lacks proficiency)";

/// Deterministic control id derived from the grants a control represents.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlId(String);

impl ControlId {
    pub fn for_grants(source: SourceKind, grant_ids: &[GrantId]) -> Self {
        let ids: Vec<&str> = grant_ids.iter().map(GrantId::as_str).collect();
        Self(format!("{}:{}", source, ids.join("+")))
    }

    pub fn wealth(source: SourceKind) -> Self {
        Self(format!("{}:wealth", source))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One item (and quantity) a control grants when selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlMember {
    pub uuid: DocumentUuid,
    pub quantity: u32,
}

impl ControlMember {
    pub fn new(uuid: DocumentUuid, quantity: u32) -> Self {
        Self {
            uuid,
            quantity: quantity.max(1),
        }
    }
}

/// Comma-joined member uuids.
pub fn members_value(members: &[ControlMember]) -> String {
    let uuids: Vec<DocumentUuid> = members.iter().map(|m| m.uuid.clone()).collect();
    DocumentUuid::join(&uuids)
}

/// Like [`members_value`], with `*n` after members granted more than once,
/// so "Shortsword" and "2 Shortswords" stay distinct options.
pub fn option_value(members: &[ControlMember]) -> String {
    members
        .iter()
        .map(|m| {
            if m.quantity > 1 {
                format!("{}*{}", m.uuid, m.quantity)
            } else {
                m.uuid.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub members: Vec<ControlMember>,
    #[serde(default)]
    pub disabled: bool,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, members: Vec<ControlMember>) -> Self {
        Self {
            value: option_value(&members),
            label: label.into(),
            members,
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectSpec {
    pub options: Vec<SelectOption>,
    pub default_value: Option<String>,
}

impl SelectSpec {
    /// Options keep their order; the first enabled one is the default.
    pub fn new(options: Vec<SelectOption>) -> Self {
        let default_value = options
            .iter()
            .find(|o| !o.disabled)
            .map(|o| o.value.clone());
        Self {
            options,
            default_value,
        }
    }

    pub fn option(&self, value: &str) -> Option<&SelectOption> {
        self.options.iter().find(|o| o.value == value)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairPattern {
    /// A weapon plus a shield, or a second weapon
    WeaponAndShield,
    /// A fixed alternative, or N weapons of a category
    MultiWeapon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlKind {
    GroupLabel,
    Checkbox {
        value: String,
        members: Vec<ControlMember>,
    },
    Select(SelectSpec),
    PairedSelect {
        pattern: PairPattern,
        primary: SelectSpec,
        secondary: SelectSpec,
        /// Primary values that hide the secondary picker
        secondary_hidden_for: Vec<String>,
    },
    Placeholder {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    pub id: ControlId,
    pub label: String,
    pub depth: u32,
    pub grant_ids: Vec<GrantId>,
    pub kind: ControlKind,
}

impl Control {
    pub fn new(
        source: SourceKind,
        grant_ids: Vec<GrantId>,
        label: impl Into<String>,
        depth: u32,
        kind: ControlKind,
    ) -> Self {
        Self {
            id: ControlId::for_grants(source, &grant_ids),
            label: label.into(),
            depth,
            grant_ids,
            kind,
        }
    }

    pub fn checkbox(
        source: SourceKind,
        grant_ids: Vec<GrantId>,
        label: impl Into<String>,
        depth: u32,
        members: Vec<ControlMember>,
    ) -> Self {
        let value = members_value(&members);
        Self::new(source, grant_ids, label, depth, ControlKind::Checkbox { value, members })
    }

    pub fn placeholder(source: SourceKind, grant_ids: Vec<GrantId>, depth: u32) -> Self {
        Self::new(
            source,
            grant_ids,
            UNKNOWN_CHOICE_MESSAGE,
            depth,
            ControlKind::Placeholder {
                message: UNKNOWN_CHOICE_MESSAGE.to_string(),
            },
        )
    }

    /// Whether the user can act on this control.
    pub fn is_interactive(&self) -> bool {
        !matches!(
            self.kind,
            ControlKind::GroupLabel | ControlKind::Placeholder { .. }
        )
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, ControlKind::Placeholder { .. })
    }
}

/// "Take starting wealth instead" for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WealthControl {
    pub id: ControlId,
    pub source: SourceKind,
    pub label: String,
    pub value: WealthValue,
    /// The amount must be rolled before it counts
    pub requires_roll: bool,
    /// Amount shown when no roll is needed
    pub fixed_amount: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub source: SourceKind,
    pub source_uuid: Option<DocumentUuid>,
    pub source_name: String,
    /// Informational message, e.g. when no equipment is defined
    pub notice: Option<String>,
    pub fallback_description: Option<String>,
    pub wealth: Option<WealthControl>,
    /// Generic banner; never raw error text
    pub error: Option<String>,
    pub controls: Vec<Control>,
}

impl Section {
    pub fn new(source: SourceKind, source_name: impl Into<String>) -> Self {
        Self {
            source,
            source_uuid: None,
            source_name: source_name.into(),
            notice: None,
            fallback_description: None,
            wealth: None,
            error: None,
            controls: Vec::new(),
        }
    }

    pub fn failed(source: SourceKind) -> Self {
        let mut section = Self::new(source, source.label());
        section.error = Some(SECTION_ERROR_MESSAGE.to_string());
        section
    }

    pub fn control(&self, id: &ControlId) -> Option<&Control> {
        self.controls.iter().find(|c| &c.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlTree {
    pub generation: u64,
    pub sections: Vec<Section>,
}

impl ControlTree {
    pub fn section(&self, source: SourceKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.source == source)
    }

    /// Replace (or add) the section for its source, keeping class first.
    pub fn upsert_section(&mut self, section: Section) {
        match self.sections.iter_mut().find(|s| s.source == section.source) {
            Some(existing) => *existing = section,
            None => {
                self.sections.push(section);
                self.sections.sort_by_key(|s| s.source);
            }
        }
    }

    pub fn control_count(&self) -> usize {
        self.sections.iter().map(|s| s.controls.len()).sum()
    }
}
