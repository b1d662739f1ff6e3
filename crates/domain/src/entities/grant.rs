//! Starting-equipment grant trees.
//!
//! Host documents store starting equipment as a flat list of entries that
//! point at their parent through `group`. [`GrantTree::from_entries`] turns
//! that list into a closed tree of [`GrantNode`]s. Entries that cannot take
//! part in the tree are kept aside as [`RejectedGrant`]s so one malformed
//! entry never hides its valid siblings.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::ids::{DocumentUuid, GrantId};
use crate::value_objects::{CategoryFamily, CategoryKey, FocusKind};

/// A starting-equipment entry exactly as the host stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGrantEntry {
    #[serde(rename = "_id")]
    pub id: GrantId,
    #[serde(default)]
    pub group: Option<GrantId>,
    #[serde(default)]
    pub sort: i64,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub requires_proficiency: bool,
    #[serde(default)]
    pub label: Option<String>,
}

impl RawGrantEntry {
    fn parent(&self) -> Option<&GrantId> {
        self.group.as_ref().filter(|g| !g.as_str().is_empty())
    }
}

/// What a grant node asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrantKind {
    /// Every child is granted
    And { children: Vec<GrantNode> },
    /// Exactly one child is granted
    Or { children: Vec<GrantNode> },
    /// A concrete item
    Linked { reference: DocumentUuid },
    /// Any item of a weapon, armor or tool category
    Category { key: CategoryKey },
    /// Any spellcasting focus of a kind
    Focus { focus: FocusKind },
}

impl GrantKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::And { .. } => "AND",
            Self::Or { .. } => "OR",
            Self::Linked { .. } => "linked",
            Self::Category { .. } => "category",
            Self::Focus { .. } => "focus",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantNode {
    pub id: GrantId,
    pub group: Option<GrantId>,
    pub count: u32,
    pub label: Option<String>,
    pub requires_proficiency: bool,
    #[serde(flatten)]
    pub kind: GrantKind,
}

impl GrantNode {
    fn leaf(id: impl Into<GrantId>, kind: GrantKind) -> Self {
        Self {
            id: id.into(),
            group: None,
            count: 1,
            label: None,
            requires_proficiency: false,
            kind,
        }
    }

    pub fn linked(id: impl Into<GrantId>, reference: impl Into<DocumentUuid>) -> Self {
        Self::leaf(
            id,
            GrantKind::Linked {
                reference: reference.into(),
            },
        )
    }

    pub fn category(id: impl Into<GrantId>, key: CategoryKey) -> Self {
        Self::leaf(id, GrantKind::Category { key })
    }

    pub fn focus(id: impl Into<GrantId>, focus: FocusKind) -> Self {
        Self::leaf(id, GrantKind::Focus { focus })
    }

    pub fn and(id: impl Into<GrantId>, children: Vec<GrantNode>) -> Self {
        let id = id.into();
        let children = adopt(&id, children);
        Self::leaf(id, GrantKind::And { children })
    }

    pub fn or(id: impl Into<GrantId>, children: Vec<GrantNode>) -> Self {
        let id = id.into();
        let children = adopt(&id, children);
        Self::leaf(id, GrantKind::Or { children })
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count.max(1);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn requiring_proficiency(mut self) -> Self {
        self.requires_proficiency = true;
        self
    }

    pub fn children(&self) -> &[GrantNode] {
        match &self.kind {
            GrantKind::And { children } | GrantKind::Or { children } => children,
            _ => &[],
        }
    }

    pub fn is_or(&self) -> bool {
        matches!(self.kind, GrantKind::Or { .. })
    }

    pub fn linked_reference(&self) -> Option<&DocumentUuid> {
        match &self.kind {
            GrantKind::Linked { reference } => Some(reference),
            _ => None,
        }
    }

    /// Category key for `Category` and `Focus` nodes.
    pub fn category_key(&self) -> Option<CategoryKey> {
        match &self.kind {
            GrantKind::Category { key } => Some(*key),
            GrantKind::Focus { focus } => Some(CategoryKey::Focus(*focus)),
            _ => None,
        }
    }

    /// This node's id followed by every descendant id, depth first.
    pub fn subtree_ids(&self) -> Vec<GrantId> {
        let mut ids = vec![self.id.clone()];
        for child in self.children() {
            ids.extend(child.subtree_ids());
        }
        ids
    }
}

fn adopt(parent: &GrantId, children: Vec<GrantNode>) -> Vec<GrantNode> {
    children
        .into_iter()
        .map(|mut child| {
            child.group = Some(parent.clone());
            child
        })
        .collect()
}

/// An entry left out of the tree, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedGrant {
    pub id: GrantId,
    pub reason: String,
}

/// The assembled starting-equipment tree of one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantTree {
    pub roots: Vec<GrantNode>,
    #[serde(default)]
    pub rejected: Vec<RejectedGrant>,
}

/// Parsed entry before children are attached.
enum Shell {
    And,
    Or,
    Leaf(GrantKind),
}

impl GrantTree {
    pub fn new(roots: Vec<GrantNode>) -> Self {
        Self {
            roots,
            rejected: Vec::new(),
        }
    }

    /// No renderable grants. Rejected entries alone still count as empty.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.roots.iter().map(|r| r.subtree_ids().len()).sum()
    }

    /// Assemble a tree from the host's flat entry list.
    ///
    /// Siblings are ordered by `sort`, then by their position in `entries`.
    pub fn from_entries(entries: &[RawGrantEntry]) -> GrantTree {
        let mut rejected: Vec<RejectedGrant> = Vec::new();
        let mut shells: HashMap<GrantId, (usize, Shell)> = HashMap::new();

        for (position, entry) in entries.iter().enumerate() {
            if shells.contains_key(&entry.id) || rejected.iter().any(|r| r.id == entry.id) {
                rejected.push(RejectedGrant {
                    id: entry.id.clone(),
                    reason: format!("duplicate entry id '{}'", entry.id),
                });
                continue;
            }
            match parse_shell(entry) {
                Ok(shell) => {
                    shells.insert(entry.id.clone(), (position, shell));
                }
                Err(reason) => rejected.push(RejectedGrant {
                    id: entry.id.clone(),
                    reason,
                }),
            }
        }

        // Validate parent chains: parent must exist, be a group and not loop
        let mut valid: HashSet<GrantId> = HashSet::new();
        for (position, entry) in entries.iter().enumerate() {
            // Only the surviving (first) occurrence of an id is checked
            if shells.get(&entry.id).map(|(p, _)| *p) != Some(position) {
                continue;
            }
            match check_chain(entry, entries, &shells) {
                Ok(()) => {
                    valid.insert(entry.id.clone());
                }
                Err(reason) => rejected.push(RejectedGrant {
                    id: entry.id.clone(),
                    reason,
                }),
            }
        }

        let mut children_of: HashMap<Option<GrantId>, Vec<usize>> = HashMap::new();
        for id in &valid {
            if let Some((position, _)) = shells.get(id) {
                let parent = entries[*position].parent().cloned();
                children_of.entry(parent).or_default().push(*position);
            }
        }
        for positions in children_of.values_mut() {
            positions.sort_by_key(|p| (entries[*p].sort, *p));
        }

        let roots = build_level(None, entries, &mut shells, &children_of);
        rejected.sort_by_key(|r| {
            entries
                .iter()
                .position(|e| e.id == r.id)
                .unwrap_or(usize::MAX)
        });

        GrantTree { roots, rejected }
    }
}

fn parse_shell(entry: &RawGrantEntry) -> Result<Shell, String> {
    let key = entry.key.as_deref().map(str::trim).filter(|k| !k.is_empty());
    let missing_key = || format!("{} entry '{}' has no key", entry.entry_type, entry.id);

    match entry.entry_type.to_ascii_lowercase().as_str() {
        "and" => Ok(Shell::And),
        "or" => Ok(Shell::Or),
        "linked" => {
            let reference = key.ok_or_else(missing_key)?;
            Ok(Shell::Leaf(GrantKind::Linked {
                reference: DocumentUuid::new(reference),
            }))
        }
        family @ ("weapon" | "armor" | "tool") => {
            let family = match family {
                "weapon" => CategoryFamily::Weapon,
                "armor" => CategoryFamily::Armor,
                _ => CategoryFamily::Tool,
            };
            let key = key.ok_or_else(missing_key)?;
            let key = CategoryKey::parse_for(family, key).map_err(|e| e.to_string())?;
            Ok(Shell::Leaf(GrantKind::Category { key }))
        }
        "focus" => {
            let focus = key
                .ok_or_else(missing_key)?
                .parse::<FocusKind>()
                .map_err(|e| e.to_string())?;
            Ok(Shell::Leaf(GrantKind::Focus { focus }))
        }
        other => Err(format!("unknown entry type '{}'", other)),
    }
}

fn check_chain(
    entry: &RawGrantEntry,
    entries: &[RawGrantEntry],
    shells: &HashMap<GrantId, (usize, Shell)>,
) -> Result<(), String> {
    let mut seen: HashSet<&GrantId> = HashSet::new();
    seen.insert(&entry.id);
    let mut current = entry;
    while let Some(parent_id) = current.parent() {
        let Some((position, shell)) = shells.get(parent_id) else {
            return Err(format!(
                "group '{}' of entry '{}' does not exist",
                parent_id, current.id
            ));
        };
        if !matches!(shell, Shell::And | Shell::Or) {
            return Err(format!(
                "group '{}' of entry '{}' is not an AND/OR entry",
                parent_id, current.id
            ));
        }
        if !seen.insert(parent_id) {
            return Err(format!("entry '{}' is part of a group cycle", entry.id));
        }
        current = &entries[*position];
    }
    Ok(())
}

fn build_level(
    parent: Option<GrantId>,
    entries: &[RawGrantEntry],
    shells: &mut HashMap<GrantId, (usize, Shell)>,
    children_of: &HashMap<Option<GrantId>, Vec<usize>>,
) -> Vec<GrantNode> {
    let Some(positions) = children_of.get(&parent) else {
        return Vec::new();
    };
    let mut nodes = Vec::with_capacity(positions.len());
    for position in positions {
        let entry = &entries[*position];
        let Some((_, shell)) = shells.remove(&entry.id) else {
            continue;
        };
        let kind = match shell {
            Shell::And => GrantKind::And {
                children: build_level(Some(entry.id.clone()), entries, shells, children_of),
            },
            Shell::Or => GrantKind::Or {
                children: build_level(Some(entry.id.clone()), entries, shells, children_of),
            },
            Shell::Leaf(kind) => kind,
        };
        nodes.push(GrantNode {
            id: entry.id.clone(),
            group: entry.parent().cloned(),
            count: entry.count.unwrap_or(1).max(1),
            label: entry.label.clone().filter(|l| !l.trim().is_empty()),
            requires_proficiency: entry.requires_proficiency,
            kind,
        });
    }
    nodes
}
