//! The user's interaction state over a rendered control tree.
//!
//! Controls are immutable once rendered; everything the user changes lives
//! here, keyed by [`ControlId`]. Checkboxes start checked and selects start
//! on their default option, so a fresh state already describes the
//! "take everything offered" outcome.

use std::collections::{BTreeMap, HashMap, HashSet};

use outfitter_domain::{DocumentUuid, SourceKind};
use serde::{Deserialize, Serialize};

use super::controls::{Control, ControlId, ControlKind, ControlTree, Section, SelectSpec, WealthControl};

/// Whether a source's wealth option is taken, and the amount it grants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WealthSelection {
    pub checked: bool,
    /// `None` until a required roll has been made
    pub amount: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    unchecked: HashSet<ControlId>,
    selected: HashMap<ControlId, String>,
    secondary: HashMap<ControlId, String>,
    wealth: BTreeMap<SourceKind, WealthSelection>,
    favorites: HashSet<DocumentUuid>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    // Checkboxes

    pub fn set_checked(&mut self, id: &ControlId, checked: bool) {
        if checked {
            self.unchecked.remove(id);
        } else {
            self.unchecked.insert(id.clone());
        }
    }

    pub fn is_checked(&self, id: &ControlId) -> bool {
        !self.unchecked.contains(id)
    }

    // Selects

    /// Choose a value for a select, or for the primary picker of a paired
    /// select.
    pub fn select(&mut self, id: &ControlId, value: impl Into<String>) {
        self.selected.insert(id.clone(), value.into());
    }

    pub fn select_secondary(&mut self, id: &ControlId, value: impl Into<String>) {
        self.secondary.insert(id.clone(), value.into());
    }

    /// The effective value of a select or of a paired select's primary
    /// picker: the user's choice when it is still an enabled option,
    /// otherwise the default.
    pub fn selected_value<'a>(&'a self, control: &'a Control) -> Option<&'a str> {
        let spec = match &control.kind {
            ControlKind::Select(spec) => spec,
            ControlKind::PairedSelect { primary, .. } => primary,
            _ => return None,
        };
        effective_value(spec, self.selected.get(&control.id))
    }

    /// The effective value of a paired select's secondary picker; `None`
    /// while the primary value hides it.
    pub fn secondary_value<'a>(&'a self, control: &'a Control) -> Option<&'a str> {
        let ControlKind::PairedSelect {
            secondary,
            secondary_hidden_for,
            ..
        } = &control.kind
        else {
            return None;
        };
        let primary = self.selected_value(control)?;
        if secondary_hidden_for.iter().any(|hidden| hidden == primary) {
            return None;
        }
        effective_value(secondary, self.secondary.get(&control.id))
    }

    // Wealth

    /// Take the wealth option. A fixed amount applies at once; a rolled
    /// amount stays unset until [`SelectionState::set_wealth_amount`].
    pub fn check_wealth(&mut self, control: &WealthControl) {
        let entry = self.wealth.entry(control.source).or_default();
        entry.checked = true;
        if entry.amount.is_none() {
            entry.amount = control.fixed_amount;
        }
    }

    /// Give the wealth option back; the amount is forgotten.
    pub fn uncheck_wealth(&mut self, source: SourceKind) {
        self.wealth.remove(&source);
    }

    pub fn set_wealth_amount(&mut self, source: SourceKind, amount: u32) {
        self.wealth.entry(source).or_default().amount = Some(amount);
    }

    pub fn wealth(&self, source: SourceKind) -> Option<&WealthSelection> {
        self.wealth.get(&source)
    }

    pub fn is_wealth_taken(&self, source: SourceKind) -> bool {
        self.wealth.get(&source).is_some_and(|w| w.checked)
    }

    /// Sources whose wealth option is checked.
    pub fn wealth_sources(&self) -> Vec<SourceKind> {
        self.wealth
            .iter()
            .filter(|(_, w)| w.checked)
            .map(|(source, _)| *source)
            .collect()
    }

    // Favorites

    /// Flip the favorite flag of an item; returns the new value.
    pub fn toggle_favorite(&mut self, uuid: &DocumentUuid) -> bool {
        if self.favorites.remove(uuid) {
            false
        } else {
            self.favorites.insert(uuid.clone());
            true
        }
    }

    pub fn set_favorite(&mut self, uuid: &DocumentUuid, favorite: bool) {
        if favorite {
            self.favorites.insert(uuid.clone());
        } else {
            self.favorites.remove(uuid);
        }
    }

    pub fn is_favorite(&self, uuid: &DocumentUuid) -> bool {
        self.favorites.contains(uuid)
    }

    /// Whether the user can currently act on a control of `section`.
    /// Taking a section's wealth disables all of its controls.
    pub fn is_control_enabled(&self, section: &Section, control: &Control) -> bool {
        control.is_interactive() && !self.is_wealth_taken(section.source)
    }

    /// Forget choices for controls that are no longer rendered.
    pub fn prune(&mut self, tree: &ControlTree) {
        let live: HashSet<&ControlId> = tree
            .sections
            .iter()
            .flat_map(|s| s.controls.iter().map(|c| &c.id))
            .collect();
        self.unchecked.retain(|id| live.contains(id));
        self.selected.retain(|id, _| live.contains(id));
        self.secondary.retain(|id, _| live.contains(id));
        self.wealth
            .retain(|source, _| tree.section(*source).is_some_and(|s| s.wealth.is_some()));
    }
}

fn effective_value<'a>(spec: &'a SelectSpec, chosen: Option<&'a String>) -> Option<&'a str> {
    chosen
        .and_then(|value| spec.option(value))
        .filter(|option| !option.disabled)
        .map(|option| option.value.as_str())
        .or(spec.default_value.as_deref())
}
