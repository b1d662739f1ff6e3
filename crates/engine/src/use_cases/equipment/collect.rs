//! Turns a control tree plus the user's selections into concrete picks.

use std::collections::VecDeque;

use futures_util::future::join_all;
use outfitter_domain::{Currency, DocumentUuid, EquipmentPick, ItemDocument, SourceKind};

use super::content_index::ContentIndex;
use super::controls::{Control, ControlKind, ControlMember, ControlTree, SelectSpec};
use super::selection::SelectionState;

/// Containers nested deeper than this are kept but not unpacked.
const MAX_CONTAINER_DEPTH: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectOptions {
    pub include_class: bool,
    pub include_background: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            include_class: true,
            include_background: true,
        }
    }
}

impl CollectOptions {
    pub fn includes(&self, source: SourceKind) -> bool {
        match source {
            SourceKind::Class => self.include_class,
            SourceKind::Background => self.include_background,
        }
    }
}

/// Members a control grants under the current selection.
pub fn selected_members(control: &Control, state: &SelectionState) -> Vec<ControlMember> {
    match &control.kind {
        ControlKind::Checkbox { members, .. } => {
            if state.is_checked(&control.id) {
                members.clone()
            } else {
                Vec::new()
            }
        }
        ControlKind::Select(spec) => option_members(spec, state.selected_value(control)),
        ControlKind::PairedSelect {
            primary, secondary, ..
        } => {
            let mut members = option_members(primary, state.selected_value(control));
            members.extend(option_members(secondary, state.secondary_value(control)));
            members
        }
        ControlKind::GroupLabel | ControlKind::Placeholder { .. } => Vec::new(),
    }
}

fn option_members(spec: &SelectSpec, value: Option<&str>) -> Vec<ControlMember> {
    value
        .and_then(|v| spec.option(v))
        .filter(|option| !option.disabled)
        .map(|option| option.members.clone())
        .unwrap_or_default()
}

/// Every member the user ended up with, in section and control order.
/// Sections taken over by their wealth option and failed sections give
/// nothing.
pub fn gather_members(
    tree: &ControlTree,
    state: &SelectionState,
    options: CollectOptions,
) -> Vec<ControlMember> {
    tree.sections
        .iter()
        .filter(|section| options.includes(section.source))
        .filter(|section| section.error.is_none())
        .filter(|section| !state.is_wealth_taken(section.source))
        .flat_map(|section| section.controls.iter())
        .flat_map(|control| selected_members(control, state))
        .collect()
}

struct Pending {
    item: ItemDocument,
    quantity: u32,
    container: Option<DocumentUuid>,
    depth: u32,
}

/// Resolve the selected members into picks, unpacking containers.
///
/// Members are resolved concurrently. A member that cannot be resolved is
/// logged and skipped; so is any single container entry. Container picks
/// carry the container's coins; their contents keep their own quantities.
pub async fn collect_picks(
    index: &ContentIndex,
    tree: &ControlTree,
    state: &SelectionState,
    options: CollectOptions,
) -> Vec<EquipmentPick> {
    let members = gather_members(tree, state, options);
    let resolved = join_all(members.iter().map(|m| index.resolve(&m.uuid))).await;

    let mut picks = Vec::new();
    for (member, item) in members.iter().zip(resolved) {
        let Some(item) = item else {
            tracing::warn!(uuid = %member.uuid, "Selected item could not be resolved, skipping");
            continue;
        };
        let mut queue = VecDeque::from([Pending {
            item,
            quantity: member.quantity,
            container: None,
            depth: 0,
        }]);
        while let Some(next) = queue.pop_front() {
            let contents = unpack(index, &next).await;
            let mut pick = EquipmentPick::new(&next.item, next.quantity)
                .favorite(state.is_favorite(&next.item.uuid))
                .with_currency(next.item.currency);
            if let Some(container) = &next.container {
                pick = pick.inside(container);
            }
            picks.push(pick);
            // Depth first: a container's contents follow it directly
            for child in contents.into_iter().rev() {
                queue.push_front(child);
            }
        }
    }

    tracing::info!(
        members = members.len(),
        picks = picks.len(),
        "Collected starting equipment"
    );
    picks
}

async fn unpack(index: &ContentIndex, pending: &Pending) -> Vec<Pending> {
    let container = &pending.item;
    if !container.is_container() || container.contents.is_empty() {
        return Vec::new();
    }
    if pending.depth >= MAX_CONTAINER_DEPTH {
        tracing::warn!(uuid = %container.uuid, "Container nested too deeply, not unpacking");
        return Vec::new();
    }

    let resolved = join_all(container.contents.iter().map(|c| index.resolve(&c.uuid))).await;
    container
        .contents
        .iter()
        .zip(resolved)
        .filter_map(|(entry, item)| match item {
            Some(item) => Some(Pending {
                item,
                quantity: entry.quantity,
                container: Some(container.uuid.clone()),
                depth: pending.depth + 1,
            }),
            None => {
                tracing::warn!(
                    container = %container.uuid,
                    uuid = %entry.uuid,
                    "Container entry could not be resolved, skipping"
                );
                None
            }
        })
        .collect()
}

/// Gold granted by checked wealth options.
///
/// Only one source is expected to be checked; more is logged and every
/// checked amount still counts. A required roll that has not been made
/// contributes nothing.
pub fn collect_wealth(tree: &ControlTree, state: &SelectionState) -> Option<Currency> {
    let checked: Vec<SourceKind> = state
        .wealth_sources()
        .into_iter()
        .filter(|source| tree.section(*source).is_some_and(|s| s.wealth.is_some()))
        .collect();
    if checked.len() > 1 {
        tracing::warn!(sources = ?checked, "More than one wealth option is checked");
    }

    let mut total: Option<Currency> = None;
    for source in checked {
        let amount = state.wealth(source).and_then(|w| w.amount).or_else(|| {
            tree.section(source)
                .and_then(|s| s.wealth.as_ref())
                .and_then(|w| w.fixed_amount)
        });
        match amount {
            Some(gp) => total = Some(total.unwrap_or_default() + Currency::gold(gp)),
            None => tracing::warn!(source = %source, "Wealth option checked but not rolled"),
        }
    }
    total
}
