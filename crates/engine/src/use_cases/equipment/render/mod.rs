//! Choice-tree renderer.
//!
//! Compiles a source's [`GrantTree`] into [`Control`]s. Dispatch is an
//! exhaustive match on [`GrantKind`] with one strategy per kind. A strategy
//! that fails is replaced by a placeholder so one bad node never blanks the
//! whole section.
//!
//! Rendering is synchronous: every linked reference is resolved up front
//! (see [`ResolvedItems`]) and category lookups read the built index.

mod and_group;
mod category;
mod linked;
mod merge;
mod or_group;

use std::collections::{HashMap, HashSet};

use outfitter_domain::{
    CategoryKey, DocumentUuid, GrantId, GrantKind, GrantNode, GrantTree, ItemDocument,
    ProficiencySet, SourceKind,
};

use super::content_index::CategoryIndex;
use super::controls::{Control, ControlMember, SelectOption, LACKS_PROFICIENCY_SUFFIX};
use super::error::RenderError;
use super::tracking::SourceTracking;

pub use merge::is_merge_pair;

/// Deepest nesting rendered before a node becomes a placeholder.
const MAX_DEPTH: u32 = 8;

/// Linked references resolved before a render pass, keyed by reference.
#[derive(Debug, Clone, Default)]
pub struct ResolvedItems(HashMap<DocumentUuid, ItemDocument>);

impl ResolvedItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: DocumentUuid, item: ItemDocument) {
        self.0.insert(reference, item);
    }

    pub fn get(&self, reference: &DocumentUuid) -> Option<&ItemDocument> {
        self.0.get(reference)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Every linked reference in a tree, without duplicates, in tree order.
pub fn linked_references(tree: &GrantTree) -> Vec<DocumentUuid> {
    fn walk(nodes: &[GrantNode], seen: &mut HashSet<DocumentUuid>, out: &mut Vec<DocumentUuid>) {
        for node in nodes {
            if let Some(reference) = node.linked_reference() {
                if seen.insert(reference.clone()) {
                    out.push(reference.clone());
                }
            }
            walk(node.children(), seen, out);
        }
    }
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    walk(&tree.roots, &mut seen, &mut out);
    out
}

/// Read-only inputs of one section's render pass.
pub struct RenderContext<'a> {
    pub source: SourceKind,
    pub index: &'a CategoryIndex,
    pub proficiencies: &'a ProficiencySet,
    pub items: &'a ResolvedItems,
    or_groups: HashSet<GrantId>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        source: SourceKind,
        tree: &GrantTree,
        index: &'a CategoryIndex,
        proficiencies: &'a ProficiencySet,
        items: &'a ResolvedItems,
    ) -> Self {
        let mut or_groups = HashSet::new();
        for root in &tree.roots {
            collect_or_ids(root, &mut or_groups);
        }
        Self {
            source,
            index,
            proficiencies,
            items,
            or_groups,
        }
    }

    fn is_or_member(&self, node: &GrantNode) -> bool {
        node.group
            .as_ref()
            .is_some_and(|group| self.or_groups.contains(group))
    }

    /// Display label of a linked node: override, else "{count} {name}".
    fn linked_label(&self, node: &GrantNode, reference: &DocumentUuid) -> String {
        if let Some(label) = &node.label {
            return label.clone();
        }
        let name = self
            .items
            .get(reference)
            .map(|item| item.name.as_str())
            .unwrap_or(super::controls::UNKNOWN_ITEM_LABEL);
        if node.count > 1 {
            format!("{} {}", node.count, name)
        } else {
            name.to_string()
        }
    }

    /// Member for a linked node, preferring the resolved canonical uuid.
    fn linked_member(&self, node: &GrantNode, reference: &DocumentUuid) -> ControlMember {
        let uuid = self
            .items
            .get(reference)
            .map(|item| item.uuid.clone())
            .unwrap_or_else(|| reference.clone());
        ControlMember::new(uuid, node.count)
    }

    fn lacks_proficiency(&self, item: &ItemDocument) -> bool {
        item.proficiency_key()
            .is_some_and(|key| !self.proficiencies.covers(&key))
    }

    /// One select option per item of a category, gated on proficiency.
    fn category_options(
        &self,
        key: CategoryKey,
        quantity: u32,
        requires_proficiency: bool,
    ) -> Vec<SelectOption> {
        self.index
            .lookup(key)
            .into_iter()
            .map(|item| self.item_option(item, quantity, requires_proficiency))
            .collect()
    }

    fn item_option(
        &self,
        item: &ItemDocument,
        quantity: u32,
        requires_proficiency: bool,
    ) -> SelectOption {
        let lacks = requires_proficiency && self.lacks_proficiency(item);
        let mut label = if quantity > 1 {
            format!("{} {}", quantity, item.name)
        } else {
            item.name.clone()
        };
        if lacks {
            label.push_str(LACKS_PROFICIENCY_SUFFIX);
        }
        SelectOption::new(label, vec![ControlMember::new(item.uuid.clone(), quantity)])
            .disabled(lacks)
    }
}

fn collect_or_ids(node: &GrantNode, out: &mut HashSet<GrantId>) {
    if node.is_or() {
        out.insert(node.id.clone());
    }
    for child in node.children() {
        collect_or_ids(child, out);
    }
}

/// Render a whole source tree. Roots behave like the children of an
/// implicit top-level AND; rejected entries become trailing placeholders.
pub fn render_tree(
    tree: &GrantTree,
    ctx: &RenderContext<'_>,
    tracking: &mut SourceTracking,
) -> Vec<Control> {
    let mut controls = Vec::new();
    and_group::render_children(&tree.roots, 0, ctx, tracking, &mut controls);

    for rejected in &tree.rejected {
        if tracking.mark_rendered(&rejected.id) {
            controls.push(Control::placeholder(ctx.source, vec![rejected.id.clone()], 0));
        }
    }
    controls
}

fn render_node(
    node: &GrantNode,
    depth: u32,
    ctx: &RenderContext<'_>,
    tracking: &mut SourceTracking,
    out: &mut Vec<Control>,
) {
    let result = if depth > MAX_DEPTH {
        Err(RenderError::Unsupported {
            id: node.id.clone(),
            message: format!("nested deeper than {} levels", MAX_DEPTH),
        })
    } else {
        dispatch(node, depth, ctx, tracking)
    };

    match result {
        Ok(controls) => out.extend(controls),
        Err(e) => {
            tracing::warn!(
                source = %ctx.source,
                grant_id = %node.id,
                kind = node.kind.name(),
                error = %e,
                "Grant could not be rendered, showing a placeholder"
            );
            for id in node.subtree_ids() {
                tracking.mark_rendered(&id);
            }
            out.push(Control::placeholder(ctx.source, vec![node.id.clone()], depth));
        }
    }
}

fn dispatch(
    node: &GrantNode,
    depth: u32,
    ctx: &RenderContext<'_>,
    tracking: &mut SourceTracking,
) -> Result<Vec<Control>, RenderError> {
    match &node.kind {
        GrantKind::Linked { reference } => linked::render(node, reference, depth, ctx, tracking),
        GrantKind::Category { key } => category::render(node, *key, depth, ctx, tracking),
        GrantKind::Focus { focus } => {
            category::render(node, CategoryKey::Focus(*focus), depth, ctx, tracking)
        }
        GrantKind::And { children } => and_group::render(node, children, depth, ctx, tracking),
        GrantKind::Or { children } => or_group::render(node, children, depth, ctx, tracking),
    }
}

#[cfg(test)]
mod tests;
