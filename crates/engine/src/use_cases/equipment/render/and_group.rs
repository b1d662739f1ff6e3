//! AND strategy: a group label followed by every child.

use std::collections::HashMap;

use outfitter_domain::GrantNode;

use super::{merge, render_node, RenderContext, RenderError};
use crate::use_cases::equipment::controls::{Control, ControlKind, GROUP_LABEL};
use crate::use_cases::equipment::tracking::SourceTracking;

pub(super) fn render(
    node: &GrantNode,
    children: &[GrantNode],
    depth: u32,
    ctx: &RenderContext<'_>,
    tracking: &mut SourceTracking,
) -> Result<Vec<Control>, RenderError> {
    if tracking.is_consumed(&node.id) || ctx.is_or_member(node) {
        return Ok(Vec::new());
    }
    tracking.mark_rendered(&node.id);

    let mut out = Vec::new();
    // A top-level AND is the section itself; only nested groups get a label.
    let child_depth = if node.group.is_some() {
        let label = node.label.clone().unwrap_or_else(|| GROUP_LABEL.to_string());
        out.push(Control::new(
            ctx.source,
            vec![node.id.clone()],
            label,
            depth,
            ControlKind::GroupLabel,
        ));
        depth + 1
    } else {
        depth
    };

    render_children(children, child_depth, ctx, tracking, &mut out);
    Ok(out)
}

/// Render siblings in order, folding merge pairs into one checkbox placed
/// where the first member of the pair sits.
pub(super) fn render_children(
    children: &[GrantNode],
    depth: u32,
    ctx: &RenderContext<'_>,
    tracking: &mut SourceTracking,
    out: &mut Vec<Control>,
) {
    let pairs: HashMap<usize, usize> = merge::find_pairs(children, ctx, tracking)
        .into_iter()
        .collect();
    let partners: Vec<usize> = pairs.values().copied().collect();

    for (i, child) in children.iter().enumerate() {
        if partners.contains(&i) {
            continue;
        }
        match pairs.get(&i).map(|j| &children[*j]) {
            Some(partner) => out.push(merged_checkbox(child, partner, depth, ctx, tracking)),
            None => render_node(child, depth, ctx, tracking, out),
        }
    }
}

fn merged_checkbox(
    first: &GrantNode,
    second: &GrantNode,
    depth: u32,
    ctx: &RenderContext<'_>,
    tracking: &mut SourceTracking,
) -> Control {
    let mut labels = Vec::with_capacity(2);
    let mut members = Vec::with_capacity(2);
    for node in [first, second] {
        if let Some(reference) = node.linked_reference() {
            labels.push(ctx.linked_label(node, reference));
            members.push(ctx.linked_member(node, reference));
        }
        tracking.mark_merged(&node.id);
        tracking.mark_rendered(&node.id);
    }
    tracing::debug!(
        first = %first.id,
        second = %second.id,
        "Merged linked grants into one control"
    );

    Control::checkbox(
        ctx.source,
        vec![first.id.clone(), second.id.clone()],
        labels.join(" + "),
        depth,
        members,
    )
}
