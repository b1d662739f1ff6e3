//! LINKED strategy: a pre-checked checkbox for a concrete item.

use outfitter_domain::{DocumentUuid, GrantNode};

use super::{RenderContext, RenderError};
use crate::use_cases::equipment::controls::Control;
use crate::use_cases::equipment::tracking::SourceTracking;

pub(super) fn render(
    node: &GrantNode,
    reference: &DocumentUuid,
    depth: u32,
    ctx: &RenderContext<'_>,
    tracking: &mut SourceTracking,
) -> Result<Vec<Control>, RenderError> {
    // OR groups render their members as options.
    if tracking.is_consumed(&node.id) || ctx.is_or_member(node) {
        return Ok(Vec::new());
    }
    tracking.mark_rendered(&node.id);

    if ctx.items.get(reference).is_none() {
        tracing::debug!(reference = %reference, "Linked item unresolved, using generic label");
    }

    Ok(vec![Control::checkbox(
        ctx.source,
        vec![node.id.clone()],
        ctx.linked_label(node, reference),
        depth,
        vec![ctx.linked_member(node, reference)],
    )])
}
