//! CATEGORY and FOCUS strategy: a select over an index bucket.

use outfitter_domain::{CategoryKey, GrantNode};

use super::{RenderContext, RenderError};
use crate::use_cases::equipment::controls::{Control, ControlKind, SelectSpec};
use crate::use_cases::equipment::tracking::SourceTracking;

pub(super) fn render(
    node: &GrantNode,
    key: CategoryKey,
    depth: u32,
    ctx: &RenderContext<'_>,
    tracking: &mut SourceTracking,
) -> Result<Vec<Control>, RenderError> {
    if tracking.is_consumed(&node.id) || ctx.is_or_member(node) {
        return Ok(Vec::new());
    }
    tracking.mark_rendered(&node.id);

    let options = ctx.category_options(key, node.count, node.requires_proficiency);
    if options.is_empty() {
        tracing::debug!(category = %key, "Category bucket is empty");
    }

    let label = node
        .label
        .clone()
        .unwrap_or_else(|| category_label(key, node.count));

    Ok(vec![Control::new(
        ctx.source,
        vec![node.id.clone()],
        label,
        depth,
        ControlKind::Select(SelectSpec::new(options)),
    )])
}

pub(super) fn category_label(key: CategoryKey, count: u32) -> String {
    if count > 1 {
        format!("Any {} (x{})", key.label(), count)
    } else {
        format!("Any {}", key.label())
    }
}
