//! Render tracking: which grants a pass has already rendered or merged.
//!
//! A grant id, once rendered, is never rendered again in the same pass.
//! Tracking is kept per source so a partial render can reset one section
//! without disturbing the other.

use std::collections::{HashMap, HashSet};

use outfitter_domain::{GrantId, SourceKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTracking {
    rendered: HashSet<GrantId>,
    merged: HashSet<GrantId>,
}

impl SourceTracking {
    /// Record a rendered grant; false if it was already rendered.
    pub fn mark_rendered(&mut self, id: &GrantId) -> bool {
        self.rendered.insert(id.clone())
    }

    pub fn mark_merged(&mut self, id: &GrantId) {
        self.merged.insert(id.clone());
    }

    pub fn is_rendered(&self, id: &GrantId) -> bool {
        self.rendered.contains(id)
    }

    pub fn is_merged(&self, id: &GrantId) -> bool {
        self.merged.contains(id)
    }

    /// Rendered on its own or folded into a merged control.
    pub fn is_consumed(&self, id: &GrantId) -> bool {
        self.is_rendered(id) || self.is_merged(id)
    }

    pub fn rendered_count(&self) -> usize {
        self.rendered.len()
    }

    pub fn clear(&mut self) {
        self.rendered.clear();
        self.merged.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderTracking {
    sources: HashMap<SourceKind, SourceTracking>,
}

impl RenderTracking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start of a full render.
    pub fn reset(&mut self) {
        self.sources.clear();
    }

    /// Start of a partial render of one source.
    pub fn reset_source(&mut self, source: SourceKind) {
        self.sources.remove(&source);
    }

    pub fn source(&self, source: SourceKind) -> Option<&SourceTracking> {
        self.sources.get(&source)
    }

    /// Move a source's tracking out so a render pass can own it.
    pub fn take_source(&mut self, source: SourceKind) -> SourceTracking {
        self.sources.remove(&source).unwrap_or_default()
    }

    pub fn install(&mut self, source: SourceKind, tracking: SourceTracking) {
        self.sources.insert(source, tracking);
    }

    pub fn is_rendered(&self, source: SourceKind, id: &GrantId) -> bool {
        self.source(source).is_some_and(|t| t.is_rendered(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering_twice_is_refused() {
        let mut tracking = SourceTracking::default();
        let id = GrantId::new("a");
        assert!(tracking.mark_rendered(&id));
        assert!(!tracking.mark_rendered(&id));
        assert!(tracking.is_consumed(&id));
    }

    #[test]
    fn merged_ids_count_as_consumed() {
        let mut tracking = SourceTracking::default();
        let id = GrantId::new("ammo");
        tracking.mark_merged(&id);
        assert!(!tracking.is_rendered(&id));
        assert!(tracking.is_consumed(&id));
    }

    fn rendered(id: &GrantId) -> SourceTracking {
        let mut tracking = SourceTracking::default();
        tracking.mark_rendered(id);
        tracking
    }

    #[test]
    fn partial_reset_only_touches_one_source() {
        let mut tracking = RenderTracking::new();
        let id = GrantId::new("a");
        tracking.install(SourceKind::Class, rendered(&id));
        tracking.install(SourceKind::Background, rendered(&id));

        tracking.reset_source(SourceKind::Class);
        assert!(!tracking.is_rendered(SourceKind::Class, &id));
        assert!(tracking.is_rendered(SourceKind::Background, &id));

        tracking.reset();
        assert!(!tracking.is_rendered(SourceKind::Background, &id));
    }

    #[test]
    fn take_and_install_round_trip() {
        let mut tracking = RenderTracking::new();
        let id = GrantId::new("a");
        tracking.install(SourceKind::Class, rendered(&id));

        let taken = tracking.take_source(SourceKind::Class);
        assert!(!tracking.is_rendered(SourceKind::Class, &id));
        tracking.install(SourceKind::Class, taken);
        assert!(tracking.is_rendered(SourceKind::Class, &id));
    }
}
