//! Equipment service - the entry point of the equipment flow.
//!
//! Owns the session state a wizard needs between calls: render tracking and
//! the last committed control tree. Every `render` call takes a new
//! generation; a render that finishes after a newer one started is dropped
//! instead of committed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::future::join_all;
use outfitter_domain::{Currency, DiceRollResult, EquipmentPick, GrantId, GrantTree, SourceKind};
use tokio::sync::Mutex;

use super::collect::{collect_picks, collect_wealth, CollectOptions};
use super::content_index::ContentIndex;
use super::controls::{Control, ControlTree, Section};
use super::error::{EquipmentError, WealthError};
use super::grants::{GrantData, GrantService};
use super::render::{linked_references, render_tree, RenderContext, ResolvedItems};
use super::selection::SelectionState;
use super::sources::{SelectedSource, SelectedSources};
use super::tracking::{RenderTracking, SourceTracking};
use super::wealth::WealthService;

pub const NO_EQUIPMENT_NOTICE: &str = "No starting equipment is defined for this source.";

/// Which sections a render pass rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFilter {
    All,
    Only(SourceKind),
}

impl SourceFilter {
    fn kinds(&self) -> Vec<SourceKind> {
        match self {
            SourceFilter::All => vec![SourceKind::Class, SourceKind::Background],
            SourceFilter::Only(kind) => vec![*kind],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(ControlTree),
    /// A newer render started first; nothing was committed.
    Superseded { generation: u64 },
}

impl RenderOutcome {
    pub fn tree(&self) -> Option<&ControlTree> {
        match self {
            RenderOutcome::Rendered(tree) => Some(tree),
            RenderOutcome::Superseded { .. } => None,
        }
    }

    pub fn into_tree(self) -> Option<ControlTree> {
        match self {
            RenderOutcome::Rendered(tree) => Some(tree),
            RenderOutcome::Superseded { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
struct EquipmentSession {
    tracking: RenderTracking,
    committed: Option<ControlTree>,
}

pub struct EquipmentService {
    index: Arc<ContentIndex>,
    grants: GrantService,
    wealth: WealthService,
    session: Mutex<EquipmentSession>,
    generation: AtomicU64,
}

impl EquipmentService {
    pub fn new(index: Arc<ContentIndex>, grants: GrantService, wealth: WealthService) -> Self {
        Self {
            index,
            grants,
            wealth,
            session: Mutex::new(EquipmentSession::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn index(&self) -> &ContentIndex {
        &self.index
    }

    /// Render the sections `filter` names.
    ///
    /// A full render replaces the committed tree; a partial render replaces
    /// only its section and keeps the other one, tracking included.
    pub async fn render(&self, selected: &SelectedSources, filter: SourceFilter) -> RenderOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(generation, filter = ?filter, "Starting equipment render");

        // The pass works on its own copy; a superseded pass leaves the
        // session untouched.
        let kinds = filter.kinds();
        let mut tracking = self.session.lock().await.tracking.clone();
        match filter {
            SourceFilter::All => tracking.reset(),
            SourceFilter::Only(kind) => tracking.reset_source(kind),
        }
        let taken: Vec<SourceTracking> = kinds
            .iter()
            .map(|kind| tracking.take_source(*kind))
            .collect();

        let sections = join_all(
            kinds
                .into_iter()
                .zip(taken)
                .map(|(kind, tracking)| self.render_section(kind, selected.get(kind), tracking)),
        )
        .await;

        let mut session = self.session.lock().await;
        let latest = self.generation.load(Ordering::SeqCst);
        if latest != generation {
            tracing::debug!(generation, latest, "Discarding superseded equipment render");
            return RenderOutcome::Superseded { generation };
        }

        let mut tree = match filter {
            SourceFilter::All => ControlTree::default(),
            SourceFilter::Only(_) => session.committed.clone().unwrap_or_default(),
        };
        for (section, rendered) in sections {
            tracing::debug!(source = %section.source, rendered = rendered.rendered_count(), "Section rendered");
            tracking.install(section.source, rendered);
            tree.upsert_section(section);
        }
        session.tracking = tracking;
        tree.generation = generation;
        session.committed = Some(tree.clone());

        tracing::info!(
            generation,
            sections = tree.sections.len(),
            controls = tree.control_count(),
            "Rendered starting equipment"
        );
        RenderOutcome::Rendered(tree)
    }

    async fn render_section(
        &self,
        kind: SourceKind,
        selected: Option<&SelectedSource>,
        mut tracking: SourceTracking,
    ) -> (Section, SourceTracking) {
        let Some(selected) = selected else {
            let mut section = Section::new(kind, kind.label());
            section.notice = Some(format!("No {} selected.", kind));
            return (section, tracking);
        };

        let data = match self.grants.fetch_grants(kind, selected).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(source = %kind, reference = %selected.uuid, error = %e, "Failed to load starting equipment");
                return (Section::failed(kind), tracking);
            }
        };

        let mut section = Section::new(kind, data.source_name.clone());
        section.source_uuid = Some(data.source_uuid.clone());
        section.wealth = data
            .wealth
            .as_ref()
            .map(|wealth| self.wealth.control_for(kind, wealth));

        if !data.has_equipment() && data.tree.rejected.is_empty() {
            section.notice = Some(NO_EQUIPMENT_NOTICE.to_string());
            section.fallback_description = data.fallback_description.clone();
            return (section, tracking);
        }

        section.controls = self.render_controls(kind, &data, &mut tracking).await;
        (section, tracking)
    }

    async fn render_controls(
        &self,
        kind: SourceKind,
        data: &GrantData,
        tracking: &mut SourceTracking,
    ) -> Vec<Control> {
        let index = self.index.build().await;
        let items = self.resolve_linked(&data.tree).await;
        let ctx = RenderContext::new(kind, &data.tree, index, &data.proficiencies, &items);
        render_tree(&data.tree, &ctx, tracking)
    }

    /// Resolve every linked reference of a tree up front so the renderer
    /// itself never waits on the content library.
    async fn resolve_linked(&self, tree: &GrantTree) -> ResolvedItems {
        let references = linked_references(tree);
        let resolved = join_all(references.iter().map(|r| self.index.resolve(r))).await;

        let mut items = ResolvedItems::new();
        for (reference, item) in references.into_iter().zip(resolved) {
            match item {
                Some(item) => items.insert(reference, item),
                None => tracing::debug!(reference = %reference, "Linked item could not be resolved"),
            }
        }
        items
    }

    /// Picks for the current selection.
    pub async fn collect(
        &self,
        tree: &ControlTree,
        state: &SelectionState,
        options: CollectOptions,
    ) -> Vec<EquipmentPick> {
        collect_picks(&self.index, tree, state, options).await
    }

    pub fn collect_wealth(&self, tree: &ControlTree, state: &SelectionState) -> Option<Currency> {
        collect_wealth(tree, state)
    }

    /// Roll a source's starting wealth and take the wealth option with the
    /// rolled amount.
    pub async fn roll_wealth(
        &self,
        kind: SourceKind,
        state: &mut SelectionState,
    ) -> Result<DiceRollResult, EquipmentError> {
        let (control, source_name) = {
            let session = self.session.lock().await;
            let tree = session
                .committed
                .as_ref()
                .ok_or(EquipmentError::NothingRendered)?;
            let section = tree.section(kind).ok_or(WealthError::SectionMissing(kind))?;
            let control = section
                .wealth
                .clone()
                .ok_or(WealthError::NoWealth(kind))?;
            (control, section.source_name.clone())
        };

        let roll = self.wealth.roll(&control, &source_name).await?;
        state.check_wealth(&control);
        state.set_wealth_amount(kind, u32::try_from(roll.total).unwrap_or(0));
        Ok(roll)
    }

    /// Whether the last committed render of `kind` rendered grant `id`.
    pub async fn is_rendered(&self, kind: SourceKind, id: &GrantId) -> bool {
        self.session.lock().await.tracking.is_rendered(kind, id)
    }

    pub async fn committed_tree(&self) -> Option<ControlTree> {
        self.session.lock().await.committed.clone()
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::app_settings::{EngineConfig, Ruleset};
    use crate::infrastructure::random::FixedRandom;
    use crate::infrastructure::sample_content::{self, background_uuid, class_uuid};
    use crate::use_cases::equipment::controls::SECTION_ERROR_MESSAGE;

    fn service(config: EngineConfig) -> EquipmentService {
        let namespace = config.settings_namespace.clone();
        let library = Arc::new(sample_content::library(&namespace));
        EquipmentService::new(
            Arc::new(ContentIndex::new(
                library.clone(),
                library.clone(),
                &namespace,
                config.index_batch_size,
            )),
            GrantService::new(library.clone(), library.clone(), &namespace),
            WealthService::new(
                config.ruleset,
                config.publish_wealth_rolls,
                Arc::new(FixedRandom(3)),
                library,
            ),
        )
    }

    fn selected(class: Option<&str>, background: Option<&str>) -> SelectedSources {
        SelectedSources::new(
            class.map(|id| SelectedSource::new(class_uuid(id))),
            background.map(|id| SelectedSource::new(background_uuid(id))),
        )
    }

    async fn render_all(service: &EquipmentService, sources: &SelectedSources) -> ControlTree {
        service
            .render(sources, SourceFilter::All)
            .await
            .into_tree()
            .expect("render was not superseded")
    }

    #[tokio::test]
    async fn renders_both_sections_in_order() {
        let service = service(EngineConfig::default());
        let tree = render_all(&service, &selected(Some("fighter"), Some("acolyte"))).await;

        assert_eq!(tree.sections.len(), 2);
        let class = &tree.sections[0];
        assert_eq!(class.source_name, "Fighter");
        assert_eq!(class.source_uuid, Some(class_uuid("fighter")));
        assert_eq!(class.controls.len(), 4);
        let wealth = class.wealth.as_ref().unwrap();
        assert_eq!(wealth.fixed_amount, Some(125));

        let background = &tree.sections[1];
        assert_eq!(background.source_name, "Acolyte");
        assert!(!background.controls.is_empty());
        assert_eq!(tree.generation, 1);
    }

    #[tokio::test]
    async fn missing_selection_is_a_notice() {
        let service = service(EngineConfig::default());
        let tree = render_all(&service, &selected(Some("wizard"), None)).await;
        let background = tree.section(SourceKind::Background).unwrap();
        assert_eq!(background.notice.as_deref(), Some("No background selected."));
        assert!(background.controls.is_empty());
        assert!(background.error.is_none());
    }

    #[tokio::test]
    async fn sources_without_equipment_fall_back_to_the_description() {
        let service = service(EngineConfig::default());
        let tree = render_all(&service, &selected(Some("monk"), None)).await;
        let class = tree.section(SourceKind::Class).unwrap();
        assert_eq!(class.notice.as_deref(), Some(NO_EQUIPMENT_NOTICE));
        assert!(class.fallback_description.as_deref().unwrap().contains("darts"));
        assert!(class.wealth.is_some());
        assert!(class.controls.is_empty());
    }

    #[tokio::test]
    async fn a_missing_source_fails_only_its_section() {
        let service = service(EngineConfig::default());
        let tree = render_all(&service, &selected(Some("artificer"), Some("soldier"))).await;

        let class = tree.section(SourceKind::Class).unwrap();
        assert_eq!(class.error.as_deref(), Some(SECTION_ERROR_MESSAGE));
        assert!(class.controls.is_empty());

        let background = tree.section(SourceKind::Background).unwrap();
        assert!(background.error.is_none());
        assert_eq!(background.source_name, "Soldier");
    }

    #[tokio::test]
    async fn partial_render_keeps_the_other_section() {
        let service = service(EngineConfig::default());
        render_all(&service, &selected(Some("fighter"), Some("acolyte"))).await;

        let tree = service
            .render(
                &selected(Some("wizard"), Some("acolyte")),
                SourceFilter::Only(SourceKind::Class),
            )
            .await
            .into_tree()
            .unwrap();

        assert_eq!(tree.generation, 2);
        assert_eq!(tree.section(SourceKind::Class).unwrap().source_name, "Wizard");
        assert_eq!(tree.section(SourceKind::Background).unwrap().source_name, "Acolyte");
        assert_eq!(service.committed_tree().await, Some(tree));
    }

    #[tokio::test]
    async fn partial_render_resets_tracking_for_its_source_only() {
        let service = service(EngineConfig::default());
        render_all(&service, &selected(Some("fighter"), Some("acolyte"))).await;
        let armor = GrantId::new("f-armor");
        let book = GrantId::new("a-book");
        assert!(service.is_rendered(SourceKind::Class, &armor).await);
        assert!(service.is_rendered(SourceKind::Background, &book).await);

        service
            .render(
                &selected(Some("wizard"), Some("acolyte")),
                SourceFilter::Only(SourceKind::Class),
            )
            .await
            .into_tree()
            .unwrap();

        assert!(!service.is_rendered(SourceKind::Class, &armor).await);
        assert!(
            service
                .is_rendered(SourceKind::Class, &GrantId::new("w-focus"))
                .await
        );
        assert!(service.is_rendered(SourceKind::Background, &book).await);

        render_all(&service, &selected(Some("wizard"), None)).await;
        assert!(!service.is_rendered(SourceKind::Background, &book).await);
    }

    #[tokio::test]
    async fn rerendering_renders_everything_again() {
        let service = service(EngineConfig::default());
        let sources = selected(Some("fighter"), Some("acolyte"));
        let first = render_all(&service, &sources).await;
        let second = render_all(&service, &sources).await;
        assert_eq!(first.sections, second.sections);
        assert_eq!(second.generation, 2);
    }

    #[tokio::test]
    async fn a_newer_render_supersedes_an_older_one() {
        let service = service(EngineConfig::default().with_index_batch_size(1));
        let fighter = selected(Some("fighter"), Some("acolyte"));
        let ranger = selected(Some("ranger"), Some("soldier"));

        let (older, newer) = tokio::join!(
            service.render(&fighter, SourceFilter::All),
            service.render(&ranger, SourceFilter::All)
        );

        assert_eq!(older, RenderOutcome::Superseded { generation: 1 });
        let newer = newer.into_tree().unwrap();
        assert_eq!(newer.generation, 2);

        let committed = service.committed_tree().await.unwrap();
        assert_eq!(committed.section(SourceKind::Class).unwrap().source_name, "Ranger");
        assert_eq!(service.current_generation(), 2);
        assert!(service.is_rendered(SourceKind::Class, &GrantId::new("r-weapons")).await);
        assert!(!service.is_rendered(SourceKind::Class, &GrantId::new("f-armor")).await);
    }

    #[tokio::test]
    async fn rolling_requires_a_rendered_tree() {
        let service = service(EngineConfig::default().with_ruleset(Ruleset::Legacy));
        let mut state = SelectionState::new();
        let result = service.roll_wealth(SourceKind::Class, &mut state).await;
        assert!(matches!(result, Err(EquipmentError::NothingRendered)));
    }

    #[tokio::test]
    async fn legacy_rolls_take_the_wealth_option() {
        let service = service(EngineConfig::default().with_ruleset(Ruleset::Legacy));
        let tree = render_all(&service, &selected(Some("fighter"), None)).await;
        let mut state = SelectionState::new();

        let roll = service.roll_wealth(SourceKind::Class, &mut state).await.unwrap();
        assert_eq!(roll.total, 150);
        assert!(state.is_wealth_taken(SourceKind::Class));
        assert_eq!(service.collect_wealth(&tree, &state), Some(Currency::gold(150)));
        assert!(service
            .collect(&tree, &state, CollectOptions::default())
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn rolling_needs_declared_wealth() {
        let service = service(EngineConfig::default().with_ruleset(Ruleset::Legacy));
        render_all(&service, &selected(Some("fighter"), None)).await;
        let mut state = SelectionState::new();

        let result = service.roll_wealth(SourceKind::Background, &mut state).await;
        assert!(matches!(
            result,
            Err(EquipmentError::Wealth(WealthError::NoWealth(SourceKind::Background)))
        ));
    }

    #[tokio::test]
    async fn modern_wealth_is_not_rolled() {
        let service = service(EngineConfig::default());
        render_all(&service, &selected(Some("fighter"), None)).await;
        let mut state = SelectionState::new();
        let result = service.roll_wealth(SourceKind::Class, &mut state).await;
        assert!(matches!(
            result,
            Err(EquipmentError::Wealth(WealthError::RollNotRequired))
        ));
        assert!(!state.is_wealth_taken(SourceKind::Class));
    }
}
