//! Shared setup for scenario tests.

use std::sync::Arc;

use outfitter_domain::{EquipmentPick, GrantId, SourceKind};

use crate::app::App;
use crate::infrastructure::app_settings::EngineConfig;
use crate::infrastructure::memory_content::MemoryContentLibrary;
use crate::infrastructure::random::FixedRandom;
use crate::infrastructure::sample_content::{self, background_uuid, class_uuid};
use crate::use_cases::equipment::{
    Control, ControlKind, ControlTree, SelectSpec, SelectedSource, SelectedSources, SourceFilter,
};

/// Every die of a wealth roll shows this face.
pub const FIXED_DIE: i32 = 3;

pub struct E2ETestContext {
    pub app: App,
    pub library: Arc<MemoryContentLibrary>,
}

impl E2ETestContext {
    pub fn setup() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let library = Arc::new(sample_content::library(&config.settings_namespace));
        let app = App::with_random(
            config,
            library.clone(),
            library.clone(),
            library.clone(),
            Arc::new(FixedRandom(FIXED_DIE)),
        );
        Self { app, library }
    }

    /// Full render of a class and a background by sample id.
    pub async fn render(&self, class: Option<&str>, background: Option<&str>) -> ControlTree {
        self.app
            .equipment()
            .render(&selection(class, background), SourceFilter::All)
            .await
            .into_tree()
            .expect("Render should not be superseded")
    }
}

pub fn selection(class: Option<&str>, background: Option<&str>) -> SelectedSources {
    SelectedSources::new(
        class.map(|id| SelectedSource::new(class_uuid(id))),
        background.map(|id| SelectedSource::new(background_uuid(id))),
    )
}

/// The control of `source` representing grant `grant`.
pub fn control<'a>(tree: &'a ControlTree, source: SourceKind, grant: &str) -> &'a Control {
    let grant = GrantId::new(grant);
    tree.section(source)
        .and_then(|section| section.controls.iter().find(|c| c.grant_ids.contains(&grant)))
        .unwrap_or_else(|| panic!("No control for grant {} in {} section", grant, source))
}

pub fn pick_names(picks: &[EquipmentPick]) -> Vec<&str> {
    picks.iter().map(|p| p.item.name.as_str()).collect()
}

pub fn pick<'a>(picks: &'a [EquipmentPick], name: &str) -> &'a EquipmentPick {
    picks
        .iter()
        .find(|p| p.item.name == name)
        .unwrap_or_else(|| panic!("No pick named {} in {:?}", name, pick_names(picks)))
}

fn option_in(spec: &SelectSpec, label: &str) -> String {
    spec.options
        .iter()
        .find(|o| o.label == label)
        .map(|o| o.value.clone())
        .unwrap_or_else(|| panic!("No option labelled {}", label))
}

/// Value of the option labelled `label` in a select or a paired select's
/// primary picker.
pub fn option_value(control: &Control, label: &str) -> String {
    match &control.kind {
        ControlKind::Select(spec) => option_in(spec, label),
        ControlKind::PairedSelect { primary, .. } => option_in(primary, label),
        other => panic!("Control {} is not a select: {:?}", control.id, other),
    }
}

pub fn secondary_option_value(control: &Control, label: &str) -> String {
    match &control.kind {
        ControlKind::PairedSelect { secondary, .. } => option_in(secondary, label),
        other => panic!("Control {} is not a paired select: {:?}", control.id, other),
    }
}
