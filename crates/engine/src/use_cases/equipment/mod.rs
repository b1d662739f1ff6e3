//! Starting equipment use cases.
//!
//! Indexes item content, renders a class's and a background's grant trees
//! into controls, and collects the user's selections into picks.

mod collect;
mod content_index;
mod controls;
mod error;
mod fallback_description;
mod grants;
mod render;
mod selection;
mod service;
mod sources;
mod tracking;
mod wealth;

pub use collect::{collect_picks, collect_wealth, gather_members, selected_members, CollectOptions};
pub use content_index::{CategoryEntry, CategoryIndex, ContentIndex};
pub use controls::{
    members_value, option_value, Control, ControlId, ControlKind, ControlMember, ControlTree,
    PairPattern, Section, SelectOption, SelectSpec, WealthControl, GROUP_LABEL,
    LACKS_PROFICIENCY_SUFFIX, SECTION_ERROR_MESSAGE, UNKNOWN_CHOICE_MESSAGE, UNKNOWN_ITEM_LABEL,
};
pub use error::{EquipmentError, GrantError, IndexError, RenderError, WealthError};
pub use fallback_description::{extract_fallback_description, extract_with_heuristic, Heuristic};
pub use grants::{GrantData, GrantService};
pub use render::{is_merge_pair, linked_references, render_tree, RenderContext, ResolvedItems};
pub use selection::{SelectionState, WealthSelection};
pub use service::{EquipmentService, RenderOutcome, SourceFilter, NO_EQUIPMENT_NOTICE};
pub use sources::{
    read_source_list, settings_key, SelectedSource, SelectedSources, BACKGROUND_SOURCES_KEY,
    CLASS_SOURCES_KEY, ITEM_SOURCES_KEY,
};
pub use tracking::{RenderTracking, SourceTracking};
pub use wealth::WealthService;
