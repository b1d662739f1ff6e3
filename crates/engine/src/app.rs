//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    app_settings::EngineConfig,
    memory_content::MemoryContentLibrary,
    ports::{ChatPort, ContentPort, RandomPort, SettingsPort},
    random::SystemRandom,
};
use crate::use_cases::equipment::{ContentIndex, EquipmentService, GrantService, WealthService};

/// Main application state.
///
/// Holds the configuration and every use case, wired to the host's ports.
pub struct App {
    pub config: EngineConfig,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub equipment: Arc<EquipmentService>,
}

impl App {
    pub fn new(
        config: EngineConfig,
        content: Arc<dyn ContentPort>,
        settings: Arc<dyn SettingsPort>,
        chat: Arc<dyn ChatPort>,
    ) -> Self {
        Self::with_random(config, content, settings, chat, Arc::new(SystemRandom::new()))
    }

    pub fn with_random(
        config: EngineConfig,
        content: Arc<dyn ContentPort>,
        settings: Arc<dyn SettingsPort>,
        chat: Arc<dyn ChatPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let namespace = config.settings_namespace.clone();

        let index = Arc::new(ContentIndex::new(
            content.clone(),
            settings.clone(),
            &namespace,
            config.index_batch_size,
        ));
        let grants = GrantService::new(content, settings, &namespace);
        let wealth = WealthService::new(config.ruleset, config.publish_wealth_rolls, random, chat);

        tracing::debug!(
            ruleset = %config.ruleset,
            publish_wealth_rolls = config.publish_wealth_rolls,
            namespace = %namespace,
            "Composed equipment use cases"
        );

        Self {
            config,
            use_cases: UseCases {
                equipment: Arc::new(EquipmentService::new(index, grants, wealth)),
            },
        }
    }

    /// An app backed entirely by one in-memory library.
    pub fn in_memory(config: EngineConfig, library: Arc<MemoryContentLibrary>) -> Self {
        Self::new(config, library.clone(), library.clone(), library)
    }

    pub fn equipment(&self) -> &EquipmentService {
        &self.use_cases.equipment
    }
}
