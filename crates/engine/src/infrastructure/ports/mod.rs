//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Content library access (host compendium, in-memory library)
//! - Settings store (configured content sources)
//! - Chat (public wealth rolls)
//! - Random (for testing)

mod error;
mod external;
mod testing;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{ChatPort, ContentPort, RollAnnouncement, SettingsPort};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{MockChatPort, MockContentPort, MockSettingsPort};

#[cfg(test)]
pub use testing::MockRandomPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::RandomPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{ChatError, ContentError, SettingsError};
