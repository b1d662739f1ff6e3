//! Outfitter Engine library.
//!
//! Starting-equipment resolution for character creation: a category index
//! over the content library, a renderer that turns grant trees into
//! controls, and a collector that turns selections into item picks.
//!
//! ## Structure
//!
//! - `use_cases/` - Equipment flow orchestration
//! - `infrastructure/` - Ports, configuration and the in-memory content library
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures shared by unit tests.
#[cfg(test)]
pub mod test_fixtures;

/// Scenario tests against the sample library.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
