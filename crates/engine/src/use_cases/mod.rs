//! Use cases - User story orchestration.
//!
//! Use cases orchestrate the ports to fulfill user stories.

pub mod equipment;

pub use equipment::{EquipmentService, SelectionState};
