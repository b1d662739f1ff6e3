//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod app_settings;
pub mod error;
pub mod memory_content;
pub mod ports;
pub mod random;
pub mod sample_content;
