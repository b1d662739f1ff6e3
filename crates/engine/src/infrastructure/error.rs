//! Unified engine error types.
//!
//! Provides a single error type that wraps every layer's errors so the
//! binary and the composition root can handle failures uniformly.

use outfitter_domain::DomainError;
use thiserror::Error;

use super::ports::{ChatError, ContentError, SettingsError};
use crate::use_cases::equipment::EquipmentError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// An environment variable held an unusable value.
    #[error("Invalid configuration {key}: {message}")]
    Config { key: &'static str, message: String },

    /// Content library operation failed.
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// Settings store operation failed.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Chat broadcast failed.
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    /// Equipment use case failed.
    #[error("Equipment error: {0}")]
    Equipment(#[from] EquipmentError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Library JSON could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    pub fn config(key: &'static str, message: impl ToString) -> Self {
        Self::Config {
            key,
            message: message.to_string(),
        }
    }

    /// Check if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}
