//! Equipment use case errors.

use outfitter_domain::{DomainError, GrantId, SourceKind};

use crate::infrastructure::ports::{ContentError, SettingsError};

/// Errors reading the configured content sources.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("Setting {key} is not a list of sources: {message}")]
    InvalidSourceList { key: String, message: String },
}

/// Errors fetching a source's grant tree.
#[derive(Debug, thiserror::Error)]
pub enum GrantError {
    #[error("{kind} not found: {reference}")]
    SourceNotFound { kind: SourceKind, reference: String },
    #[error("{reference} is not a {expected}")]
    WrongKind {
        reference: String,
        expected: SourceKind,
    },
    #[error("Index error: {0}")]
    Index(#[from] IndexError),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
}

/// Errors raised by a single render strategy; the renderer turns them into
/// placeholders.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RenderError {
    #[error("Choice {0} has no selectable options")]
    EmptyChoice(GrantId),
    #[error("Choice {id} has an unsupported shape: {message}")]
    Unsupported { id: GrantId, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum WealthError {
    #[error("{0} does not declare starting wealth")]
    NoWealth(SourceKind),
    #[error("No {0} section in the current equipment tree")]
    SectionMissing(SourceKind),
    #[error("Starting wealth is fixed under the current ruleset")]
    RollNotRequired,
    #[error("Invalid wealth value: {0}")]
    Invalid(#[from] DomainError),
}

/// Errors surfaced by the equipment service.
#[derive(Debug, thiserror::Error)]
pub enum EquipmentError {
    #[error("Grant error: {0}")]
    Grant(#[from] GrantError),
    #[error("Wealth error: {0}")]
    Wealth(#[from] WealthError),
    #[error("Index error: {0}")]
    Index(#[from] IndexError),
    #[error("No equipment tree has been rendered")]
    NothingRendered,
}
