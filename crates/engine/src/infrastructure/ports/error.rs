//! Error types for port operations.

/// Content library lookup errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ContentError {
    /// A source (compendium pack) does not exist.
    #[error("Content source not found: {0}")]
    SourceNotFound(String),

    /// The content library could not be reached or refused the request.
    #[error("Content library unavailable in {operation}: {message}")]
    Unavailable {
        operation: &'static str,
        message: String,
    },
}

impl ContentError {
    pub fn unavailable(operation: &'static str, message: impl ToString) -> Self {
        Self::Unavailable {
            operation,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Settings store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ChatError {
    #[error("Chat message rejected: {0}")]
    Rejected(String),
    #[error("Chat unavailable")]
    Unavailable,
}
