//! Unified error types for the domain layer
//!
//! Provides a common error type that can be used across all domain operations,
//! enabling consistent error handling without forcing adapters to use String or anyhow.

use thiserror::Error;

use crate::value_objects::DiceParseError;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for broken structural rules.
    ///
    /// Use this when a grant entry or document violates a domain invariant:
    /// - A `group` reference points at an entry that does not exist
    /// - A required key is missing for the entry's kind
    ///
    /// # Example
    /// ```ignore
    /// if entry.key.is_none() {
    ///     return Err(DomainError::validation("linked grant has no reference"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant or format.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for CategoryKey {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "sim" => Ok(Self::Simple),
    ///             _ => Err(DomainError::parse(format!("Unknown category: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

impl From<DiceParseError> for DomainError {
    fn from(err: DiceParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_prefixed() {
        let err = DomainError::validation("group 'x' does not exist");
        assert_eq!(
            err.to_string(),
            "Validation failed: group 'x' does not exist"
        );
    }

    #[test]
    fn not_found_mentions_entity_and_id() {
        let err = DomainError::not_found("Item", "abc123");
        assert_eq!(err.to_string(), "Entity not found: Item with id abc123");
    }

    #[test]
    fn dice_errors_convert_to_parse_errors() {
        let err: DomainError = DiceParseError::Empty.into();
        assert!(matches!(err, DomainError::Parse(_)));
    }
}
