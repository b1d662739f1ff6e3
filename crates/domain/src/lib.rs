extern crate self as outfitter_domain;

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    Advancement, ContainedItem, ContentDocument, EquipmentPick, GrantKind, GrantNode, GrantTree,
    ItemDocument, ItemRef, ItemType, RawGrantEntry, RejectedGrant, SourceDocument, SourceKind,
};

pub use error::DomainError;

// Re-export ID types
pub use ids::{DocumentId, DocumentUuid, GrantId, SourceId};

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{
    CategoryFamily, CategoryKey, Currency, DiceFormula, DiceParseError, DiceRollResult, FocusKind,
    ProficiencySet, WealthValue,
};
