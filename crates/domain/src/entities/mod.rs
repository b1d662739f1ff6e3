//! Domain entities: content documents, grant trees and picks.

mod document;
mod grant;
mod item;
mod pick;
mod source;

pub use document::ContentDocument;
pub use grant::{GrantKind, GrantNode, GrantTree, RawGrantEntry, RejectedGrant};
pub use item::{ContainedItem, ItemDocument, ItemRef, ItemType};
pub use pick::EquipmentPick;
pub use source::{Advancement, SourceDocument, SourceKind};
