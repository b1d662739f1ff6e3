//! Value objects: immutable, compared by value, no identity.

mod category;
mod currency;
mod dice;
mod proficiency;
mod wealth;

pub use category::{CategoryFamily, CategoryKey, FocusKind};
pub use currency::Currency;
pub use dice::{DiceFormula, DiceParseError, DiceRollResult};
pub use proficiency::ProficiencySet;
pub use wealth::WealthValue;
