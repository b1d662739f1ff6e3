//! Proficiency sets granted by class and background advancements.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Trait keys such as `weapon:sim`, `armor:lgt` or `tool:art:smith`.
///
/// A key covers every more specific key below it: `weapon:mar` covers
/// `weapon:mar:longsword`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProficiencySet(BTreeSet<String>);

impl ProficiencySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>) {
        self.0.insert(key.into());
    }

    pub fn extend(&mut self, other: &ProficiencySet) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Whether some key in the set is `item_key` or one of its prefixes.
    pub fn covers(&self, item_key: &str) -> bool {
        let mut prefix = String::with_capacity(item_key.len());
        for (i, segment) in item_key.split(':').enumerate() {
            if i > 0 {
                prefix.push(':');
            }
            prefix.push_str(segment);
            if self.0.contains(&prefix) {
                return true;
            }
        }
        false
    }
}

impl<S: Into<String>> FromIterator<S> for ProficiencySet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
