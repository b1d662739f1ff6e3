//! Shared builders for unit tests.
//!
//! Items come from the bundled sample library so unit tests and scenario
//! tests agree on names, categories and uuids.
//!
//! ```rust,ignore
//! use crate::test_fixtures::{sample_item, item_settings};
//!
//! let dagger = sample_item("dagger");
//! let settings = item_settings(&["srd.items"]);
//! ```

use outfitter_domain::{ItemDocument, RawGrantEntry};

use crate::infrastructure::ports::MockSettingsPort;
use crate::infrastructure::sample_content;
use crate::use_cases::equipment::ITEM_SOURCES_KEY;

pub use crate::infrastructure::sample_content::item_uuid;

/// A sample item by id.
///
/// # Panics
///
/// Panics if the id is not part of the sample library.
pub fn sample_item(id: &str) -> ItemDocument {
    sample_content::items()
        .into_iter()
        .find(|item| item.id.as_str() == id)
        .unwrap_or_else(|| panic!("No sample item '{}'", id))
}

/// Settings mock answering the item source list with `sources`.
pub fn item_settings(sources: &[&str]) -> MockSettingsPort {
    let sources: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
    let mut settings = MockSettingsPort::new();
    settings
        .expect_get_setting()
        .withf(|_, key| key == ITEM_SOURCES_KEY)
        .returning(move |_, _| Ok(Some(serde_json::json!(sources.clone()))));
    settings
}

pub fn raw_entry(
    id: &str,
    group: Option<&str>,
    sort: i64,
    entry_type: &str,
    key: Option<&str>,
) -> RawGrantEntry {
    sample_content::entry(id, group, sort, entry_type, key)
}
