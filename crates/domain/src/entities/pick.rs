//! Concrete equipment picked at submission time.

use serde::{Deserialize, Serialize};

use super::item::{ItemDocument, ItemRef};
use crate::ids::DocumentUuid;
use crate::value_objects::Currency;

/// One item instance to create on the new character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentPick {
    pub item: ItemRef,
    pub quantity: u32,
    pub equipped: bool,
    /// Display ordering hint only
    pub favorite: bool,
    /// Coins stored in a container; only ever set on the container pick
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    /// Container this pick was unpacked from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contained_in: Option<DocumentUuid>,
}

impl EquipmentPick {
    pub fn new(item: &ItemDocument, quantity: u32) -> Self {
        Self {
            item: item.item_ref(),
            quantity: quantity.max(1),
            equipped: true,
            favorite: false,
            currency: None,
            contained_in: None,
        }
    }

    pub fn favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        if !currency.is_empty() {
            self.currency = Some(currency);
        }
        self
    }

    pub fn inside(mut self, container: &DocumentUuid) -> Self {
        self.contained_in = Some(container.clone());
        self
    }
}
