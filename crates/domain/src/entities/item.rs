//! Item documents as served by the content library.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::ids::{DocumentId, DocumentUuid};
use crate::value_objects::{CategoryKey, Currency, FocusKind};

/// Document type of a library entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Equipment,
    Tool,
    Consumable,
    Container,
    Loot,
    // Character options and spells live in the same libraries but are never gear
    Class,
    Subclass,
    Background,
    Race,
    Feat,
    Spell,

    /// Forward-compatibility fallback for newer document types.
    #[serde(other)]
    Other,
}

impl ItemType {
    /// Whether documents of this type can be handed out as starting equipment.
    pub fn is_equipment(&self) -> bool {
        matches!(
            self,
            Self::Weapon
                | Self::Equipment
                | Self::Tool
                | Self::Consumable
                | Self::Container
                | Self::Loot
        )
    }
}

/// Lightweight, displayable reference to an item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    pub uuid: DocumentUuid,
    pub name: String,
}

/// One entry stored inside a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainedItem {
    pub uuid: DocumentUuid,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// A concrete item document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDocument {
    pub uuid: DocumentUuid,
    pub id: DocumentId,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Weapon type (`simpleM`), armor type (`light`), tool type (`art`),
    /// consumable type (`ammo`) or container flavor (`pack`)
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub base_item: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
    /// Property flags such as `amm` (uses ammunition) or `mgc` (magical)
    #[serde(default)]
    pub properties: BTreeSet<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub contents: Vec<ContainedItem>,
}

impl ItemDocument {
    pub fn new(
        uuid: impl Into<DocumentUuid>,
        name: impl Into<String>,
        item_type: ItemType,
    ) -> Self {
        let uuid = uuid.into();
        Self {
            id: uuid.trailing_id(),
            uuid,
            name: name.into(),
            item_type,
            subtype: None,
            base_item: None,
            identifier: None,
            properties: BTreeSet::new(),
            rarity: None,
            quantity: 1,
            currency: Currency::default(),
            contents: Vec::new(),
        }
    }

    // Builder methods

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn with_base_item(mut self, base_item: impl Into<String>) -> Self {
        self.base_item = Some(base_item.into());
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.properties.insert(property.into());
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_contents(mut self, contents: Vec<ContainedItem>) -> Self {
        self.contents = contents;
        self
    }

    pub fn item_ref(&self) -> ItemRef {
        ItemRef {
            uuid: self.uuid.clone(),
            name: self.name.clone(),
        }
    }

    /// Explicit identifier, or a slug of the name.
    pub fn identifier(&self) -> String {
        match &self.identifier {
            Some(identifier) if !identifier.is_empty() => identifier.clone(),
            _ => slugify(&self.name),
        }
    }

    pub fn is_magical(&self) -> bool {
        if self.properties.contains("mgc") {
            return true;
        }
        matches!(
            self.rarity.as_deref(),
            Some(r) if !r.is_empty() && !r.eq_ignore_ascii_case("common") && !r.eq_ignore_ascii_case("mundane")
        )
    }

    pub fn uses_ammunition(&self) -> bool {
        self.item_type == ItemType::Weapon && self.properties.contains("amm")
    }

    pub fn is_ammunition(&self) -> bool {
        self.item_type == ItemType::Consumable && self.subtype.as_deref() == Some("ammo")
    }

    pub fn is_container(&self) -> bool {
        self.item_type == ItemType::Container
    }

    /// Equipment packs are containers that are handed out as a unit.
    pub fn is_pack(&self) -> bool {
        self.is_container()
            && (self.subtype.as_deref() == Some("pack") || self.identifier().ends_with("-pack"))
    }

    pub fn is_shield(&self) -> bool {
        self.item_type == ItemType::Equipment && self.subtype.as_deref() == Some("shield")
    }

    pub fn focus(&self) -> Option<FocusKind> {
        FocusKind::for_identifier(&self.identifier())
    }

    /// Base category bucket of this item, focus items first.
    pub fn category(&self) -> Option<CategoryKey> {
        if let Some(focus) = self.focus() {
            return Some(CategoryKey::Focus(focus));
        }
        let subtype = self.subtype.as_deref()?;
        let key = match (self.item_type, subtype) {
            (ItemType::Weapon, "simpleM") => CategoryKey::SimpleMelee,
            (ItemType::Weapon, "simpleR") => CategoryKey::SimpleRanged,
            (ItemType::Weapon, "martialM") => CategoryKey::MartialMelee,
            (ItemType::Weapon, "martialR") => CategoryKey::MartialRanged,
            (ItemType::Equipment, "light") => CategoryKey::LightArmor,
            (ItemType::Equipment, "medium") => CategoryKey::MediumArmor,
            (ItemType::Equipment, "heavy") => CategoryKey::HeavyArmor,
            (ItemType::Equipment, "shield") => CategoryKey::Shield,
            (ItemType::Tool, "art") => CategoryKey::Artisan,
            (ItemType::Tool, "game") => CategoryKey::Gaming,
            (ItemType::Tool, "music") => CategoryKey::Musical,
            _ => return None,
        };
        Some(key)
    }

    /// Most specific proficiency trait key for this item, if any is needed.
    pub fn proficiency_key(&self) -> Option<String> {
        let subtype = self.subtype.as_deref();
        let base = match (self.item_type, subtype) {
            (ItemType::Weapon, Some("simpleM" | "simpleR")) => "weapon:sim".to_string(),
            (ItemType::Weapon, Some("martialM" | "martialR")) => "weapon:mar".to_string(),
            (ItemType::Equipment, Some("light")) => "armor:lgt".to_string(),
            (ItemType::Equipment, Some("medium")) => "armor:med".to_string(),
            (ItemType::Equipment, Some("heavy")) => "armor:hvy".to_string(),
            (ItemType::Equipment, Some("shield")) => "armor:shl".to_string(),
            (ItemType::Tool, Some(tool_type)) => format!("tool:{}", tool_type),
            (ItemType::Tool, None) => "tool".to_string(),
            _ => return None,
        };
        match (self.item_type, self.base_item.as_deref()) {
            (ItemType::Weapon | ItemType::Tool, Some(item)) if !item.is_empty() => {
                Some(format!("{}:{}", base, item))
            }
            _ => Some(base),
        }
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c != '\'' {
            pending_dash = true;
        }
    }
    slug
}
