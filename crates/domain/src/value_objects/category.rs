//! Category keys for abstract grants ("any simple weapon", "an arcane focus").
//!
//! Base categories are populated from item subtypes. Aggregate categories are
//! only ever the union of their constituents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Which grant type a category key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFamily {
    Weapon,
    Armor,
    Tool,
}

impl CategoryFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Tool => "tool",
        }
    }
}

/// Spellcasting focus categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusKind {
    Arcane,
    Druidic,
    Holy,
}

impl FocusKind {
    pub fn all() -> [FocusKind; 3] {
        [Self::Arcane, Self::Druidic, Self::Holy]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Arcane => "Arcane Focus",
            Self::Druidic => "Druidic Focus",
            Self::Holy => "Holy Symbol",
        }
    }

    /// Item identifiers that count as a focus of this kind.
    pub fn identifiers(&self) -> &'static [&'static str] {
        match self {
            Self::Arcane => &["crystal", "orb", "rod", "staff", "wand"],
            Self::Druidic => &["sprig-of-mistletoe", "totem", "wooden-staff", "yew-wand"],
            Self::Holy => &["amulet", "emblem", "reliquary"],
        }
    }

    /// Focus kind for an item identifier, if it is a known focus.
    pub fn for_identifier(identifier: &str) -> Option<FocusKind> {
        Self::all()
            .into_iter()
            .find(|kind| kind.identifiers().contains(&identifier))
    }
}

impl fmt::Display for FocusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arcane => write!(f, "arcane"),
            Self::Druidic => write!(f, "druidic"),
            Self::Holy => write!(f, "holy"),
        }
    }
}

impl FromStr for FocusKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arcane" => Ok(Self::Arcane),
            "druidic" => Ok(Self::Druidic),
            "holy" => Ok(Self::Holy),
            other => Err(DomainError::parse(format!("Unknown focus type: {}", other))),
        }
    }
}

/// Key of a bucket in the category index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryKey {
    // Weapons
    SimpleMelee,
    SimpleRanged,
    MartialMelee,
    MartialRanged,
    /// Aggregate: simple melee + simple ranged
    Simple,
    /// Aggregate: martial melee + martial ranged
    Martial,

    // Armor
    LightArmor,
    MediumArmor,
    HeavyArmor,
    Shield,
    /// Aggregate: light + medium + heavy
    Armor,

    // Tools
    Artisan,
    Gaming,
    Musical,
    /// Aggregate: artisan + gaming + musical
    Tool,

    /// Spellcasting focus pseudo-category
    Focus(FocusKind),
}

impl CategoryKey {
    /// Every key that owns items directly.
    pub fn base_keys() -> Vec<CategoryKey> {
        let mut keys = vec![
            Self::SimpleMelee,
            Self::SimpleRanged,
            Self::MartialMelee,
            Self::MartialRanged,
            Self::LightArmor,
            Self::MediumArmor,
            Self::HeavyArmor,
            Self::Shield,
            Self::Artisan,
            Self::Gaming,
            Self::Musical,
        ];
        keys.extend(FocusKind::all().into_iter().map(Self::Focus));
        keys
    }

    pub fn aggregate_keys() -> [CategoryKey; 4] {
        [Self::Simple, Self::Martial, Self::Armor, Self::Tool]
    }

    /// Constituents of an aggregate key; empty for base keys.
    pub fn constituents(&self) -> &'static [CategoryKey] {
        match self {
            Self::Simple => &[Self::SimpleMelee, Self::SimpleRanged],
            Self::Martial => &[Self::MartialMelee, Self::MartialRanged],
            Self::Armor => &[Self::LightArmor, Self::MediumArmor, Self::HeavyArmor],
            Self::Tool => &[Self::Artisan, Self::Gaming, Self::Musical],
            _ => &[],
        }
    }

    pub fn is_aggregate(&self) -> bool {
        !self.constituents().is_empty()
    }

    pub fn family(&self) -> Option<CategoryFamily> {
        match self {
            Self::SimpleMelee
            | Self::SimpleRanged
            | Self::MartialMelee
            | Self::MartialRanged
            | Self::Simple
            | Self::Martial => Some(CategoryFamily::Weapon),
            Self::LightArmor | Self::MediumArmor | Self::HeavyArmor | Self::Shield | Self::Armor => {
                Some(CategoryFamily::Armor)
            }
            Self::Artisan | Self::Gaming | Self::Musical | Self::Tool => Some(CategoryFamily::Tool),
            Self::Focus(_) => None,
        }
    }

    /// Host key as stored in grant entries.
    pub fn key(&self) -> String {
        match self {
            Self::SimpleMelee => "simpleM".into(),
            Self::SimpleRanged => "simpleR".into(),
            Self::MartialMelee => "martialM".into(),
            Self::MartialRanged => "martialR".into(),
            Self::Simple => "sim".into(),
            Self::Martial => "mar".into(),
            Self::LightArmor => "lgt".into(),
            Self::MediumArmor => "med".into(),
            Self::HeavyArmor => "hvy".into(),
            Self::Shield => "shl".into(),
            Self::Armor => "armor".into(),
            Self::Artisan => "art".into(),
            Self::Gaming => "game".into(),
            Self::Musical => "music".into(),
            Self::Tool => "tool".into(),
            Self::Focus(kind) => format!("focus:{}", kind),
        }
    }

    /// Display label used for selects and "X or any Y" phrasing.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SimpleMelee => "Simple Melee Weapon",
            Self::SimpleRanged => "Simple Ranged Weapon",
            Self::MartialMelee => "Martial Melee Weapon",
            Self::MartialRanged => "Martial Ranged Weapon",
            Self::Simple => "Simple Weapon",
            Self::Martial => "Martial Weapon",
            Self::LightArmor => "Light Armor",
            Self::MediumArmor => "Medium Armor",
            Self::HeavyArmor => "Heavy Armor",
            Self::Shield => "Shield",
            Self::Armor => "Armor",
            Self::Artisan => "Artisan's Tools",
            Self::Gaming => "Gaming Set",
            Self::Musical => "Musical Instrument",
            Self::Tool => "Tool",
            Self::Focus(kind) => kind.label(),
        }
    }

    /// Parse a grant key for the given family ("weapon" + "sim", "armor" + "lgt").
    pub fn parse_for(family: CategoryFamily, key: &str) -> Result<CategoryKey, DomainError> {
        let parsed: CategoryKey = key.parse()?;
        if parsed.family() == Some(family) {
            Ok(parsed)
        } else {
            Err(DomainError::parse(format!(
                "Category '{}' is not a {} category",
                key,
                family.as_str()
            )))
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for CategoryKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if let Some(focus) = key.strip_prefix("focus:") {
            return Ok(Self::Focus(focus.parse()?));
        }
        match key {
            "simpleM" => Ok(Self::SimpleMelee),
            "simpleR" => Ok(Self::SimpleRanged),
            "martialM" => Ok(Self::MartialMelee),
            "martialR" => Ok(Self::MartialRanged),
            "sim" => Ok(Self::Simple),
            "mar" => Ok(Self::Martial),
            "lgt" | "light" => Ok(Self::LightArmor),
            "med" | "medium" => Ok(Self::MediumArmor),
            "hvy" | "heavy" => Ok(Self::HeavyArmor),
            "shl" | "shield" => Ok(Self::Shield),
            "armor" => Ok(Self::Armor),
            "art" => Ok(Self::Artisan),
            "game" => Ok(Self::Gaming),
            "music" => Ok(Self::Musical),
            "tool" => Ok(Self::Tool),
            other => Err(DomainError::parse(format!("Unknown category key: {}", other))),
        }
    }
}
