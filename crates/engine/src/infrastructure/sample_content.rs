//! Bundled SRD-style content used by the demo binary and scenario tests.
//!
//! Items live in the `srd.items` source, classes in `srd.classes` and
//! backgrounds in `srd.backgrounds`; the settings store points at all three.

use outfitter_domain::{
    Advancement, ContainedItem, Currency, DocumentUuid, GrantId, ItemDocument, ItemType,
    RawGrantEntry, SourceDocument, SourceId, SourceKind,
};

use super::memory_content::MemoryContentLibrary;
use crate::use_cases::equipment::{BACKGROUND_SOURCES_KEY, CLASS_SOURCES_KEY, ITEM_SOURCES_KEY};

pub const ITEM_SOURCE: &str = "srd.items";
pub const CLASS_SOURCE: &str = "srd.classes";
pub const BACKGROUND_SOURCE: &str = "srd.backgrounds";

pub fn item_uuid(id: &str) -> DocumentUuid {
    DocumentUuid::new(format!("Compendium.srd.items.Item.{}", id))
}

pub fn class_uuid(id: &str) -> DocumentUuid {
    DocumentUuid::new(format!("Compendium.srd.classes.Item.{}", id))
}

pub fn background_uuid(id: &str) -> DocumentUuid {
    DocumentUuid::new(format!("Compendium.srd.backgrounds.Item.{}", id))
}

fn item(id: &str, name: &str, item_type: ItemType) -> ItemDocument {
    ItemDocument::new(item_uuid(id), name, item_type).with_identifier(id)
}

fn weapon(id: &str, name: &str, subtype: &str) -> ItemDocument {
    item(id, name, ItemType::Weapon)
        .with_subtype(subtype)
        .with_base_item(id)
}

fn armor(id: &str, name: &str, subtype: &str) -> ItemDocument {
    item(id, name, ItemType::Equipment).with_subtype(subtype)
}

fn tool(id: &str, name: &str, subtype: &str) -> ItemDocument {
    item(id, name, ItemType::Tool)
        .with_subtype(subtype)
        .with_base_item(id)
}

fn contained(id: &str, quantity: u32) -> ContainedItem {
    ContainedItem {
        uuid: item_uuid(id),
        quantity,
    }
}

/// Every item document of the sample library.
pub fn items() -> Vec<ItemDocument> {
    vec![
        // Simple weapons
        weapon("club", "Club", "simpleM"),
        weapon("dagger", "Dagger", "simpleM"),
        weapon("handaxe", "Handaxe", "simpleM"),
        weapon("mace", "Mace", "simpleM"),
        weapon("quarterstaff", "Quarterstaff", "simpleM"),
        weapon("spear", "Spear", "simpleM"),
        weapon("light-crossbow", "Light Crossbow", "simpleR").with_property("amm"),
        weapon("shortbow", "Shortbow", "simpleR").with_property("amm"),
        // Martial weapons
        weapon("battleaxe", "Battleaxe", "martialM"),
        weapon("longsword", "Longsword", "martialM"),
        weapon("rapier", "Rapier", "martialM"),
        weapon("shortsword", "Shortsword", "martialM"),
        weapon("warhammer", "Warhammer", "martialM"),
        weapon("longbow", "Longbow", "martialR").with_property("amm"),
        weapon("flame-tongue", "Flame Tongue", "martialM").with_property("mgc"),
        // Ammunition
        item("arrows", "Arrows", ItemType::Consumable)
            .with_subtype("ammo")
            .with_quantity(20),
        item("crossbow-bolts", "Crossbow Bolts", ItemType::Consumable)
            .with_subtype("ammo")
            .with_quantity(20),
        // Armor
        armor("leather-armor", "Leather Armor", "light"),
        armor("scale-mail", "Scale Mail", "medium"),
        armor("chain-mail", "Chain Mail", "heavy"),
        armor("shield", "Shield", "shield"),
        // Tools
        tool("thieves-tools", "Thieves' Tools", "thief"),
        tool("smiths-tools", "Smith's Tools", "art"),
        tool("dice-set", "Dice Set", "game"),
        tool("playing-cards", "Playing Card Set", "game"),
        tool("lute", "Lute", "music"),
        // Spellcasting foci
        item("crystal", "Crystal", ItemType::Equipment),
        item("wand", "Wand", ItemType::Equipment),
        item("orb", "Orb", ItemType::Equipment),
        item("amulet", "Amulet", ItemType::Equipment),
        item("emblem", "Emblem", ItemType::Equipment),
        item("sprig-of-mistletoe", "Sprig of Mistletoe", ItemType::Equipment),
        item("component-pouch", "Component Pouch", ItemType::Equipment),
        // Adventuring gear
        item("bedroll", "Bedroll", ItemType::Loot),
        item("rations", "Rations", ItemType::Consumable).with_subtype("food"),
        item("rope", "Hempen Rope", ItemType::Loot),
        item("torch", "Torch", ItemType::Loot),
        item("crowbar", "Crowbar", ItemType::Loot),
        item("candle", "Candle", ItemType::Loot),
        item("common-clothes", "Common Clothes", ItemType::Equipment).with_subtype("clothing"),
        item("vestments", "Vestments", ItemType::Equipment).with_subtype("clothing"),
        item("prayer-book", "Prayer Book", ItemType::Loot),
        // Containers
        item("backpack", "Backpack", ItemType::Container),
        item("pouch", "Pouch", ItemType::Container).with_currency(Currency::gold(15)),
        item("explorers-pack", "Explorer's Pack", ItemType::Container)
            .with_subtype("pack")
            .with_contents(vec![
                contained("backpack", 1),
                contained("bedroll", 1),
                contained("rations", 10),
                contained("rope", 1),
                contained("torch", 10),
            ]),
        item("dungeoneers-pack", "Dungeoneer's Pack", ItemType::Container)
            .with_subtype("pack")
            .with_contents(vec![
                contained("backpack", 1),
                contained("crowbar", 1),
                contained("rations", 10),
                contained("torch", 10),
            ]),
        item("priests-pack", "Priest's Pack", ItemType::Container)
            .with_subtype("pack")
            .with_contents(vec![
                contained("backpack", 1),
                contained("candle", 10),
                contained("rations", 2),
                contained("vanished-censer", 1),
            ]),
    ]
}

/// A raw grant entry as the host would store it.
pub fn entry(
    id: &str,
    group: Option<&str>,
    sort: i64,
    entry_type: &str,
    key: Option<&str>,
) -> RawGrantEntry {
    RawGrantEntry {
        id: GrantId::new(id),
        group: group.map(GrantId::new),
        sort,
        entry_type: entry_type.to_string(),
        key: key.map(str::to_string),
        count: None,
        requires_proficiency: false,
        label: None,
    }
}

fn linked(id: &str, group: Option<&str>, sort: i64, item_id: &str) -> RawGrantEntry {
    let key = item_uuid(item_id);
    entry(id, group, sort, "linked", Some(key.as_str()))
}

fn counted(mut entry: RawGrantEntry, count: u32) -> RawGrantEntry {
    entry.count = Some(count);
    entry
}

fn gated(mut entry: RawGrantEntry) -> RawGrantEntry {
    entry.requires_proficiency = true;
    entry
}

/// Chain mail or leather kit; a weapon and shield or two weapons; a
/// crossbow or two handaxes; one of two packs.
pub fn fighter() -> SourceDocument {
    SourceDocument::new(class_uuid("fighter"), "Fighter", SourceKind::Class)
        .with_equipment(vec![
            entry("f-armor", None, 100, "OR", None),
            linked("f-chain", Some("f-armor"), 100, "chain-mail"),
            entry("f-kit", Some("f-armor"), 200, "AND", None),
            linked("f-leather", Some("f-kit"), 100, "leather-armor"),
            linked("f-longbow", Some("f-kit"), 200, "longbow"),
            counted(linked("f-arrows", Some("f-kit"), 300, "arrows"), 20),
            entry("f-weapons", None, 200, "OR", None),
            entry("f-sword-board", Some("f-weapons"), 100, "AND", None),
            entry("f-martial", Some("f-sword-board"), 100, "weapon", Some("mar")),
            linked("f-shield", Some("f-sword-board"), 200, "shield"),
            counted(entry("f-two", Some("f-weapons"), 200, "weapon", Some("mar")), 2),
            entry("f-ranged", None, 300, "OR", None),
            entry("f-crossbow", Some("f-ranged"), 100, "AND", None),
            linked("f-xbow", Some("f-crossbow"), 100, "light-crossbow"),
            counted(linked("f-bolts", Some("f-crossbow"), 200, "crossbow-bolts"), 20),
            counted(linked("f-handaxes", Some("f-ranged"), 200, "handaxe"), 2),
            entry("f-pack", None, 400, "OR", None),
            linked("f-dungeoneer", Some("f-pack"), 100, "dungeoneers-pack"),
            linked("f-explorer", Some("f-pack"), 200, "explorers-pack"),
        ])
        .with_wealth("5d4*10")
        .with_advancement(Advancement::traits(
            1,
            &["weapon:sim", "weapon:mar", "armor:lgt", "armor:med", "armor:hvy", "armor:shl"],
        ))
}

/// A staff or dagger, a pouch or any arcane focus, and an explorer's pack.
pub fn wizard() -> SourceDocument {
    SourceDocument::new(class_uuid("wizard"), "Wizard", SourceKind::Class)
        .with_equipment(vec![
            entry("w-weapon", None, 100, "OR", None),
            linked("w-staff", Some("w-weapon"), 100, "quarterstaff"),
            linked("w-dagger", Some("w-weapon"), 200, "dagger"),
            entry("w-focus", None, 200, "OR", None),
            linked("w-pouch", Some("w-focus"), 100, "component-pouch"),
            entry("w-arcane", Some("w-focus"), 200, "focus", Some("arcane")),
            linked("w-pack", None, 300, "explorers-pack"),
        ])
        .with_wealth("4d4*10")
        .with_advancement(Advancement::traits(
            1,
            &["weapon:sim:dagger", "weapon:sim:quarterstaff", "weapon:sim:light-crossbow"],
        ))
}

/// Armor choice, two shortswords or two simple melee weapons, a pack, and
/// a longbow with a quiver of arrows.
pub fn ranger() -> SourceDocument {
    SourceDocument::new(class_uuid("ranger"), "Ranger", SourceKind::Class)
        .with_equipment(vec![
            entry("r-armor", None, 100, "OR", None),
            linked("r-scale", Some("r-armor"), 100, "scale-mail"),
            linked("r-leather", Some("r-armor"), 200, "leather-armor"),
            entry("r-weapons", None, 200, "OR", None),
            counted(linked("r-shortswords", Some("r-weapons"), 100, "shortsword"), 2),
            counted(entry("r-simple", Some("r-weapons"), 200, "weapon", Some("simpleM")), 2),
            linked("r-pack", None, 300, "explorers-pack"),
            linked("r-longbow", None, 400, "longbow"),
            counted(linked("r-arrows", None, 500, "arrows"), 20),
        ])
        .with_wealth("5d4*10")
        .with_advancement(Advancement::traits(
            1,
            &["weapon:sim", "weapon:mar", "armor:lgt", "armor:med", "armor:shl"],
        ))
}

/// A simple weapon or a martial one it cannot use, a shield, a holy symbol
/// and a priest's pack.
pub fn cleric() -> SourceDocument {
    SourceDocument::new(class_uuid("cleric"), "Cleric", SourceKind::Class)
        .with_equipment(vec![
            entry("c-weapon", None, 100, "OR", None),
            entry("c-simple", Some("c-weapon"), 100, "weapon", Some("simpleM")),
            gated(entry("c-martial", Some("c-weapon"), 200, "weapon", Some("martialM"))),
            linked("c-shield", None, 200, "shield"),
            entry("c-symbol", None, 300, "focus", Some("holy")),
            linked("c-pack", None, 400, "priests-pack"),
        ])
        .with_wealth("5d4*10")
        .with_advancement(Advancement::traits(
            1,
            &["weapon:sim", "armor:lgt", "armor:med", "armor:shl"],
        ))
}

/// No structured equipment; the description lists it instead.
pub fn monk() -> SourceDocument {
    SourceDocument::new(class_uuid("monk"), "Monk", SourceKind::Class)
        .with_wealth("5d4")
        .with_description(
            "<p>Monks channel ki.</p>\
             <h3>Starting Equipment</h3>\
             <ul><li>A shortsword or any simple weapon</li><li>10 darts</li></ul>\
             <h3>Martial Arts</h3><p>Unarmed strikes.</p>",
        )
}

/// Holy symbol, prayer book, and common clothes in a pouch.
pub fn acolyte() -> SourceDocument {
    SourceDocument::new(background_uuid("acolyte"), "Acolyte", SourceKind::Background)
        .with_equipment(vec![
            entry("a-symbol", None, 100, "focus", Some("holy")),
            linked("a-book", None, 200, "prayer-book"),
            entry("a-kit", None, 300, "AND", None),
            linked("a-clothes", Some("a-kit"), 100, "common-clothes"),
            linked("a-pouch", Some("a-kit"), 200, "pouch"),
        ])
        .with_wealth("50")
}

/// Any gaming set, a dagger, and common clothes in a pouch.
pub fn soldier() -> SourceDocument {
    SourceDocument::new(background_uuid("soldier"), "Soldier", SourceKind::Background)
        .with_equipment(vec![
            entry("s-game", None, 100, "tool", Some("game")),
            linked("s-dagger", None, 200, "dagger"),
            linked("s-clothes", None, 300, "common-clothes"),
            linked("s-pouch", None, 400, "pouch"),
        ])
        .with_wealth("50")
}

pub fn classes() -> Vec<SourceDocument> {
    vec![fighter(), wizard(), ranger(), cleric(), monk()]
}

pub fn backgrounds() -> Vec<SourceDocument> {
    vec![acolyte(), soldier()]
}

/// An in-memory library holding every sample document, with source lists
/// configured under `namespace`.
pub fn library(namespace: &str) -> MemoryContentLibrary {
    MemoryContentLibrary::new()
        .with_documents(SourceId::new(ITEM_SOURCE), items().into_iter().map(Into::into))
        .with_documents(SourceId::new(CLASS_SOURCE), classes().into_iter().map(Into::into))
        .with_documents(
            SourceId::new(BACKGROUND_SOURCE),
            backgrounds().into_iter().map(Into::into),
        )
        .with_setting(namespace, ITEM_SOURCES_KEY, serde_json::json!([ITEM_SOURCE]))
        .with_setting(namespace, CLASS_SOURCES_KEY, serde_json::json!([CLASS_SOURCE]))
        .with_setting(
            namespace,
            BACKGROUND_SOURCES_KEY,
            serde_json::json!([BACKGROUND_SOURCE]),
        )
}
