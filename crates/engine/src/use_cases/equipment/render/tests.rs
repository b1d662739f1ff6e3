use outfitter_domain::{FocusKind, RejectedGrant};

use super::*;
use crate::infrastructure::sample_content;
use crate::test_fixtures::{item_uuid, sample_item};
use crate::use_cases::equipment::controls::{
    ControlKind, PairPattern, SelectSpec, GROUP_LABEL, UNKNOWN_ITEM_LABEL,
};

fn resolved_for(tree: &GrantTree) -> ResolvedItems {
    let library = sample_content::items();
    let mut items = ResolvedItems::new();
    for reference in linked_references(tree) {
        if let Some(item) = library.iter().find(|i| i.uuid == reference) {
            items.insert(reference, item.clone());
        }
    }
    items
}

fn render_in(tree: &GrantTree, library: Vec<ItemDocument>, proficiencies: &[&str]) -> Vec<Control> {
    let index = CategoryIndex::from_items(library);
    let proficiencies: ProficiencySet = proficiencies.iter().copied().collect();
    let items = resolved_for(tree);
    let ctx = RenderContext::new(SourceKind::Class, tree, &index, &proficiencies, &items);
    let mut tracking = SourceTracking::default();
    render_tree(tree, &ctx, &mut tracking)
}

fn render_with(tree: &GrantTree, proficiencies: &[&str]) -> Vec<Control> {
    render_in(tree, sample_content::items(), proficiencies)
}

fn render(tree: &GrantTree) -> Vec<Control> {
    render_with(tree, &["weapon:sim", "weapon:mar"])
}

fn linked(id: &str, item: &str) -> GrantNode {
    GrantNode::linked(id, item_uuid(item))
}

fn labels(controls: &[Control]) -> Vec<&str> {
    controls.iter().map(|c| c.label.as_str()).collect()
}

fn select(control: &Control) -> &SelectSpec {
    match &control.kind {
        ControlKind::Select(spec) => spec,
        other => panic!("expected select, got {:?}", other),
    }
}

fn option_labels(spec: &SelectSpec) -> Vec<&str> {
    spec.options.iter().map(|o| o.label.as_str()).collect()
}

#[test]
fn linked_items_are_prechecked_checkboxes_with_counts() {
    let tree = GrantTree::new(vec![
        linked("a", "chain-mail"),
        linked("b", "handaxe").with_count(2),
        GrantNode::linked("c", "Compendium.srd.items.Item.vanished"),
    ]);
    let controls = render(&tree);

    assert_eq!(labels(&controls), vec!["Chain Mail", "2 Handaxe", UNKNOWN_ITEM_LABEL]);
    match &controls[1].kind {
        ControlKind::Checkbox { value, members } => {
            assert_eq!(value, item_uuid("handaxe").as_str());
            assert_eq!(members[0].quantity, 2);
        }
        other => panic!("expected checkbox, got {:?}", other),
    }
}

#[test]
fn label_override_wins() {
    let tree = GrantTree::new(vec![linked("a", "rope").with_label("50 feet of rope")]);
    assert_eq!(labels(&render(&tree)), vec!["50 feet of rope"]);
}

#[test]
fn category_select_is_sorted_and_gated_on_proficiency() {
    let tree = GrantTree::new(vec![
        GrantNode::category("m", CategoryKey::MartialMelee).requiring_proficiency()
    ]);
    let controls = render_with(&tree, &["weapon:sim", "weapon:mar:rapier"]);
    let spec = select(&controls[0]);

    assert_eq!(controls[0].label, "Any Martial Melee Weapon");
    assert_eq!(
        option_labels(spec),
        vec![
            "Battleaxe (lacks proficiency)",
            "Longsword (lacks proficiency)",
            "Rapier",
            "Shortsword (lacks proficiency)",
            "Warhammer (lacks proficiency)",
        ]
    );
    assert!(spec.options[0].disabled);
    assert_eq!(spec.default_value.as_deref(), Some(item_uuid("rapier").as_str()));
}

#[test]
fn ungated_category_ignores_proficiency() {
    let tree = GrantTree::new(vec![GrantNode::category("m", CategoryKey::Martial)]);
    let controls = render_with(&tree, &[]);
    let spec = select(&controls[0]);
    assert_eq!(spec.len(), 6);
    assert!(spec.options.iter().all(|o| !o.disabled));
}

#[test]
fn focus_renders_its_pseudo_category() {
    let tree = GrantTree::new(vec![GrantNode::focus("f", FocusKind::Holy)]);
    let controls = render(&tree);
    assert_eq!(controls[0].label, "Any Holy Symbol");
    assert_eq!(option_labels(select(&controls[0])), vec!["Amulet", "Emblem"]);
}

#[test]
fn counted_category_labels_show_the_count() {
    let tree = GrantTree::new(vec![GrantNode::category("m", CategoryKey::Musical).with_count(2)]);
    let controls = render(&tree);
    assert_eq!(controls[0].label, "Any Musical Instrument (x2)");
    assert_eq!(option_labels(select(&controls[0])), vec!["2 Lute"]);
    assert_eq!(select(&controls[0]).options[0].members[0].quantity, 2);
}

#[test]
fn empty_category_renders_an_empty_select() {
    let tree = GrantTree::new(vec![GrantNode::category("h", CategoryKey::HeavyArmor)]);
    let controls = render_in(&tree, vec![sample_item("rope")], &[]);
    assert_eq!(controls.len(), 1);
    let spec = select(&controls[0]);
    assert!(spec.is_empty());
    assert!(spec.default_value.is_none());
}

#[test]
fn nested_and_gets_a_group_label_and_deeper_children() {
    let tree = GrantTree::new(vec![GrantNode::and(
        "root",
        vec![
            linked("a", "rope"),
            GrantNode::and("kit", vec![linked("b", "torch"), linked("c", "bedroll")]),
        ],
    )]);
    let controls = render(&tree);

    assert_eq!(labels(&controls), vec!["Hempen Rope", GROUP_LABEL, "Torch", "Bedroll"]);
    assert_eq!(controls[0].depth, 0);
    assert_eq!(controls[1].kind, ControlKind::GroupLabel);
    assert!(!controls[1].is_interactive());
    assert_eq!(controls[2].depth, 1);
}

#[test]
fn ammunition_merges_with_its_weapon() {
    let tree = GrantTree::new(vec![
        linked("bow", "longbow"),
        linked("rope", "rope"),
        linked("arrows", "arrows").with_count(20),
    ]);
    let controls = render(&tree);

    assert_eq!(labels(&controls), vec!["Longbow + 20 Arrows", "Hempen Rope"]);
    assert_eq!(
        controls[0].grant_ids,
        vec![GrantId::new("bow"), GrantId::new("arrows")]
    );
    match &controls[0].kind {
        ControlKind::Checkbox { value, members } => {
            assert_eq!(
                value,
                &format!("{},{}", item_uuid("longbow"), item_uuid("arrows"))
            );
            assert_eq!(members[1].quantity, 20);
        }
        other => panic!("expected checkbox, got {:?}", other),
    }
}

#[test]
fn merging_is_pairwise_not_transitive() {
    let tree = GrantTree::new(vec![
        linked("bow", "longbow"),
        linked("arrows", "arrows"),
        linked("bolts", "crossbow-bolts"),
    ]);
    let controls = render(&tree);
    assert_eq!(labels(&controls), vec!["Longbow + Arrows", "Crossbow Bolts"]);
}

#[test]
fn containers_merge_but_packs_do_not() {
    let tree = GrantTree::new(vec![
        linked("clothes", "common-clothes"),
        linked("pouch", "pouch"),
        linked("pack", "explorers-pack"),
        linked("torch", "torch"),
    ]);
    let controls = render(&tree);
    assert_eq!(
        labels(&controls),
        vec!["Common Clothes + Pouch", "Explorer's Pack", "Torch"]
    );
}

#[test]
fn merge_rule_is_symmetric() {
    let bow = sample_item("shortbow");
    let arrows = sample_item("arrows");
    let pouch = sample_item("pouch");
    let backpack = sample_item("backpack");
    assert!(is_merge_pair(&bow, &arrows));
    assert!(is_merge_pair(&arrows, &bow));
    assert!(is_merge_pair(&sample_item("rope"), &pouch));
    assert!(!is_merge_pair(&pouch, &backpack));
    assert!(!is_merge_pair(&sample_item("dagger"), &arrows));
}

#[test]
fn or_becomes_one_sorted_select() {
    let tree = GrantTree::new(vec![GrantNode::or(
        "armor",
        vec![
            linked("scale", "scale-mail"),
            GrantNode::and(
                "kit",
                vec![linked("leather", "leather-armor"), linked("bow", "longbow")],
            ),
            GrantNode::or("inner", vec![linked("chain", "chain-mail")]),
        ],
    )]);
    let controls = render(&tree);

    assert_eq!(controls.len(), 1);
    assert_eq!(controls[0].label, "Choose one");
    let spec = select(&controls[0]);
    assert_eq!(
        option_labels(spec),
        vec!["Chain Mail", "Leather Armor + Longbow", "Scale Mail"]
    );
    assert_eq!(spec.options[1].members.len(), 2);
    assert_eq!(spec.default_value, Some(spec.options[0].value.clone()));
}

#[test]
fn or_members_never_render_standalone() {
    let tree = GrantTree::new(vec![GrantNode::or(
        "pack",
        vec![linked("a", "explorers-pack"), linked("b", "dungeoneers-pack")],
    )]);
    let controls = render(&tree);
    assert_eq!(controls.len(), 1);
    assert_eq!(controls[0].grant_ids, vec![GrantId::new("pack")]);
}

#[test]
fn unresolved_or_options_are_skipped() {
    let tree = GrantTree::new(vec![GrantNode::or(
        "pick",
        vec![
            linked("a", "rope"),
            GrantNode::linked("b", "Compendium.srd.items.Item.vanished"),
        ],
    )]);
    let controls = render(&tree);
    assert_eq!(option_labels(select(&controls[0])), vec!["Hempen Rope"]);
}

#[test]
fn item_or_category_label() {
    let tree = GrantTree::new(vec![GrantNode::or(
        "focus",
        vec![
            linked("pouch", "component-pouch"),
            GrantNode::focus("arcane", FocusKind::Arcane),
        ],
    )]);
    let controls = render(&tree);
    assert_eq!(controls[0].label, "Component Pouch or any Arcane Focus");
    assert_eq!(
        option_labels(select(&controls[0])),
        vec!["Component Pouch", "Crystal", "Orb", "Wand"]
    );
}

#[test]
fn weapon_and_shield_is_a_paired_select() {
    let tree = GrantTree::new(vec![GrantNode::or(
        "weapons",
        vec![
            GrantNode::and(
                "board",
                vec![
                    GrantNode::category("martial", CategoryKey::Martial),
                    linked("shield", "shield"),
                ],
            ),
            GrantNode::category("two", CategoryKey::Martial).with_count(2),
        ],
    )]);
    let controls = render(&tree);

    assert_eq!(controls.len(), 1);
    assert_eq!(controls[0].label, "Any Martial Weapon and Shield");
    match &controls[0].kind {
        ControlKind::PairedSelect {
            pattern,
            primary,
            secondary,
            secondary_hidden_for,
        } => {
            assert_eq!(*pattern, PairPattern::WeaponAndShield);
            assert_eq!(primary.len(), 6);
            assert_eq!(secondary.len(), 7);
            assert_eq!(secondary.options[0].label, "Shield");
            assert!(secondary_hidden_for.is_empty());
        }
        other => panic!("expected paired select, got {:?}", other),
    }
}

#[test]
fn weapon_and_shield_keeps_other_alternatives() {
    let tree = GrantTree::new(vec![GrantNode::or(
        "weapons",
        vec![
            GrantNode::and(
                "board",
                vec![
                    GrantNode::category("martial", CategoryKey::Martial),
                    linked("shield", "shield"),
                ],
            ),
            linked("rope", "rope"),
        ],
    )]);
    let controls = render(&tree);

    assert_eq!(controls.len(), 1);
    assert_eq!(controls[0].label, "Any Martial Weapon and Shield or Hempen Rope");
    match &controls[0].kind {
        ControlKind::PairedSelect {
            pattern,
            primary,
            secondary,
            secondary_hidden_for,
        } => {
            assert_eq!(*pattern, PairPattern::WeaponAndShield);
            assert_eq!(primary.len(), 7);
            assert_eq!(primary.options[0].label, "Hempen Rope");
            assert_eq!(secondary.len(), 7);
            assert_eq!(secondary_hidden_for, &vec![primary.options[0].value.clone()]);
        }
        other => panic!("expected paired select, got {:?}", other),
    }
}

#[test]
fn multiple_weapons_hide_the_second_picker_for_alternatives() {
    let tree = GrantTree::new(vec![GrantNode::or(
        "weapons",
        vec![
            linked("swords", "shortsword").with_count(2),
            GrantNode::category("simple", CategoryKey::SimpleMelee).with_count(2),
        ],
    )]);
    let controls = render(&tree);

    assert_eq!(controls[0].label, "2 Shortsword or 2 Simple Melee Weapons");
    match &controls[0].kind {
        ControlKind::PairedSelect {
            pattern,
            primary,
            secondary,
            secondary_hidden_for,
        } => {
            assert_eq!(*pattern, PairPattern::MultiWeapon);
            assert_eq!(primary.options[0].label, "2 Shortsword");
            assert_eq!(primary.options[0].members[0].quantity, 2);
            assert_eq!(primary.options[1].label, "Club");
            assert_eq!(primary.len(), 7);
            assert_eq!(secondary.len(), 6);
            assert!(secondary.options.iter().all(|o| o.members[0].quantity == 1));
            assert_eq!(secondary_hidden_for, &vec![primary.options[0].value.clone()]);
        }
        other => panic!("expected paired select, got {:?}", other),
    }
}

#[test]
fn empty_or_becomes_a_placeholder() {
    let tree = GrantTree::new(vec![
        GrantNode::or("nothing", vec![]),
        GrantNode::or(
            "ghosts",
            vec![GrantNode::linked("g", "Compendium.srd.items.Item.vanished")],
        ),
        linked("rope", "rope"),
    ]);
    let controls = render(&tree);

    assert_eq!(controls.len(), 3);
    assert!(controls[0].is_placeholder());
    assert!(controls[1].is_placeholder());
    assert_eq!(controls[2].label, "Hempen Rope");
}

#[test]
fn rejected_entries_trail_as_placeholders() {
    let mut tree = GrantTree::new(vec![linked("rope", "rope")]);
    tree.rejected.push(RejectedGrant {
        id: GrantId::new("weird"),
        reason: "unknown entry type 'spell'".into(),
    });
    let controls = render(&tree);
    assert_eq!(controls.len(), 2);
    assert!(controls[1].is_placeholder());
    assert_eq!(controls[1].grant_ids, vec![GrantId::new("weird")]);
}

#[test]
fn deep_nesting_is_cut_off() {
    let mut node = linked("leaf", "rope");
    for level in 0..12 {
        node = GrantNode::and(format!("level-{}", level), vec![node]);
    }
    let controls = render(&GrantTree::new(vec![node]));
    assert!(controls.last().unwrap().is_placeholder());
    assert!(controls.iter().all(|c| c.label != "Hempen Rope"));
}

#[test]
fn a_grant_is_rendered_at_most_once() {
    let tree = sample_content::fighter().grant_tree();
    let index = CategoryIndex::from_items(sample_content::items());
    let proficiencies = ProficiencySet::new();
    let items = resolved_for(&tree);
    let ctx = RenderContext::new(SourceKind::Class, &tree, &index, &proficiencies, &items);
    let mut tracking = SourceTracking::default();

    let first = render_tree(&tree, &ctx, &mut tracking);
    assert_eq!(first.len(), 4);
    assert_eq!(tracking.rendered_count(), tree.node_count());

    let again = render_tree(&tree, &ctx, &mut tracking);
    assert!(again.is_empty());

    let mut seen = std::collections::HashSet::new();
    for control in &first {
        for id in &control.grant_ids {
            assert!(seen.insert(id.clone()), "{} rendered twice", id);
        }
    }
}
