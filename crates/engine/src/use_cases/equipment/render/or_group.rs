//! OR strategy: exactly one child is granted.
//!
//! Most OR groups become a single select over the options of every child.
//! Two weapon shapes get a paired select instead:
//!
//! - weapon and shield: an AND child holding one weapon category plus linked
//!   items. The primary picker lists the weapons, the secondary lists the
//!   linked items and the weapons again, so "a weapon and a shield" and
//!   "two weapons" are both reachable. Any other alternative joins the
//!   primary picker and hides the secondary while chosen.
//! - multiple weapons: a weapon category child with a count above one. The
//!   primary picker lists the other children first, then single weapons; the
//!   secondary adds the remaining weapons and is hidden while a fixed
//!   alternative is chosen.

use std::collections::HashSet;

use outfitter_domain::{CategoryFamily, CategoryKey, GrantKind, GrantNode};

use super::category::category_label;
use super::{RenderContext, RenderError};
use crate::use_cases::equipment::controls::{
    Control, ControlKind, ControlMember, PairPattern, SelectOption, SelectSpec,
};
use crate::use_cases::equipment::tracking::SourceTracking;

const CHOOSE_ONE_LABEL: &str = "Choose one";

enum Shape<'n> {
    WeaponAndShield {
        weapon: &'n GrantNode,
        key: CategoryKey,
        linked: Vec<&'n GrantNode>,
        others: Vec<&'n GrantNode>,
    },
    MultiWeapon {
        weapon: &'n GrantNode,
        key: CategoryKey,
        alternatives: Vec<&'n GrantNode>,
    },
    Single,
}

pub(super) fn render(
    node: &GrantNode,
    children: &[GrantNode],
    depth: u32,
    ctx: &RenderContext<'_>,
    tracking: &mut SourceTracking,
) -> Result<Vec<Control>, RenderError> {
    if tracking.is_consumed(&node.id) || ctx.is_or_member(node) {
        return Ok(Vec::new());
    }

    let control = match shape_of(children) {
        Shape::WeaponAndShield {
            weapon,
            key,
            linked,
            others,
        } => weapon_and_shield(node, weapon, key, &linked, &others, depth, ctx)?,
        Shape::MultiWeapon {
            weapon,
            key,
            alternatives,
        } => multi_weapon(node, weapon, key, &alternatives, depth, ctx)?,
        Shape::Single => single_select(node, children, depth, ctx)?,
    };

    for id in node.subtree_ids() {
        tracking.mark_rendered(&id);
    }
    Ok(vec![control])
}

fn weapon_key(node: &GrantNode) -> Option<CategoryKey> {
    match &node.kind {
        GrantKind::Category { key } if key.family() == Some(CategoryFamily::Weapon) => Some(*key),
        _ => None,
    }
}

fn shape_of(children: &[GrantNode]) -> Shape<'_> {
    for child in children {
        let GrantKind::And { children: members } = &child.kind else {
            continue;
        };
        let weapons: Vec<(&GrantNode, CategoryKey)> = members
            .iter()
            .filter_map(|m| weapon_key(m).map(|key| (m, key)))
            .collect();
        let linked: Vec<&GrantNode> = members
            .iter()
            .filter(|m| m.linked_reference().is_some())
            .collect();
        if let [(weapon, key)] = weapons.as_slice() {
            if !linked.is_empty() && weapons.len() + linked.len() == members.len() {
                return Shape::WeaponAndShield {
                    weapon,
                    key: *key,
                    linked,
                    others: children.iter().filter(|c| c.id != child.id).collect(),
                };
            }
        }
    }

    for child in children {
        if let Some(key) = weapon_key(child).filter(|_| child.count > 1) {
            let alternatives = children.iter().filter(|c| c.id != child.id).collect();
            return Shape::MultiWeapon {
                weapon: child,
                key,
                alternatives,
            };
        }
    }

    Shape::Single
}

fn weapon_and_shield(
    node: &GrantNode,
    weapon: &GrantNode,
    key: CategoryKey,
    linked: &[&GrantNode],
    others: &[&GrantNode],
    depth: u32,
    ctx: &RenderContext<'_>,
) -> Result<Control, RenderError> {
    // Weapons of the same category are already reachable through the
    // secondary picker.
    let fixed = sorted(dedupe(
        others
            .iter()
            .filter(|o| weapon_key(o) != Some(key))
            .flat_map(|o| options_for(o, ctx))
            .collect(),
    ));
    let hidden_for: Vec<String> = fixed.iter().map(|o| o.value.clone()).collect();

    let mut primary = fixed.clone();
    primary.extend(ctx.category_options(key, weapon.count, weapon.requires_proficiency));
    if primary.is_empty() {
        return Err(RenderError::EmptyChoice(node.id.clone()));
    }

    let mut secondary: Vec<SelectOption> = linked
        .iter()
        .flat_map(|l| options_for(l, ctx))
        .collect();
    secondary.extend(primary.iter().cloned());

    let label = node.label.clone().unwrap_or_else(|| {
        let extras: Vec<String> = linked
            .iter()
            .filter_map(|l| l.linked_reference().map(|r| ctx.linked_label(l, r)))
            .collect();
        let pair = format!("{} and {}", category_label(key, weapon.count), extras.join(" + "));
        if fixed.is_empty() {
            pair
        } else {
            let fixed_labels: Vec<&str> = fixed.iter().map(|o| o.label.as_str()).collect();
            format!("{} or {}", pair, fixed_labels.join(" or "))
        }
    });

    Ok(Control::new(
        ctx.source,
        vec![node.id.clone()],
        label,
        depth,
        ControlKind::PairedSelect {
            pattern: PairPattern::WeaponAndShield,
            primary: SelectSpec::new(primary),
            secondary: SelectSpec::new(dedupe(secondary)),
            secondary_hidden_for: hidden_for,
        },
    ))
}

fn multi_weapon(
    node: &GrantNode,
    weapon: &GrantNode,
    key: CategoryKey,
    alternatives: &[&GrantNode],
    depth: u32,
    ctx: &RenderContext<'_>,
) -> Result<Control, RenderError> {
    let fixed = sorted(dedupe(
        alternatives
            .iter()
            .flat_map(|a| options_for(a, ctx))
            .collect(),
    ));
    let hidden_for: Vec<String> = fixed.iter().map(|o| o.value.clone()).collect();

    let mut primary = fixed.clone();
    primary.extend(ctx.category_options(key, 1, weapon.requires_proficiency));
    if primary.is_empty() {
        return Err(RenderError::EmptyChoice(node.id.clone()));
    }
    let secondary = ctx.category_options(key, weapon.count - 1, weapon.requires_proficiency);

    let label = node.label.clone().unwrap_or_else(|| {
        let weapons = format!("{} {}s", weapon.count, key.label());
        if fixed.is_empty() {
            weapons
        } else {
            let fixed_labels: Vec<&str> = fixed.iter().map(|o| o.label.as_str()).collect();
            format!("{} or {}", fixed_labels.join(" or "), weapons)
        }
    });

    Ok(Control::new(
        ctx.source,
        vec![node.id.clone()],
        label,
        depth,
        ControlKind::PairedSelect {
            pattern: PairPattern::MultiWeapon,
            primary: SelectSpec::new(primary),
            secondary: SelectSpec::new(secondary),
            secondary_hidden_for: hidden_for,
        },
    ))
}

fn single_select(
    node: &GrantNode,
    children: &[GrantNode],
    depth: u32,
    ctx: &RenderContext<'_>,
) -> Result<Control, RenderError> {
    let options = sorted(dedupe(
        children.iter().flat_map(|c| options_for(c, ctx)).collect(),
    ));
    if options.is_empty() {
        return Err(RenderError::EmptyChoice(node.id.clone()));
    }

    let label = node
        .label
        .clone()
        .or_else(|| item_or_category_label(children, ctx))
        .unwrap_or_else(|| CHOOSE_ONE_LABEL.to_string());

    Ok(Control::new(
        ctx.source,
        vec![node.id.clone()],
        label,
        depth,
        ControlKind::Select(SelectSpec::new(options)),
    ))
}

/// "X or any <category>" for one linked child next to one category child.
fn item_or_category_label(children: &[GrantNode], ctx: &RenderContext<'_>) -> Option<String> {
    let [a, b] = children else {
        return None;
    };
    let (linked, category) = if a.linked_reference().is_some() { (a, b) } else { (b, a) };
    let reference = linked.linked_reference()?;
    let key = category.category_key()?;
    Some(format!(
        "{} or any {}",
        ctx.linked_label(linked, reference),
        key.label()
    ))
}

/// Every option a child contributes to an OR select.
///
/// Nested ORs are flattened. An AND contributes one combined option per
/// combination of its children's options, so a linked-only AND yields a
/// single option granting all of its items.
fn options_for(node: &GrantNode, ctx: &RenderContext<'_>) -> Vec<SelectOption> {
    match &node.kind {
        GrantKind::Linked { reference } => {
            if ctx.items.get(reference).is_none() {
                tracing::debug!(reference = %reference, "Skipping unresolved option");
                return Vec::new();
            }
            vec![SelectOption::new(
                ctx.linked_label(node, reference),
                vec![ctx.linked_member(node, reference)],
            )]
        }
        GrantKind::Category { key } => {
            ctx.category_options(*key, node.count, node.requires_proficiency)
        }
        GrantKind::Focus { focus } => ctx.category_options(
            CategoryKey::Focus(*focus),
            node.count,
            node.requires_proficiency,
        ),
        GrantKind::Or { children } => children.iter().flat_map(|c| options_for(c, ctx)).collect(),
        GrantKind::And { children } => combine(children, ctx),
    }
}

fn combine(children: &[GrantNode], ctx: &RenderContext<'_>) -> Vec<SelectOption> {
    let mut combos: Vec<(Vec<String>, Vec<ControlMember>, bool)> = vec![(Vec::new(), Vec::new(), false)];
    for child in children {
        let options = options_for(child, ctx);
        if options.is_empty() {
            tracing::debug!(grant_id = %child.id, "AND member has no options, leaving it out");
            continue;
        }
        combos = combos
            .into_iter()
            .flat_map(|(labels, members, disabled)| {
                options.iter().map(move |option| {
                    let mut labels = labels.clone();
                    labels.push(option.label.clone());
                    let mut members = members.clone();
                    members.extend(option.members.iter().cloned());
                    (labels, members, disabled || option.disabled)
                })
            })
            .collect();
    }

    combos
        .into_iter()
        .filter(|(labels, _, _)| !labels.is_empty())
        .map(|(labels, members, disabled)| {
            SelectOption::new(labels.join(" + "), members).disabled(disabled)
        })
        .collect()
}

fn dedupe(options: Vec<SelectOption>) -> Vec<SelectOption> {
    let mut seen = HashSet::new();
    options
        .into_iter()
        .filter(|o| seen.insert(o.value.clone()))
        .collect()
}

fn sorted(mut options: Vec<SelectOption>) -> Vec<SelectOption> {
    options.sort_by(|a, b| {
        a.label
            .to_lowercase()
            .cmp(&b.label.to_lowercase())
            .then_with(|| a.value.cmp(&b.value))
    });
    options
}
