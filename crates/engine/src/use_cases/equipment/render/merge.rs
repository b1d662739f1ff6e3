//! Merge-grouping of related linked siblings.
//!
//! Two linked children of an AND merge into one checkbox when one is a
//! weapon that uses ammunition and the other is ammunition, or when one is a
//! container (not a pack) and the other is not a container. Grouping is
//! pairwise and first-match-wins; a third related item stays on its own.

use std::collections::HashSet;

use outfitter_domain::{GrantNode, ItemDocument};

use super::RenderContext;
use crate::use_cases::equipment::tracking::SourceTracking;

pub fn is_merge_pair(a: &ItemDocument, b: &ItemDocument) -> bool {
    let ammunition = |weapon: &ItemDocument, ammo: &ItemDocument| {
        weapon.uses_ammunition() && ammo.is_ammunition()
    };
    let contents = |container: &ItemDocument, other: &ItemDocument| {
        container.is_container() && !container.is_pack() && !other.is_container()
    };
    ammunition(a, b) || ammunition(b, a) || contents(a, b) || contents(b, a)
}

/// Sibling index pairs to merge, in order of their first member.
pub(super) fn find_pairs(
    children: &[GrantNode],
    ctx: &RenderContext<'_>,
    tracking: &SourceTracking,
) -> Vec<(usize, usize)> {
    let candidates: Vec<(usize, &ItemDocument)> = children
        .iter()
        .enumerate()
        .filter(|(_, child)| !tracking.is_consumed(&child.id))
        .filter_map(|(i, child)| {
            let reference = child.linked_reference()?;
            ctx.items.get(reference).map(|item| (i, item))
        })
        .collect();

    let mut used: HashSet<usize> = HashSet::new();
    let mut pairs = Vec::new();
    for (n, (i, first)) in candidates.iter().enumerate() {
        if used.contains(i) {
            continue;
        }
        let partner = candidates[n + 1..]
            .iter()
            .find(|(j, second)| !used.contains(j) && is_merge_pair(first, second));
        if let Some((j, _)) = partner {
            used.insert(*i);
            used.insert(*j);
            pairs.push((*i, *j));
        }
    }
    pairs
}
