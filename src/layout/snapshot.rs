use std::collections::BTreeMap;

use crate::ir::{Canvas, Node};

use super::types::{GroupSnapshot, Rect};

/// Whether `outer` geometrically encloses `inner`.
///
/// Two groups with identical rectangles would otherwise contain each other;
/// the one with the lexicographically smaller id is taken as the outer one.
pub(crate) fn encloses(outer: &Node, inner: &Node) -> bool {
    let outer_rect = Rect::of(outer);
    let inner_rect = Rect::of(inner);
    if !outer_rect.contains(&inner_rect) {
        return false;
    }
    if outer.is_group() && inner.is_group() && outer_rect == inner_rect {
        return outer.id < inner.id;
    }
    true
}

/// Captures group membership and nesting from the canvas as it is now.
pub fn snapshot_groups(canvas: &Canvas) -> GroupSnapshot {
    let groups: Vec<&Node> = canvas.groups().collect();
    let plain: Vec<&Node> = canvas.plain_nodes().collect();

    let mut snapshot = GroupSnapshot::default();
    for group in &groups {
        let nodes = plain
            .iter()
            .filter(|node| encloses(group, node))
            .map(|node| node.id.clone())
            .collect();
        let children = groups
            .iter()
            .filter(|other| other.id != group.id && encloses(group, other))
            .map(|other| other.id.clone())
            .collect();
        snapshot.child_nodes.insert(group.id.clone(), nodes);
        snapshot.child_groups.insert(group.id.clone(), children);
    }

    for group in &groups {
        let mut parent: Option<&Node> = None;
        for candidate in &groups {
            if candidate.id == group.id || !encloses(candidate, group) {
                continue;
            }
            parent = match parent {
                None => Some(candidate),
                Some(current) => Some(pick_tighter(current, candidate)),
            };
        }
        snapshot
            .parents
            .insert(group.id.clone(), parent.map(|p| p.id.clone()));
    }

    let mut depth = BTreeMap::new();
    for group in &groups {
        depth_of(&group.id, &snapshot.parents, &mut depth);
    }
    snapshot.depth = depth;

    log::debug!(
        "snapshot: {} groups, max depth {}",
        snapshot.group_count(),
        snapshot.depth.values().max().copied().unwrap_or(0)
    );
    snapshot
}

/// Smaller area wins. On equal area the larger id wins, since with the
/// identical-rectangle rule above it is the one nested deeper.
fn pick_tighter<'a>(current: &'a Node, candidate: &'a Node) -> &'a Node {
    let current_area = Rect::of(current).area();
    let candidate_area = Rect::of(candidate).area();
    if candidate_area < current_area
        || (candidate_area == current_area && candidate.id > current.id)
    {
        candidate
    } else {
        current
    }
}

fn depth_of(
    id: &str,
    parents: &BTreeMap<String, Option<String>>,
    memo: &mut BTreeMap<String, usize>,
) -> usize {
    if let Some(depth) = memo.get(id) {
        return *depth;
    }
    let depth = match parents.get(id).and_then(|p| p.as_deref()) {
        Some(parent) => depth_of(parent, parents, memo) + 1,
        None => 0,
    };
    memo.insert(id.to_string(), depth);
    depth
}
