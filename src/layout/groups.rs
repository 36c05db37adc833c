use crate::config::GroupConfig;
use crate::ir::Canvas;

use super::types::{Bounds, GroupSnapshot, Rect};

/// Refits every group around its snapshotted members, deepest groups first,
/// so a parent always sees its child groups' refitted rectangles.
/// Returns how many groups were resized.
pub fn resize_groups_from_snapshot(
    canvas: &mut Canvas,
    snapshot: &GroupSnapshot,
    config: &GroupConfig,
) -> usize {
    let order: Vec<String> = canvas.groups().map(|group| group.id.clone()).collect();
    let order = snapshot.deepest_first(&order);
    resize_groups_in_order(canvas, snapshot, &order, config)
}

/// Refits groups in exactly the given order.
pub fn resize_groups_in_order(
    canvas: &mut Canvas,
    snapshot: &GroupSnapshot,
    order: &[String],
    config: &GroupConfig,
) -> usize {
    let index = canvas.node_index();
    let mut resized = 0;

    for group_id in order {
        let Some(&group_idx) = index.get(group_id) else {
            continue;
        };
        let members = snapshot
            .child_nodes
            .get(group_id)
            .into_iter()
            .flatten()
            .chain(snapshot.child_groups.get(group_id).into_iter().flatten());
        let rects: Vec<Rect> = members
            .filter_map(|id| index.get(id))
            .map(|&idx| Rect::of(&canvas.nodes[idx]))
            .collect();
        let Some(bounds) = Bounds::enclosing(rects.iter()) else {
            continue;
        };

        let min_x = bounds.min_x - config.padding;
        let min_y = bounds.min_y - config.padding;
        let max_x = bounds.max_x + config.padding;
        let max_y = bounds.max_y + config.padding;

        let group = &mut canvas.nodes[group_idx];
        group.x = min_x.round();
        group.y = min_y.round();
        group.width = (max_x - min_x).round().max(config.min_width);
        group.height = (max_y - min_y).round().max(config.min_height);
        resized += 1;
    }

    log::debug!("groups: refitted {resized} of {} groups", order.len());
    resized
}
