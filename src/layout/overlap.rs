use std::collections::BTreeMap;

use crate::config::OverlapConfig;
use crate::ir::{Axis, Canvas};

use super::types::{ComponentMap, Rect};

#[derive(Debug, Clone)]
struct GroupRect {
    id: String,
    rect: Rect,
}

/// Pushes overlapping groups of the same component apart along `axis`.
///
/// Each pass sorts the component's groups by leading edge and moves every
/// group that overlaps its predecessor (within `gap`) just past it. Only
/// forward moves are made and the pass count is capped, so some overlap
/// can remain. Returns the number of shifts applied.
pub fn resolve_group_overlaps(
    canvas: &mut Canvas,
    components: &ComponentMap,
    axis: Axis,
    config: &OverlapConfig,
) -> usize {
    let mut buckets: BTreeMap<usize, Vec<GroupRect>> = BTreeMap::new();
    for group in canvas.groups() {
        let Some(&component) = components.get(&group.id) else {
            continue;
        };
        buckets.entry(component).or_default().push(GroupRect {
            id: group.id.clone(),
            rect: Rect::of(group),
        });
    }
    if buckets.is_empty() {
        return 0;
    }

    let mut shifts = 0;
    for rects in buckets.values_mut() {
        for _ in 0..config.iterations {
            rects.sort_by(|a, b| a.rect.leading(axis).total_cmp(&b.rect.leading(axis)));
            for i in 1..rects.len() {
                let prev = rects[i - 1].rect;
                let cur = &mut rects[i].rect;
                if !prev.overlaps(cur, config.gap) {
                    continue;
                }
                let shift = prev.trailing(axis) + config.gap - cur.leading(axis);
                cur.translate(axis, shift);
                shifts += 1;
                log::trace!("overlap: moved '{}' by {shift} along {axis:?}", rects[i].id);
            }
        }
    }

    let moved: BTreeMap<&str, Rect> = buckets
        .values()
        .flatten()
        .map(|group| (group.id.as_str(), group.rect))
        .collect();
    for node in canvas.nodes.iter_mut().filter(|node| node.is_group()) {
        let Some(rect) = moved.get(node.id.as_str()) else {
            continue;
        };
        node.x = rect.x.round();
        node.y = rect.y.round();
        node.width = rect.width.round();
        node.height = rect.height.round();
    }

    log::debug!("overlap: {shifts} shift(s) along {axis:?}");
    shifts
}
