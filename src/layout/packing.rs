use std::collections::BTreeMap;

use crate::config::PackingConfig;
use crate::ir::{Axis, Canvas};

use super::types::{Bounds, ComponentMap, Rect};

/// Lines components up along `axis` so that consecutive bounding boxes are
/// exactly `gap` apart. The first component stays where it is; every member
/// of a later component moves by the same offset. Returns the component
/// count.
pub fn pack_components(
    canvas: &mut Canvas,
    components: &ComponentMap,
    axis: Axis,
    config: &PackingConfig,
) -> usize {
    let mut extents: BTreeMap<usize, Bounds> = BTreeMap::new();
    for node in &canvas.nodes {
        let Some(&component) = components.get(&node.id) else {
            continue;
        };
        let rect = Rect::of(node);
        extents
            .entry(component)
            .and_modify(|bounds| bounds.include(&rect))
            .or_insert_with(|| Bounds::from_rect(&rect));
    }

    let mut ordered: Vec<(usize, Rect)> = extents
        .into_iter()
        .map(|(component, bounds)| (component, bounds.to_rect()))
        .collect();
    ordered.sort_by(|a, b| a.1.leading(axis).total_cmp(&b.1.leading(axis)));
    if ordered.len() <= 1 {
        return ordered.len();
    }

    let mut offsets: BTreeMap<usize, f64> = BTreeMap::new();
    let mut cursor = ordered[0].1.trailing(axis);
    for (component, rect) in ordered.iter().skip(1) {
        let target = cursor + config.gap;
        offsets.insert(*component, target - rect.leading(axis));
        cursor = target + (rect.trailing(axis) - rect.leading(axis));
    }

    for node in canvas.nodes.iter_mut() {
        let Some(delta) = components
            .get(&node.id)
            .and_then(|component| offsets.get(component))
        else {
            continue;
        };
        match axis {
            Axis::X => node.x += delta,
            Axis::Y => node.y += delta,
        }
    }

    log::debug!("packing: chained {} components along {axis:?}", ordered.len());
    ordered.len()
}
