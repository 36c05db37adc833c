//! Edge attachment sides.

use std::collections::HashSet;

use crate::ir::{Canvas, Direction, Side};

/// (source side, target side) for a layout direction.
pub fn edge_sides(direction: Direction) -> (Side, Side) {
    match direction {
        Direction::Right => (Side::Right, Side::Left),
        Direction::Down => (Side::Bottom, Side::Top),
        Direction::Left => (Side::Left, Side::Right),
        Direction::Up => (Side::Top, Side::Bottom),
    }
}

/// Points every edge between existing nodes along `direction`.
/// Returns the number of edges updated.
pub fn set_edge_anchors(canvas: &mut Canvas, direction: Direction) -> usize {
    let (from_side, to_side) = edge_sides(direction);
    let ids: HashSet<&str> = canvas.nodes.iter().map(|node| node.id.as_str()).collect();
    let mut updated = 0;
    for edge in canvas.edges.iter_mut() {
        if !ids.contains(edge.from_node.as_str()) || !ids.contains(edge.to_node.as_str()) {
            continue;
        }
        edge.from_side = Some(from_side);
        edge.to_side = Some(to_side);
        updated += 1;
    }
    updated
}
