//! Layout pipeline for a canvas.
//!
//! Stages run in a fixed order, each with exclusive access to the canvas:
//! snapshot groups, place plain nodes with the oracle, refit groups, find
//! components, separate groups, pack components, set edge sides. Only the
//! oracle call can fail, and it runs before anything is written.

pub mod anchors;
pub mod components;
pub mod error;
pub mod groups;
pub mod oracle;
pub mod overlap;
pub mod packing;
pub mod snapshot;
pub mod types;

pub use anchors::{edge_sides, set_edge_anchors};
pub use components::{UnionFind, compute_components};
pub use error::LayoutError;
pub use groups::{resize_groups_from_snapshot, resize_groups_in_order};
pub use oracle::{
    DagreOracle, EdgeRouting, LayoutOracle, OracleEdge, OracleError, OracleGraph, OracleNode,
    OracleOptions, Placement, Placements, apply_placements, build_oracle_graph, rebase_placements,
    validate_placements,
};
pub use overlap::resolve_group_overlaps;
pub use packing::pack_components;
pub use snapshot::snapshot_groups;
pub use types::{Bounds, ComponentMap, GroupSnapshot, Rect};

use crate::config::LayoutConfig;
use crate::ir::{Canvas, Direction};

/// What a successful run did, for logging and layout dumps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutReport {
    pub snapshot: GroupSnapshot,
    /// Empty when the direction skips packing.
    pub components: ComponentMap,
    pub placed: usize,
    /// Plain nodes the oracle returned no position for.
    pub missing: Vec<String>,
    pub groups_resized: usize,
    pub overlap_shifts: usize,
    pub component_count: usize,
}

pub fn layout_canvas(
    canvas: &mut Canvas,
    direction: Direction,
    config: &LayoutConfig,
    oracle: &dyn LayoutOracle,
) -> Result<LayoutReport, LayoutError> {
    if canvas.nodes.is_empty() {
        return Err(LayoutError::EmptyDocument);
    }

    let snapshot = snapshot_groups(canvas);

    let graph = build_oracle_graph(canvas, direction, &config.oracle);
    let mut placements = if graph.nodes.is_empty() {
        log::debug!("layout: no plain nodes, skipping oracle");
        Placements::new()
    } else {
        validate_placements(&graph, oracle.layout(&graph)?)?
    };
    rebase_placements(&mut placements, config.oracle.origin);
    let missing = apply_placements(canvas, &placements);

    let mut report = LayoutReport {
        placed: graph.nodes.len() - missing.len(),
        missing,
        ..LayoutReport::default()
    };

    report.groups_resized = resize_groups_from_snapshot(canvas, &snapshot, &config.groups);

    match direction.primary_axis() {
        Some(axis) => {
            let components = compute_components(canvas);
            report.overlap_shifts =
                resolve_group_overlaps(canvas, &components, axis, &config.overlap);
            report.component_count =
                pack_components(canvas, &components, axis, &config.packing);
            report.components = components;
        }
        None => {
            log::debug!("layout: {direction:?} is not packed, skipping overlap and packing");
        }
    }

    set_edge_anchors(canvas, direction);
    report.snapshot = snapshot;

    log::info!(
        "layout: {} placed, {} groups refitted, {} components, direction {direction:?}",
        report.placed,
        report.groups_resized,
        report.component_count
    );
    Ok(report)
}

/// Rightward layout with the bundled oracle.
pub fn layout_right(
    canvas: &mut Canvas,
    config: &LayoutConfig,
) -> Result<LayoutReport, LayoutError> {
    layout_canvas(canvas, Direction::Right, config, &DagreOracle)
}

/// Downward layout with the bundled oracle.
pub fn layout_down(
    canvas: &mut Canvas,
    config: &LayoutConfig,
) -> Result<LayoutReport, LayoutError> {
    layout_canvas(canvas, Direction::Down, config, &DagreOracle)
}
