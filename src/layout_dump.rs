use crate::ir::{Canvas, Direction};
use crate::layout::LayoutReport;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub direction: Direction,
    pub placed: usize,
    pub missing: Vec<String>,
    pub overlap_shifts: usize,
    pub component_count: usize,
    pub nodes: Vec<NodeDump>,
    pub groups: Vec<GroupDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub group: bool,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub component: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct GroupDump {
    pub id: String,
    pub depth: usize,
    pub parent: Option<String>,
    pub nodes: Vec<String>,
    pub groups: Vec<String>,
}

impl LayoutDump {
    pub fn from_report(canvas: &Canvas, report: &LayoutReport, direction: Direction) -> Self {
        let nodes = canvas
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                group: node.is_group(),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                component: report.components.get(&node.id).copied(),
            })
            .collect();

        let snapshot = &report.snapshot;
        let groups = snapshot
            .depth
            .iter()
            .map(|(id, depth)| GroupDump {
                id: id.clone(),
                depth: *depth,
                parent: snapshot.parents.get(id).cloned().flatten(),
                nodes: snapshot.child_nodes.get(id).cloned().unwrap_or_default(),
                groups: snapshot.child_groups.get(id).cloned().unwrap_or_default(),
            })
            .collect();

        LayoutDump {
            direction,
            placed: report.placed,
            missing: report.missing.clone(),
            overlap_shifts: report.overlap_shifts,
            component_count: report.component_count,
            nodes,
            groups,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    canvas: &Canvas,
    report: &LayoutReport,
    direction: Direction,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_report(canvas, report, direction);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
