//! Adapter around the external layered-layout engine.
//!
//! The engine only ever sees plain nodes. Groups are rebuilt afterwards from
//! the snapshot, so they never take part in ranking or ordering.

use std::collections::{BTreeMap, HashSet};
use std::panic::{self, AssertUnwindSafe};

use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};
use thiserror::Error;

use crate::config::OracleConfig;
use crate::ir::{Canvas, Direction};

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("layout engine panicked: {0}")]
    Panicked(String),
    #[error("layout engine returned malformed data for node '{id}': {reason}")]
    Malformed { id: String, reason: String },
    #[error("layout engine unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRouting {
    Orthogonal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OracleOptions {
    pub algorithm: &'static str,
    pub direction: Direction,
    pub writing_mode: &'static str,
    pub edge_routing: EdgeRouting,
    pub node_spacing: f32,
    pub layer_spacing: f32,
}

impl OracleOptions {
    pub fn new(direction: Direction, config: &OracleConfig) -> Self {
        Self {
            algorithm: "layered",
            direction,
            writing_mode: direction.writing_mode(),
            edge_routing: EdgeRouting::Orthogonal,
            node_spacing: config.node_spacing,
            layer_spacing: config.layer_spacing,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OracleNode {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OracleEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OracleGraph {
    pub nodes: Vec<OracleNode>,
    pub edges: Vec<OracleEdge>,
    pub options: OracleOptions,
}

/// Top-left position and size the engine chose for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

pub type Placements = BTreeMap<String, Placement>;

/// A layered graph layout engine.
///
/// Implementations may leave nodes out of the result; those nodes keep
/// their previous position.
pub trait LayoutOracle {
    fn layout(&self, graph: &OracleGraph) -> Result<Placements, OracleError>;
}

pub(crate) const CHAIN_EDGE_PREFIX: &str = "__chain_";

/// Builds the group-free graph handed to the engine.
pub fn build_oracle_graph(
    canvas: &Canvas,
    direction: Direction,
    config: &OracleConfig,
) -> OracleGraph {
    let nodes: Vec<OracleNode> = canvas
        .plain_nodes()
        .map(|node| OracleNode {
            id: node.id.clone(),
            width: node.width.max(config.min_node_size),
            height: node.height.max(config.min_node_size),
        })
        .collect();
    let ids: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();

    let mut edges: Vec<OracleEdge> = canvas
        .edges
        .iter()
        .filter(|edge| ids.contains(edge.from_node.as_str()))
        .filter(|edge| ids.contains(edge.to_node.as_str()))
        .map(|edge| OracleEdge {
            id: edge.id.clone(),
            source: edge.from_node.clone(),
            target: edge.to_node.clone(),
        })
        .collect();

    // Without any edges the engine scatters nodes; chain them in document
    // order so the result still reads in the requested direction.
    if edges.is_empty() && nodes.len() > 1 {
        for (idx, pair) in nodes.windows(2).enumerate() {
            edges.push(OracleEdge {
                id: format!("{CHAIN_EDGE_PREFIX}{idx}"),
                source: pair[0].id.clone(),
                target: pair[1].id.clone(),
            });
        }
        log::debug!("oracle: no usable edges, chained {} nodes", nodes.len());
    }

    OracleGraph {
        nodes,
        edges,
        options: OracleOptions::new(direction, config),
    }
}

/// Keeps only placements for nodes the graph asked about and rejects
/// non-finite geometry, so nothing an engine returns can reach the canvas
/// unchecked.
pub fn validate_placements(
    graph: &OracleGraph,
    placements: Placements,
) -> Result<Placements, OracleError> {
    let requested: HashSet<&str> = graph.nodes.iter().map(|node| node.id.as_str()).collect();
    let mut kept = Placements::new();
    for (id, placement) in placements {
        if !requested.contains(id.as_str()) {
            log::debug!("oracle: dropping placement for unknown node '{id}'");
            continue;
        }
        let Placement {
            x,
            y,
            width,
            height,
        } = placement;
        if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
            return Err(OracleError::Malformed {
                id,
                reason: format!("non-finite geometry ({x}, {y}, {width}, {height})"),
            });
        }
        kept.insert(id, placement);
    }
    Ok(kept)
}

/// Translates all placements so the smallest x and y land on `origin`.
pub fn rebase_placements(placements: &mut Placements, origin: f64) {
    let Some(min_x) = placements.values().map(|p| p.x).reduce(f64::min) else {
        return;
    };
    let min_y = placements
        .values()
        .map(|p| p.y)
        .reduce(f64::min)
        .unwrap_or(min_x);
    let dx = origin - min_x;
    let dy = origin - min_y;
    if dx == 0.0 && dy == 0.0 {
        return;
    }
    for placement in placements.values_mut() {
        placement.x += dx;
        placement.y += dy;
    }
}

/// Writes rounded positions onto plain nodes. Returns the ids that had no
/// placement; those nodes are left as they were.
pub fn apply_placements(canvas: &mut Canvas, placements: &Placements) -> Vec<String> {
    let mut missing = Vec::new();
    for node in canvas.nodes.iter_mut().filter(|node| !node.is_group()) {
        match placements.get(&node.id) {
            Some(placement) => {
                node.x = placement.x.round();
                node.y = placement.y.round();
            }
            None => missing.push(node.id.clone()),
        }
    }
    if !missing.is_empty() {
        log::warn!(
            "oracle: no position for {} node(s), left in place: {}",
            missing.len(),
            missing.join(", ")
        );
    }
    missing
}

/// The bundled engine, backed by dagre.
///
/// Dagre has no writing-mode or edge-routing switches; direction and the two
/// spacing constants are the options it honours.
#[derive(Debug, Clone, Copy, Default)]
pub struct DagreOracle;

impl LayoutOracle for DagreOracle {
    fn layout(&self, graph: &OracleGraph) -> Result<Placements, OracleError> {
        match panic::catch_unwind(AssertUnwindSafe(|| run_dagre(graph))) {
            Ok(placements) => Ok(placements),
            Err(payload) => Err(OracleError::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

fn run_dagre(graph: &OracleGraph) -> Placements {
    let mut placements = Placements::new();
    if graph.nodes.is_empty() {
        return placements;
    }

    let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
        DagreGraph::new(Some(GraphOption {
            directed: Some(true),
            multigraph: Some(false),
            compound: Some(false),
        }));

    let mut graph_config = DagreConfig::default();
    graph_config.rankdir = Some(dagre_rankdir(graph.options.direction).to_string());
    graph_config.nodesep = Some(graph.options.node_spacing);
    graph_config.ranksep = Some(graph.options.layer_spacing);
    graph_config.marginx = Some(0.0);
    graph_config.marginy = Some(0.0);
    dagre_graph.set_graph(graph_config);

    for oracle_node in &graph.nodes {
        let mut node = DagreNode::default();
        node.width = oracle_node.width as f32;
        node.height = oracle_node.height as f32;
        dagre_graph.set_node(oracle_node.id.clone(), Some(node));
    }

    let mut edge_set: HashSet<(String, String)> = HashSet::new();
    for edge in &graph.edges {
        let from = edge.source.clone();
        let to = edge.target.clone();
        if !edge_set.insert((from.clone(), to.clone())) {
            continue;
        }
        let edge_label = DagreEdge::default();
        let _ = dagre_graph.set_edge(&from, &to, Some(edge_label), None);
    }

    dagre_layout::run_layout(&mut dagre_graph);

    for oracle_node in &graph.nodes {
        let Some(dagre_node) = dagre_graph.node(&oracle_node.id) else {
            continue;
        };
        let width = f64::from(dagre_node.width);
        let height = f64::from(dagre_node.height);
        let x = f64::from(dagre_node.x) - width / 2.0;
        let y = f64::from(dagre_node.y) - height / 2.0;
        placements.insert(
            oracle_node.id.clone(),
            Placement {
                x,
                y,
                width,
                height,
            },
        );
    }

    placements
}

fn dagre_rankdir(direction: Direction) -> &'static str {
    match direction {
        Direction::Down => "tb",
        Direction::Up => "bt",
        Direction::Right => "lr",
        Direction::Left => "rl",
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
