use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Direction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "right" | "RIGHT" | "LR" | "lr" => Some(Self::Right),
            "down" | "DOWN" | "TB" | "TD" | "tb" => Some(Self::Down),
            "left" | "LEFT" | "RL" | "rl" => Some(Self::Left),
            "up" | "UP" | "BT" | "bt" => Some(Self::Up),
            _ => None,
        }
    }

    pub fn writing_mode(self) -> &'static str {
        match self {
            Self::Right => "LR",
            Self::Down => "TB",
            Self::Left => "RL",
            Self::Up => "BT",
        }
    }

    /// Axis that overlap resolution and component packing sweep along.
    /// Only rightward and downward layouts are packed.
    pub fn primary_axis(self) -> Option<Axis> {
        match self {
            Self::Right => Some(Axis::X),
            Self::Down => Some(Axis::Y),
            Self::Left | Self::Up => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Text,
    File,
    Link,
    Group,
    Other(String),
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "text" => Self::Text,
            "file" => Self::File,
            "link" => Self::Link,
            "group" => Self::Group,
            _ => Self::Other(value),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Text => "text".to_string(),
            NodeKind::File => "file".to_string(),
            NodeKind::Link => "link".to_string(),
            NodeKind::Group => "group".to_string(),
            NodeKind::Other(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    #[serde(serialize_with = "serialize_coord")]
    pub x: f64,
    #[serde(serialize_with = "serialize_coord")]
    pub y: f64,
    #[serde(serialize_with = "serialize_coord")]
    pub width: f64,
    #[serde(serialize_with = "serialize_coord")]
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn new(id: &str, kind: NodeKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.to_string(),
            kind: Some(kind),
            x,
            y,
            width,
            height,
            label: None,
            color: None,
            extra: Map::new(),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, Some(NodeKind::Group))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    pub fn new(id: &str, from: &str, to: &str) -> Self {
        Self {
            id: id.to_string(),
            from_node: from.to_string(),
            to_node: to.to_string(),
            from_side: None,
            to_side: None,
            label: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of every node in `nodes`, keyed by id. Later duplicates win.
    pub fn node_index(&self) -> HashMap<String, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id.clone(), idx))
            .collect()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_group())
    }

    pub fn plain_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| !node.is_group())
    }

    pub fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }
}

/// Whole coordinates are written as JSON integers, the way canvas files store them.
fn serialize_coord<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
