use crate::ir::Direction;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Spacing between nodes within one layer.
    pub node_spacing: f32,
    /// Spacing between consecutive layers.
    pub layer_spacing: f32,
    /// Floor applied to node width/height before layout.
    pub min_node_size: f64,
    /// Where the top-left of the laid-out nodes lands.
    pub origin: f64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            node_spacing: 105.0,
            layer_spacing: 140.0,
            min_node_size: 10.0,
            origin: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub padding: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            padding: 200.0,
            min_width: 120.0,
            min_height: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapConfig {
    pub gap: f64,
    pub iterations: usize,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            gap: 24.0,
            iterations: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingConfig {
    pub gap: f64,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self { gap: 180.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub oracle: OracleConfig,
    pub groups: GroupConfig,
    pub overlap: OverlapConfig,
    pub packing: PackingConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub direction: Direction,
    pub layout: LayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            direction: Direction::Right,
            layout: LayoutConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    direction: Option<String>,
    node_spacing: Option<f32>,
    layer_spacing: Option<f32>,
    min_node_size: Option<f64>,
    origin: Option<f64>,
    group_padding: Option<f64>,
    group_min_width: Option<f64>,
    group_min_height: Option<f64>,
    overlap_gap: Option<f64>,
    overlap_iterations: Option<usize>,
    pack_gap: Option<f64>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a JSON/JSON5 config; every field is an optional override.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(token) = parsed.direction.as_deref() {
        config.direction = Direction::from_token(token)
            .ok_or_else(|| anyhow::anyhow!("unknown direction '{token}' in config"))?;
    }

    let layout = &mut config.layout;
    if let Some(v) = parsed.node_spacing {
        layout.oracle.node_spacing = v;
    }
    if let Some(v) = parsed.layer_spacing {
        layout.oracle.layer_spacing = v;
    }
    if let Some(v) = parsed.min_node_size {
        layout.oracle.min_node_size = v.max(0.0);
    }
    if let Some(v) = parsed.origin {
        layout.oracle.origin = v;
    }
    if let Some(v) = parsed.group_padding {
        layout.groups.padding = v;
    }
    if let Some(v) = parsed.group_min_width {
        layout.groups.min_width = v;
    }
    if let Some(v) = parsed.group_min_height {
        layout.groups.min_height = v;
    }
    if let Some(v) = parsed.overlap_gap {
        layout.overlap.gap = v;
    }
    if let Some(v) = parsed.overlap_iterations {
        layout.overlap.iterations = v;
    }
    if let Some(v) = parsed.pack_gap {
        layout.packing.gap = v;
    }

    Ok(config)
}
