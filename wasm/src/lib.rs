use canvas_rs_layout::{Direction, LayoutConfig, layout_json};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CanvasLayoutOptions {
    group_padding: Option<f64>,
    pack_gap: Option<f64>,
    overlap_gap: Option<f64>,
    overlap_iterations: Option<usize>,
    node_spacing: Option<f32>,
    layer_spacing: Option<f32>,
}

fn build_layout_config(options: CanvasLayoutOptions) -> LayoutConfig {
    let mut config = LayoutConfig::default();
    if let Some(v) = options.group_padding {
        config.groups.padding = v;
    }
    if let Some(v) = options.pack_gap {
        config.packing.gap = v;
    }
    if let Some(v) = options.overlap_gap {
        config.overlap.gap = v;
    }
    if let Some(v) = options.overlap_iterations {
        config.overlap.iterations = v;
    }
    if let Some(v) = options.node_spacing {
        config.oracle.node_spacing = v;
    }
    if let Some(v) = options.layer_spacing {
        config.oracle.layer_spacing = v;
    }
    config
}

/// Lays out a canvas document and returns the updated JSON.
#[wasm_bindgen]
pub fn layout_canvas_json(
    canvas_json: &str,
    direction: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let direction = Direction::from_token(direction)
        .ok_or_else(|| JsValue::from_str(&format!("unknown direction '{direction}'")))?;
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<CanvasLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        CanvasLayoutOptions::default()
    };

    let config = build_layout_config(options);
    layout_json(canvas_json, direction, &config)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
