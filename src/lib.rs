#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config, parse_config};
pub use error::Error;
pub use ir::{Canvas, Direction, Edge, Node, NodeKind, Side};
pub use layout::{
    DagreOracle, LayoutError, LayoutOracle, LayoutReport, layout_canvas, layout_down, layout_right,
};
pub use parser::{parse_canvas, serialize_canvas};

/// Parses a canvas, lays it out with the bundled oracle and serializes it
/// again. Unknown attributes pass through untouched.
pub fn layout_json(
    input: &str,
    direction: Direction,
    config: &LayoutConfig,
) -> Result<String, Error> {
    let mut canvas = parse_canvas(input)?;
    layout_canvas(&mut canvas, direction, config, &DagreOracle)?;
    Ok(serialize_canvas(&canvas)?)
}
