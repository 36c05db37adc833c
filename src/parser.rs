use crate::ir::Canvas;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid canvas document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid canvas document: {0}")]
    Json5(#[from] json5::Error),
}

/// Parses a canvas document. Strict JSON is tried first; JSON5 is accepted
/// as a fallback so hand-edited files with comments or trailing commas load.
pub fn parse_canvas(input: &str) -> Result<Canvas, ParseError> {
    match serde_json::from_str::<Canvas>(input) {
        Ok(canvas) => Ok(canvas),
        Err(json_err) => match json5::from_str::<Canvas>(input) {
            Ok(canvas) => Ok(canvas),
            Err(_) => Err(ParseError::Json(json_err)),
        },
    }
}

pub fn serialize_canvas(canvas: &Canvas) -> Result<String, ParseError> {
    let mut out = serde_json::to_string_pretty(canvas)?;
    out.push('\n');
    Ok(out)
}
