use thiserror::Error;

use super::oracle::OracleError;

/// Reasons a layout run is aborted. The canvas is unchanged when either is
/// returned.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("canvas is empty")]
    EmptyDocument,
    #[error(transparent)]
    Oracle(#[from] OracleError),
}
