//! Receipt Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ReceiptError>;

/// Receipt rendering and delivery errors
#[derive(Error, Debug)]
pub enum ReceiptError {
    /// The composed SVG did not parse
    #[error("SVG error: {0}")]
    Svg(String),

    /// Rasterization failed
    #[error("Rasterization error: {0}")]
    Raster(String),

    /// A rasterization is already running for this receipt
    #[error("A rasterization is already in flight")]
    RasterInFlight,

    /// Share or download requested before the raster form exists
    #[error("No raster image available yet")]
    RasterNotReady,

    /// Platform share handed the file back
    #[error("Share failed: {0}")]
    Share(String),

    /// Filesystem fallback failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
