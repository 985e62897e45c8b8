//! Error types for cell stitching.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while stitching a cell.
///
/// Missing or undecodable tiles are not errors; they degrade to white
/// placeholders. Everything here is fatal: it indicates malformed upstream
/// data, an invariant violation, or an unsatisfiable request, and aborts
/// the run before any output is written.
#[derive(Debug, Error)]
pub enum StitchError {
    /// Invalid cell coordinates or zoom level.
    #[error(transparent)]
    Cell(#[from] mercator::CellError),

    /// A tile decoded successfully but with the wrong spatial dimensions;
    /// the tile pyramid itself is malformed.
    #[error("tile {path} decoded to {width}x{height}, expected 256x256")]
    MalformedTile {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    /// The requested longitude band is not contained in the fetched tile
    /// footprint. The footprint derives from the same cell, so this means
    /// the bounding-box computation is broken.
    #[error(
        "requested longitude band {lon_west}..{lon_east} outside fetched \
         footprint {footprint_low}..{footprint_high}"
    )]
    FootprintMismatch {
        lon_west: f64,
        lon_east: f64,
        footprint_low: f64,
        footprint_high: f64,
    },

    /// The tile bounding box would need more pixel storage than the mosaic
    /// budget allows.
    #[error("mosaic of {cols}x{rows} tiles needs {bytes} bytes of pixel storage, over the 2 GiB budget")]
    MosaicTooLarge {
        rows: usize,
        cols: usize,
        bytes: u64,
    },

    /// Requested output raster has no pixels.
    #[error("output size must be at least 1 pixel")]
    InvalidOutputSize,

    /// Failed to encode or write the output raster.
    #[error("failed to write output image: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for stitching operations.
pub type Result<T> = std::result::Result<T, StitchError>;
