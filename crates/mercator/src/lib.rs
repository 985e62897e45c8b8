//! Web Mercator ↔ WGS84 projection math.
//!
//! Implements the coordinate conversions used by slippy-map tile pyramids:
//! - Forward projection of lat/lon degrees to tile indices and continuous
//!   tile-space coordinates
//! - The exact algebraic inverse back to lat/lon
//! - The local vertical stretch factor that drives anti-aliasing filter
//!   widths downstream
//!
//! All operations are pure; nothing here touches I/O.

pub mod cell;
pub mod web_mercator;

pub use cell::{CellError, GeoCell};
pub use web_mercator::{
    forward_continuous, forward_tile, inverse, vertical_stretch, TileIndex, MAX_LATITUDE_DEG,
};
