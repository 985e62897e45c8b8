//! Stitches one 1°×1° latitude/longitude cell from cached Web-Mercator
//! tiles into a flat, geographically-accurate raster image.
//!
//! Pipeline stages:
//! - Tile loading with white-placeholder fallback for gaps in the cache
//! - Mosaic assembly into one contiguous, column-major raster
//! - Anisotropic resampling that undoes the Mercator vertical stretch
//! - Crop to the exact 1° longitude band and aspect-corrected resize

pub mod error;
pub mod mosaic;
pub mod resample;
pub mod stitch;
pub mod tile;

pub use error::{Result, StitchError};
pub use stitch::{stitch, stitch_to_file, StitchRequest};
