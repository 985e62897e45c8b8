//! Tile loading and the 256×256 tile raster.

use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::debug;

use crate::error::{Result, StitchError};

/// Edge length of a pyramid tile in pixels.
pub const TILE_SIZE: usize = 256;

/// A decoded 256×256 RGB tile.
///
/// Gray source images are promoted to three channels by replication during
/// decode, so after construction the raster is always exactly 256×256×3.
#[derive(Debug, Clone)]
pub struct TileRaster(RgbImage);

impl TileRaster {
    /// All-white stand-in for a missing tile, matching the blank tiles
    /// upstream tile services return for out-of-coverage areas.
    pub fn placeholder() -> Self {
        Self(RgbImage::from_pixel(
            TILE_SIZE as u32,
            TILE_SIZE as u32,
            image::Rgb([255, 255, 255]),
        ))
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.0.get_pixel(x as u32, y as u32).0
    }
}

/// Outcome of a tile load attempt.
///
/// A missing or undecodable file is recoverable and surfaces as `Missing`
/// instead of an error, keeping the fallback path type-visible and testable
/// without real I/O failures.
#[derive(Debug)]
pub enum TileLoad {
    Loaded(TileRaster),
    Missing,
}

/// Source path for a tile: `{root}/Z{zoom}-{x}-{y}.{ext}`.
pub fn tile_path(root: &Path, zoom: u32, x: u32, y: u32, ext: &str) -> PathBuf {
    root.join(format!("Z{zoom}-{x}-{y}.{ext}"))
}

/// Load one tile from disk.
///
/// Returns `Missing` when the file cannot be read or decoded. Fails only
/// when a tile decodes to the wrong spatial dimensions, which means the
/// tile pyramid itself is malformed and the run cannot continue.
pub fn load_tile(path: &Path) -> Result<TileLoad> {
    let decoded = match image::open(path) {
        Ok(img) => img,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "tile unavailable, using placeholder");
            return Ok(TileLoad::Missing);
        }
    };

    let rgb = decoded.to_rgb8();
    if rgb.width() as usize != TILE_SIZE || rgb.height() as usize != TILE_SIZE {
        return Err(StitchError::MalformedTile {
            path: path.to_path_buf(),
            width: rgb.width(),
            height: rgb.height(),
        });
    }

    Ok(TileLoad::Loaded(TileRaster(rgb)))
}
