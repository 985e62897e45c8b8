//! Mosaic assembly from a rectangular block of tiles.
//!
//! The mosaic is one contiguous raster covering the cell's tile bounding
//! box. It is stored column-major, with the tile-row (latitude) axis
//! contiguous, because the resampler scans many consecutive mosaic rows
//! for each fixed output column.

use std::path::Path;

use mercator::{GeoCell, TileIndex};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{Result, StitchError};
use crate::tile::{load_tile, tile_path, TileLoad, TileRaster, TILE_SIZE};

/// Upper bound on mosaic pixel storage. A bounding box that blows past this
/// is a precondition violation, not something to swap over.
const MAX_MOSAIC_BYTES: u64 = 2 << 30;

/// A contiguous RGB raster of `(cols·256) × (rows·256)` pixels assembled
/// from adjacent tiles.
#[derive(Debug)]
pub struct MosaicBuffer {
    low: TileIndex,
    rows: usize,
    cols: usize,
    /// Column-major: pixel (col, row) lives at `(col · rows · 256 + row) · 3`.
    data: Vec<u8>,
}

impl MosaicBuffer {
    /// Load every tile in the cell's bounding box and copy it into place.
    ///
    /// Tile loads fan out over disjoint 256-column strips, so the fill
    /// needs no synchronization. Missing tiles become white placeholders;
    /// a malformed tile aborts the build.
    pub fn build(cache_root: &Path, ext: &str, cell: &GeoCell) -> Result<Self> {
        let (low, high) = cell.tile_bounds();
        let rows = (high.y - low.y + 1) as usize;
        let cols = (high.x - low.x + 1) as usize;

        let bytes = rows as u64 * cols as u64 * (TILE_SIZE * TILE_SIZE * 3) as u64;
        if bytes > MAX_MOSAIC_BYTES {
            return Err(StitchError::MosaicTooLarge { rows, cols, bytes });
        }

        debug!(
            zoom = cell.zoom(),
            min_x = low.x,
            min_y = low.y,
            rows,
            cols,
            "assembling mosaic"
        );

        let pixel_rows = rows * TILE_SIZE;
        let strip_len = TILE_SIZE * pixel_rows * 3;
        let mut data = vec![0u8; cols * strip_len];

        let missing: usize = data
            .par_chunks_mut(strip_len)
            .enumerate()
            .map(|(col, strip)| -> Result<usize> {
                let mut missing = 0;
                for row in 0..rows {
                    let path = tile_path(
                        cache_root,
                        cell.zoom(),
                        low.x + col as u32,
                        low.y + row as u32,
                        ext,
                    );
                    let tile = match load_tile(&path)? {
                        TileLoad::Loaded(tile) => tile,
                        TileLoad::Missing => {
                            missing += 1;
                            TileRaster::placeholder()
                        }
                    };
                    copy_tile(strip, pixel_rows, row * TILE_SIZE, &tile);
                }
                Ok(missing)
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .sum();

        if missing > 0 {
            warn!(missing, total = rows * cols, "substituted placeholder tiles");
        }

        Ok(Self {
            low,
            rows,
            cols,
            data,
        })
    }

    /// North-west corner of the tile bounding box.
    pub fn low(&self) -> TileIndex {
        self.low
    }

    /// Mosaic height in pixels.
    pub fn pixel_rows(&self) -> usize {
        self.rows * TILE_SIZE
    }

    /// Mosaic width in pixels.
    pub fn pixel_cols(&self) -> usize {
        self.cols * TILE_SIZE
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> [u8; 3] {
        let base = (col * self.rows * TILE_SIZE + row) * 3;
        [self.data[base], self.data[base + 1], self.data[base + 2]]
    }

    /// Assemble a mosaic directly from pixel storage, bypassing tile I/O.
    #[cfg(test)]
    pub(crate) fn from_raw(low: TileIndex, rows: usize, cols: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), rows * cols * TILE_SIZE * TILE_SIZE * 3);
        Self {
            low,
            rows,
            cols,
            data,
        }
    }
}

/// Copy one row-major tile into its column-major strip position.
fn copy_tile(strip: &mut [u8], pixel_rows: usize, row_offset: usize, tile: &TileRaster) {
    for x in 0..TILE_SIZE {
        let col_base = (x * pixel_rows + row_offset) * 3;
        for y in 0..TILE_SIZE {
            let px = tile.pixel(x, y);
            let dst = col_base + y * 3;
            strip[dst..dst + 3].copy_from_slice(&px);
        }
    }
}
