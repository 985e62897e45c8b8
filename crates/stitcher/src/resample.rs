//! Anisotropic resampling from Mercator mosaic space to an equirectangular
//! band.
//!
//! Each output row corresponds to one latitude. Where the Mercator
//! projection compresses many mosaic rows into one output row, a Gaussian
//! window over those rows suppresses the moiré/banding that plain nearest
//! sampling produces; where the mapping is near 1:1 the row is sampled
//! directly. Output columns map 1:1 onto mosaic columns (longitude is
//! linear in Mercator x), so the whole row shares one sampling plan.

use mercator::{forward_continuous, vertical_stretch, GeoCell};
use rayon::prelude::*;
use tracing::debug;

use crate::mosaic::MosaicBuffer;
use crate::tile::TILE_SIZE;

/// Below this row stretch the Mercator compression is near 1:1 and
/// filtering adds nothing but cost.
const DIRECT_SAMPLE_THRESHOLD: f64 = 1.05;

/// Un-normalized Gaussian that falls to two standard deviations at
/// `center ± width`.
#[inline]
fn gaussian(center: f64, width: f64, x: f64) -> f64 {
    let t = 2.0 * (x - center) / width;
    (-t * t).exp()
}

/// Per-output-row sampling plan, shared by every column in the row.
enum RowPlan {
    /// Stretch near 1:1, take the nearest mosaic row.
    Direct(usize),
    /// Weighted window of mosaic rows. Rows outside the mosaic are already
    /// truncated away; dividing by `total_weight` renormalizes.
    Filtered {
        window: Vec<(usize, f64)>,
        total_weight: f64,
    },
}

fn row_plan(mosaic: &MosaicBuffer, cell: &GeoCell, height: usize, y: usize) -> RowPlan {
    let mosaic_rows = mosaic.pixel_rows();

    // Row 0 is the cell's north edge
    let lat = cell.south_lat() + (height - 1 - y) as f64 / height as f64;
    let (_, merc_y) = forward_continuous(lat, cell.west_lon(), cell.zoom());
    let y_c = TILE_SIZE as f64 * (merc_y - mosaic.low().y as f64);

    let y_idx = (y_c.round().max(0.0) as usize).min(mosaic_rows - 1);

    // Mosaic rows spanned by one output row at this latitude
    let deriv = vertical_stretch(lat.to_radians()) * mosaic_rows as f64 / height as f64;
    if deriv < DIRECT_SAMPLE_THRESHOLD {
        return RowPlan::Direct(y_idx);
    }

    let half_width = deriv.ceil() as i64;
    let mut window = Vec::with_capacity((2 * half_width - 1) as usize);
    let mut total_weight = 0.0;
    for offset in (1 - half_width)..half_width {
        let idx = y_idx as i64 + offset;
        if idx < 0 || idx >= mosaic_rows as i64 {
            continue;
        }
        let weight = gaussian(y_c, deriv, idx as f64);
        total_weight += weight;
        window.push((idx as usize, weight));
    }

    RowPlan::Filtered {
        window,
        total_weight,
    }
}

fn apply(plan: &RowPlan, mosaic: &MosaicBuffer, col: usize) -> [u8; 3] {
    match plan {
        RowPlan::Direct(row) => mosaic.get(col, *row),
        RowPlan::Filtered {
            window,
            total_weight,
        } => {
            let mut acc = [0.0f64; 3];
            for &(row, weight) in window {
                let px = mosaic.get(col, row);
                acc[0] += weight * px[0] as f64;
                acc[1] += weight * px[1] as f64;
                acc[2] += weight * px[2] as f64;
            }
            [
                (acc[0] / total_weight).round().clamp(0.0, 255.0) as u8,
                (acc[1] / total_weight).round().clamp(0.0, 255.0) as u8,
                (acc[2] / total_weight).round().clamp(0.0, 255.0) as u8,
            ]
        }
    }
}

/// Intermediate equirectangular raster covering the mosaic's full
/// longitude footprint. Column-major like the mosaic it came from.
pub struct ResampledBand {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl ResampledBand {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> [u8; 3] {
        let base = (col * self.height + row) * 3;
        [self.data[base], self.data[base + 1], self.data[base + 2]]
    }
}

/// Map a regular equirectangular grid back onto the mosaic, one output
/// column per mosaic pixel column.
///
/// Row plans are computed once and shared across columns; the column fill
/// fans out over disjoint strips of the output.
pub fn resample(mosaic: &MosaicBuffer, cell: &GeoCell, height: usize) -> ResampledBand {
    let width = mosaic.pixel_cols();
    let plans: Vec<RowPlan> = (0..height)
        .map(|y| row_plan(mosaic, cell, height, y))
        .collect();

    debug!(width, height, "resampling mosaic to equirectangular band");

    let mut data = vec![0u8; width * height * 3];
    data.par_chunks_mut(height * 3)
        .enumerate()
        .for_each(|(col, strip)| {
            for (y, plan) in plans.iter().enumerate() {
                let px = apply(plan, mosaic, col);
                strip[y * 3..y * 3 + 3].copy_from_slice(&px);
            }
        });

    ResampledBand {
        width,
        height,
        data,
    }
}
