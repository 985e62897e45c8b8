//! End-to-end cell stitching: bounding box, mosaic, resample, crop, resize.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbImage;
use mercator::{inverse, GeoCell};
use tracing::{debug, info};

use crate::error::{Result, StitchError};
use crate::mosaic::MosaicBuffer;
use crate::resample::{resample, ResampledBand};

/// Tolerance for the footprint containment check. The footprint is derived
/// from the same projection as the cell bounds, so anything beyond
/// floating-point noise is an upstream bug.
const FOOTPRINT_EPSILON: f64 = 1e-9;

/// Parameters for one stitch run.
#[derive(Debug, Clone)]
pub struct StitchRequest {
    pub cell: GeoCell,
    /// Directory holding cached tiles named `Z{zoom}-{x}-{y}.{ext}`.
    pub cache_root: PathBuf,
    /// Tile file extension, e.g. `jpg`.
    pub tile_ext: String,
    /// Output raster height in pixels; the width follows from the aspect
    /// correction.
    pub output_size: u32,
}

/// Tile-aligned longitude range covered by the mosaic. Slightly wider than
/// the cell itself, since tiles rarely align with whole degrees.
#[derive(Debug, Clone, Copy)]
struct LonFootprint {
    low: f64,
    high: f64,
}

fn lon_footprint(cell: &GeoCell) -> LonFootprint {
    let (low, high) = cell.tile_bounds();
    let cols = (high.x - low.x + 1) as f64;
    let (_, lon_low) = inverse(low.x as f64, 0.0, cell.zoom());
    let (_, lon_high) = inverse(low.x as f64 + cols, 0.0, cell.zoom());
    LonFootprint {
        low: lon_low,
        high: lon_high,
    }
}

/// Pixel column range of the requested longitude band inside the band
/// raster. Fails when the band is not contained in the footprint.
fn crop_bounds(
    footprint: LonFootprint,
    lon_west: f64,
    lon_east: f64,
    width: usize,
) -> Result<(usize, usize)> {
    if lon_west < footprint.low - FOOTPRINT_EPSILON
        || lon_east > footprint.high + FOOTPRINT_EPSILON
    {
        return Err(StitchError::FootprintMismatch {
            lon_west,
            lon_east,
            footprint_low: footprint.low,
            footprint_high: footprint.high,
        });
    }

    let span = footprint.high - footprint.low;
    let x0 = ((lon_west - footprint.low) / span * width as f64).round() as usize;
    let x1 = ((lon_east - footprint.low) / span * width as f64).round() as usize;
    Ok((x0.min(width), x1.min(width)))
}

/// Output width for a requested height: shrunk by the cosine of the cell
/// edge farther from the equator, so the flat raster keeps an approximate
/// real-world aspect ratio.
fn aspect_width(cell: &GeoCell, size: u32) -> u32 {
    let cos = cell.extreme_lat().to_radians().cos();
    ((size as f64 * cos).round() as u32).max(1)
}

/// Convert a column range of the band into a row-major image.
fn band_to_image(band: &ResampledBand, x0: usize, x1: usize) -> RgbImage {
    RgbImage::from_fn((x1 - x0) as u32, band.height() as u32, |x, y| {
        image::Rgb(band.get(x0 + x as usize, y as usize))
    })
}

/// Stitch one cell into its final raster.
///
/// Builds the mosaic, resamples it into an equirectangular band covering
/// the mosaic's full longitude footprint, crops the exact 1° band out and
/// resizes to the aspect-corrected output dimensions.
pub fn stitch(request: &StitchRequest) -> Result<RgbImage> {
    if request.output_size == 0 {
        return Err(StitchError::InvalidOutputSize);
    }
    let cell = &request.cell;

    info!(
        lat = cell.lat(),
        lon = cell.lon(),
        zoom = cell.zoom(),
        size = request.output_size,
        "stitching cell"
    );

    let footprint = lon_footprint(cell);
    let mosaic = MosaicBuffer::build(&request.cache_root, &request.tile_ext, cell)?;
    let band = resample(&mosaic, cell, request.output_size as usize);
    drop(mosaic);

    let (x0, x1) = crop_bounds(footprint, cell.west_lon(), cell.east_lon(), band.width())?;
    debug!(x0, x1, band_width = band.width(), "cropping to longitude band");
    let cropped = band_to_image(&band, x0, x1);

    let width = aspect_width(cell, request.output_size);
    Ok(imageops::resize(
        &cropped,
        width,
        request.output_size,
        FilterType::Lanczos3,
    ))
}

/// Stitch one cell and write the result to `output`; the extension selects
/// the encoded format. Nothing is written when any stage fails.
pub fn stitch_to_file(request: &StitchRequest, output: &Path) -> Result<()> {
    let image = stitch(request)?;
    image.save(output)?;
    info!(
        path = %output.display(),
        width = image.width(),
        height = image.height(),
        "wrote stitched cell"
    );
    Ok(())
}
