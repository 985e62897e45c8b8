//! 1°×1° geographic cell addressing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::web_mercator::{forward_tile, TileIndex, MAX_LATITUDE_DEG};

/// Smallest zoom level a cell can be stitched at. At zoom 0 the whole world
/// is one tile and the tile-index math below degenerates.
pub const MIN_ZOOM: u32 = 1;
/// Largest supported zoom level, matching common slippy-map pyramids.
pub const MAX_ZOOM: u32 = 22;

/// Errors from constructing a [`GeoCell`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CellError {
    /// Zoom level outside the supported pyramid range.
    #[error("zoom level {0} outside supported range 1..=22")]
    InvalidZoom(u32),

    /// Cell latitude outside the Web-Mercator band.
    #[error("cell latitude {0} outside supported range -85..=84")]
    InvalidLatitude(i32),

    /// Cell longitude outside the world.
    #[error("cell longitude {0} outside supported range -180..=179")]
    InvalidLongitude(i32),
}

/// A 1°×1° cell identified by its south-west corner, plus the tile zoom
/// level to stitch it at.
///
/// Validated at construction and immutable afterwards; every downstream
/// coordinate derives from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeoCell {
    lat: i32,
    lon: i32,
    zoom: u32,
}

impl GeoCell {
    /// Create a cell from its south-west corner.
    ///
    /// The full cell (`lat..lat+1`, `lon..lon+1`) must lie inside the
    /// ±85.05° Web-Mercator latitude band and within the world's longitude
    /// range, and `zoom` must be in `1..=22`.
    pub fn new(lat: i32, lon: i32, zoom: u32) -> Result<Self, CellError> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return Err(CellError::InvalidZoom(zoom));
        }
        if !(-85..=84).contains(&lat) {
            return Err(CellError::InvalidLatitude(lat));
        }
        if !(-180..=179).contains(&lon) {
            return Err(CellError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon, zoom })
    }

    pub fn lat(&self) -> i32 {
        self.lat
    }

    pub fn lon(&self) -> i32 {
        self.lon
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    /// Latitude of the cell's south edge in degrees.
    pub fn south_lat(&self) -> f64 {
        self.lat as f64
    }

    /// Latitude of the cell's north edge in degrees.
    pub fn north_lat(&self) -> f64 {
        (self.lat + 1) as f64
    }

    /// Longitude of the cell's west edge in degrees.
    pub fn west_lon(&self) -> f64 {
        self.lon as f64
    }

    /// Longitude of the cell's east edge in degrees.
    pub fn east_lon(&self) -> f64 {
        (self.lon + 1) as f64
    }

    /// Tile-index bounding box covering the cell: `(north-west, south-east)`
    /// corners, both inclusive.
    ///
    /// Tile y grows southward, so the north-west corner carries the smaller
    /// index on both axes.
    pub fn tile_bounds(&self) -> (TileIndex, TileIndex) {
        let low = forward_tile(self.north_lat(), self.west_lon(), self.zoom);
        let high = forward_tile(self.south_lat(), self.east_lon(), self.zoom);
        (low, high)
    }

    /// Absolute latitude of the cell edge farther from the equator, clamped
    /// to the Web-Mercator limit. Drives the output aspect correction.
    pub fn extreme_lat(&self) -> f64 {
        self.south_lat()
            .abs()
            .max(self.north_lat().abs())
            .min(MAX_LATITUDE_DEG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_zoom() {
        assert_eq!(GeoCell::new(22, 113, 0), Err(CellError::InvalidZoom(0)));
        assert_eq!(GeoCell::new(22, 113, 23), Err(CellError::InvalidZoom(23)));
        assert!(GeoCell::new(22, 113, 1).is_ok());
        assert!(GeoCell::new(22, 113, 22).is_ok());
    }

    #[test]
    fn test_new_validates_latitude_band() {
        assert_eq!(GeoCell::new(85, 0, 13), Err(CellError::InvalidLatitude(85)));
        assert_eq!(
            GeoCell::new(-86, 0, 13),
            Err(CellError::InvalidLatitude(-86))
        );
        assert!(GeoCell::new(84, 0, 13).is_ok());
        assert!(GeoCell::new(-85, 0, 13).is_ok());
    }

    #[test]
    fn test_new_validates_longitude() {
        assert_eq!(
            GeoCell::new(0, 180, 13),
            Err(CellError::InvalidLongitude(180))
        );
        assert_eq!(
            GeoCell::new(0, -181, 13),
            Err(CellError::InvalidLongitude(-181))
        );
        assert!(GeoCell::new(0, 179, 13).is_ok());
        assert!(GeoCell::new(0, -180, 13).is_ok());
    }

    #[test]
    fn test_tile_bounds_known_cell() {
        let cell = GeoCell::new(22, 113, 13).unwrap();
        let (low, high) = cell.tile_bounds();
        assert_eq!(low, TileIndex { x: 6667, y: 3557 });
        assert_eq!(high, TileIndex { x: 6690, y: 3582 });
        // Mercator stretch at 22° makes the box taller than wide
        assert!(high.y - low.y > high.x - low.x);
    }

    #[test]
    fn test_tile_bounds_ordered() {
        for (lat, lon) in [(-85, -180), (-1, 0), (0, 0), (51, -1), (84, 179)] {
            let cell = GeoCell::new(lat, lon, 7).unwrap();
            let (low, high) = cell.tile_bounds();
            assert!(low.x <= high.x, "x order broken for ({lat}, {lon})");
            assert!(low.y <= high.y, "y order broken for ({lat}, {lon})");
        }
    }

    #[test]
    fn test_extreme_lat() {
        assert_eq!(GeoCell::new(22, 113, 13).unwrap().extreme_lat(), 23.0);
        assert_eq!(GeoCell::new(-23, 113, 13).unwrap().extreme_lat(), 23.0);
        assert_eq!(GeoCell::new(0, 0, 13).unwrap().extreme_lat(), 1.0);
        // Clamped at the Web-Mercator limit
        assert!(GeoCell::new(-85, 0, 13).unwrap().extreme_lat() <= MAX_LATITUDE_DEG);
    }
}
