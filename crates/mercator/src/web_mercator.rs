//! Web Mercator forward/inverse projection and tile addressing.
//!
//! The world at zoom level `z` is a `2^z × 2^z` grid of tiles. Continuous
//! tile-space coordinates put x = 0 at 180°W and y = 0 at the north edge of
//! the projection (y grows southward):
//!
//! ```text
//! x = 2^z / 2π · (π + lon)
//! y = 2^z / 2π · (π − ln tan(π/4 + lat/2))
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

/// Latitude of the top/bottom edge of the Web-Mercator square, in degrees.
///
/// Tiles are not defined beyond this; aspect-ratio cosines are computed on
/// latitudes clamped to it.
pub const MAX_LATITUDE_DEG: f64 = 85.05112877980659;

/// A tile coordinate (x, y) at some zoom level.
///
/// Valid range is `[0, 2^zoom − 1]` on each axis; x grows eastward and
/// y grows southward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileIndex {
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileIndex {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Number of tiles along one axis at `zoom`, as a float.
#[inline]
fn tile_count(zoom: u32) -> f64 {
    2f64.powi(zoom as i32)
}

/// Project lat/lon degrees to continuous tile-space coordinates.
///
/// Unlike [`forward_tile`] the result is not floored; it is clamped to
/// `[0, 2^zoom]` (one past the last tile index) so that boundary-exact
/// mosaic coordinates stay representable.
pub fn forward_continuous(lat_deg: f64, lon_deg: f64, zoom: u32) -> (f64, f64) {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let n = tile_count(zoom);
    let scale = n / TAU;

    let x = scale * (PI + lon);
    let y = scale * (PI - (FRAC_PI_4 + lat / 2.0).tan().ln());

    (x.clamp(0.0, n), y.clamp(0.0, n))
}

/// Project lat/lon degrees to the tile index containing that point.
///
/// Floors the continuous coordinate and clamps each axis to
/// `[0, 2^zoom − 1]`.
pub fn forward_tile(lat_deg: f64, lon_deg: f64, zoom: u32) -> TileIndex {
    let (x, y) = forward_continuous(lat_deg, lon_deg, zoom);
    let max = tile_count(zoom) - 1.0;

    TileIndex {
        x: x.floor().clamp(0.0, max) as u32,
        y: y.floor().clamp(0.0, max) as u32,
    }
}

/// Exact algebraic inverse of [`forward_continuous`].
///
/// Maps continuous tile-space coordinates back to (lat, lon) degrees.
pub fn inverse(x: f64, y: f64, zoom: u32) -> (f64, f64) {
    // τ / 2^zoom = 2^(1−zoom) · π
    let tau_over_n = TAU / tile_count(zoom);

    let lat = 2.0 * (PI - tau_over_n * y).exp().atan() - FRAC_PI_2;
    let lon = tau_over_n * x - PI;

    (lat.to_degrees(), lon.to_degrees())
}

/// Local vertical stretch of the Mercator projection at a latitude.
///
/// The analytic derivative `d/dlat [ln tan(π/4 + lat/2)] = 1 / cos(lat)`:
/// how fast Mercator y moves per radian of latitude, relative to the
/// equator. Grows without bound as `|lat| → 90°`. The `2^zoom` scale of
/// tile space cancels out of the resampler's window sizing, so it does not
/// appear here.
#[inline]
pub fn vertical_stretch(lat_rad: f64) -> f64 {
    1.0 / lat_rad.cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAD_TOLERANCE: f64 = 1e-6;

    #[test]
    fn test_forward_tile_known_coordinates() {
        // Zoom 0 is a single tile
        let coord = forward_tile(0.0, 0.0, 0);
        assert_eq!(coord, TileIndex { x: 0, y: 0 });

        // NYC at zoom 10
        let coord = forward_tile(40.7128, -74.0060, 10);
        assert!(coord.x > 290 && coord.x < 310);
        assert!(coord.y > 370 && coord.y < 400);

        // Cell corner used by the stitch pipeline
        let coord = forward_tile(23.0, 113.0, 13);
        assert_eq!(coord, TileIndex { x: 6667, y: 3557 });
        let coord = forward_tile(22.0, 114.0, 13);
        assert_eq!(coord, TileIndex { x: 6690, y: 3582 });
    }

    #[test]
    fn test_forward_tile_clamps_to_grid() {
        // Poles and antimeridian stay inside [0, 2^z − 1]
        let n = 2u32.pow(5) - 1;
        let coord = forward_tile(89.9, 179.9999, 5);
        assert_eq!(coord.y, 0);
        assert_eq!(coord.x, n);

        let coord = forward_tile(-89.9, -180.0, 5);
        assert_eq!(coord.y, n);
        assert_eq!(coord.x, 0);
    }

    #[test]
    fn test_forward_continuous_upper_bound_inclusive() {
        // The continuous range extends one past the tile-index range so the
        // east/south mosaic boundary is exactly representable.
        let (x, _) = forward_continuous(0.0, 180.0, 3);
        assert!((x - 8.0).abs() < 1e-9 && x <= 8.0);
        let (_, y) = forward_continuous(-89.9999, 0.0, 3);
        assert!((y - 8.0).abs() < 1e-9 && y <= 8.0);
    }

    #[test]
    fn test_roundtrip_inverse_of_forward() {
        for zoom in [1u32, 2, 5, 9, 13, 17, 20] {
            for lat in [-85.0, -60.5, -22.25, 0.0, 3.125, 45.0, 71.5, 85.0] {
                for lon in [-180.0, -121.75, -1.5, 0.0, 30.25, 113.0, 179.5] {
                    let (x, y) = forward_continuous(lat, lon, zoom);
                    let (lat2, lon2) = inverse(x, y, zoom);
                    assert!(
                        (lat2 - lat).to_radians().abs() < RAD_TOLERANCE,
                        "lat roundtrip failed at ({lat}, {lon}, z{zoom}): got {lat2}"
                    );
                    assert!(
                        (lon2 - lon).to_radians().abs() < RAD_TOLERANCE,
                        "lon roundtrip failed at ({lat}, {lon}, z{zoom}): got {lon2}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_roundtrip_forward_of_inverse() {
        for zoom in [1u32, 6, 13] {
            let n = 2f64.powi(zoom as i32);
            for frac in [0.0, 0.125, 0.33, 0.5, 0.875, 1.0] {
                let (x, y) = (n * frac, n * (1.0 - frac * 0.5));
                let (lat, lon) = inverse(x, y, zoom);
                let (x2, y2) = forward_continuous(lat, lon, zoom);
                assert!((x2 - x).abs() < 1e-6, "x: {x} vs {x2} at z{zoom}");
                assert!((y2 - y).abs() < 1e-6, "y: {y} vs {y2} at z{zoom}");
            }
        }
    }

    #[test]
    fn test_tile_index_monotonicity() {
        // Longitude increases x, latitude decreases y
        let mut prev_x = 0.0;
        let mut lon = -179.0;
        while lon < 180.0 {
            let (x, _) = forward_continuous(10.0, lon, 8);
            assert!(x > prev_x, "x not increasing at lon {lon}");
            prev_x = x;
            lon += 7.0;
        }

        let mut prev_y = f64::INFINITY;
        let mut lat = -84.0;
        while lat < 85.0 {
            let (_, y) = forward_continuous(lat, 10.0, 8);
            assert!(y < prev_y, "y not decreasing at lat {lat}");
            prev_y = y;
            lat += 3.0;
        }
    }

    #[test]
    fn test_vertical_stretch_matches_finite_difference() {
        // The stretch must be the analytic derivative of the projection's
        // log-tan term, not an approximation of it.
        let h = 1e-6;
        for lat_deg in [-80.0, -45.0, -10.0, 0.0, 22.5, 60.0, 84.0] {
            let lat = f64::to_radians(lat_deg);
            let f = |l: f64| (FRAC_PI_4 + l / 2.0).tan().ln();
            let numeric = (f(lat + h) - f(lat - h)) / (2.0 * h);
            let analytic = vertical_stretch(lat);
            assert!(
                ((numeric - analytic) / analytic).abs() < 1e-5,
                "stretch mismatch at {lat_deg}: analytic {analytic}, numeric {numeric}"
            );
        }
    }

    #[test]
    fn test_vertical_stretch_grows_toward_poles() {
        assert!((vertical_stretch(0.0) - 1.0).abs() < 1e-12);
        assert!(vertical_stretch(f64::to_radians(60.0)) > vertical_stretch(f64::to_radians(30.0)));
        assert!(vertical_stretch(f64::to_radians(85.0)) > 10.0);
    }
}
