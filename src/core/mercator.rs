//! Spherical Web-Mercator tile math.
//!
//! Conversions between geodetic coordinates and slippy-map tile indices,
//! using the standard 256-pixel reference tile. Both functions are pure and
//! total; [`point_to_tile`] may return indices outside `[0, 2^z)` for
//! out-of-range input, which callers clamp (see
//! [`TileRange`](crate::core::geo::TileRange)).

use crate::core::constants::{FLOOR_EPSILON, MAX_LATITUDE, SIN_LAT_CLAMP, TILE_SIZE};
use crate::core::geo::LatLng;
use std::f64::consts::PI;

/// Projects a geodetic point to world-pixel coordinates at zoom 0
/// (a single 256x256 tile covering the world).
fn world_pixel(point: &LatLng) -> (f64, f64) {
    let half = TILE_SIZE as f64 / 2.0;
    let sin_lat = point
        .lat
        .to_radians()
        .sin()
        .clamp(-SIN_LAT_CLAMP, SIN_LAT_CLAMP);

    let x = half + point.lng * TILE_SIZE as f64 / 360.0;
    let y = half - half / PI * sin_lat.atanh();
    (x, y)
}

/// Pixels covered by one tile edge at the given zoom level.
fn pixel_scale(zoom: u8) -> f64 {
    TILE_SIZE as f64 / 2_f64.powi(zoom as i32)
}

/// Maps a geodetic point to the integer tile index containing it at `zoom`.
///
/// A small positive epsilon is added before flooring so that points sitting
/// exactly on a tile boundary land in the tile whose corner they are, instead
/// of drifting one tile off through floating-point error.
pub fn point_to_tile(point: &LatLng, zoom: u8) -> (i64, i64) {
    let (x_px, y_px) = world_pixel(point);
    let scale = pixel_scale(zoom);

    let x = (x_px / scale + FLOOR_EPSILON).floor() as i64;
    let y = (y_px / scale + FLOOR_EPSILON).floor() as i64;
    (x, y)
}

/// Returns the geodetic coordinate of a tile's north-west corner.
///
/// Latitude is clamped to the Web-Mercator-valid range; longitude is the raw
/// linear mapping and is not normalized beyond +-180.
pub fn tile_to_point(x: i64, y: i64, zoom: u8) -> LatLng {
    let half = TILE_SIZE as f64 / 2.0;
    let scale = pixel_scale(zoom);

    let x_px = x as f64 * scale;
    let y_px = y as f64 * scale;

    let lng = (x_px - half) * 360.0 / TILE_SIZE as f64;
    let lat = ((half - y_px) * PI / half)
        .tanh()
        .asin()
        .to_degrees()
        .clamp(-MAX_LATITUDE, MAX_LATITUDE);

    LatLng::new(lat, lng)
}
