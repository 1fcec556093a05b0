//! Engine-wide constants shared by the projection math and the grid overlay.
//! Keeping them in a single place makes it easier to tweak magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Latitude beyond which the spherical Web-Mercator projection diverges.
pub const MAX_LATITUDE: f64 = 85.0511287798066;

/// Clamp applied to `sin(lat)` before projecting, avoiding infinities at the poles.
pub const SIN_LAT_CLAMP: f64 = 0.9999;

/// Added before flooring tile indices to counteract floating-point error
/// for points sitting exactly on a tile boundary.
pub const FLOOR_EPSILON: f64 = 1e-4;

/// Extra tiles generated on every side of the viewport so small pans that
/// never settle do not show pop-in.
pub const TILE_MARGIN: i64 = 2;

/// Grid boundaries become visible once `map_zoom > level - BOUNDARY_ZOOM_OFFSET`.
pub const BOUNDARY_ZOOM_OFFSET: f64 = 6.0;

/// Index labels become visible once `map_zoom > level - LABEL_ZOOM_OFFSET`.
/// Labels need a tighter window than boundaries to avoid clutter at low zoom.
pub const LABEL_ZOOM_OFFSET: f64 = 2.0;

/// Zoom levels offered by the grid overlay unless the host configures its own set.
pub const DEFAULT_GRID_LEVELS: [u8; 5] = [2, 4, 6, 8, 10];

/// Prefix for every source/layer id the grid overlay owns. Other components
/// must not touch ids under this prefix.
pub const GRID_ID_PREFIX: &str = "tile-z";
