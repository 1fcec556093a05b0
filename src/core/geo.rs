use crate::core::constants::MAX_LATITUDE;
use crate::core::mercator::{point_to_tile, tile_to_point};
use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Wraps longitude to [-180, 180] range
    pub fn wrap_lng(lng: f64) -> f64 {
        let wrapped = lng % 360.0;
        if wrapped > 180.0 {
            wrapped - 360.0
        } else if wrapped < -180.0 {
            wrapped + 360.0
        } else {
            wrapped
        }
    }

    /// Clamps latitude to the Web-Mercator-valid range
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// The north-west corner of the bounds
    pub fn north_west(&self) -> LatLng {
        LatLng::new(self.north_east.lat, self.south_west.lng)
    }

    /// The south-east corner of the bounds
    pub fn south_east(&self) -> LatLng {
        LatLng::new(self.south_west.lat, self.north_east.lng)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// A zero- or negative-area viewport cannot drive tile enumeration.
    pub fn is_degenerate(&self) -> bool {
        self.south_west.lat >= self.north_east.lat || self.south_west.lng >= self.north_east.lng
    }
}

/// Represents a tile coordinate in the slippy map tile system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Geodetic coordinate of the tile's north-west corner
    pub fn nw_corner(&self) -> LatLng {
        tile_to_point(self.x as i64, self.y as i64, self.z)
    }

    /// Geodetic coordinate of the tile's south-east corner
    pub fn se_corner(&self) -> LatLng {
        tile_to_point(self.x as i64 + 1, self.y as i64 + 1, self.z)
    }

    /// Gets the bounds of the tile
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.nw_corner();
        let se = self.se_corner();
        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    /// Checks if the tile is valid for its zoom level
    pub fn is_valid(&self) -> bool {
        let max_coord = 2_u32.pow(self.z as u32);
        self.x < max_coord && self.y < max_coord
    }
}

/// Inclusive, clamped rectangle of tile indices visible at one zoom level.
///
/// Built from raw [`point_to_tile`] output, which may fall outside the valid
/// index range; construction applies the pre-render margin and clamps every
/// edge into `[0, 2^z)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub z: u8,
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl TileRange {
    /// Computes the tile range covering the viewport described by its
    /// north-west and south-east corners, expanded by `margin` tiles on every
    /// side and clamped to the valid index range.
    pub fn from_viewport(nw: &LatLng, se: &LatLng, zoom: u8, margin: i64) -> Self {
        let (min_x, min_y) = point_to_tile(nw, zoom);
        let (max_x, max_y) = point_to_tile(se, zoom);

        let max_index = (1_i64 << zoom) - 1;
        let clamp = |v: i64| v.clamp(0, max_index) as u32;

        Self {
            z: zoom,
            min_x: clamp(min_x - margin),
            min_y: clamp(min_y - margin),
            max_x: clamp(max_x + margin),
            max_y: clamp(max_y + margin),
        }
    }

    /// Number of tiles in the range
    pub fn len(&self) -> usize {
        let width = (self.max_x as usize + 1).saturating_sub(self.min_x as usize);
        let height = (self.max_y as usize + 1).saturating_sub(self.min_y as usize);
        width * height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, tile: &TileCoord) -> bool {
        tile.z == self.z
            && tile.x >= self.min_x
            && tile.x <= self.max_x
            && tile.y >= self.min_y
            && tile.y <= self.max_y
    }

    /// Iterates the contained tiles column-major (x outer, y inner), which
    /// keeps generated feature order deterministic.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + '_ {
        let (z, min_y, max_y) = (self.z, self.min_y, self.max_y);
        (self.min_x..=self.max_x)
            .flat_map(move |x| (min_y..=max_y).map(move |y| TileCoord::new(x, y, z)))
    }
}
