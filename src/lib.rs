//! # Tilegrid
//!
//! Overlays the standard slippy-map tile grid (boundary polygons and "x, y"
//! index labels) on an interactive globe or map view.
//!
//! The crate is built around a small port: everything talks to the host map
//! through the [`map::MapView`] trait, so the overlay logic can be driven by
//! a real map widget or by the in-memory [`map::memory::MemoryMapView`] in
//! tests and headless hosts.

pub mod core;
pub mod data;
pub mod layers;
pub mod map;
pub mod prelude;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    geo::{LatLng, LatLngBounds, TileCoord, TileRange},
    mercator::{point_to_tile, tile_to_point},
};

pub use crate::layers::{
    basemap::{Basemap, BasemapManager},
    grid::TileGridOverlay,
    user::{UserLayer, UserLayerManager},
};

pub use crate::map::{memory::MemoryMapView, LayerKind, LayerSpec, MapEvent, MapView};

pub use crate::data::{
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
    parser::try_convert_geojson,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Map view error: {0}")]
    MapView(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
