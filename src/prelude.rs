//! Prelude module for common tilegrid types and traits
//!
//! Re-exports the most commonly used types for easy importing with
//! `use tilegrid::prelude::*;`

pub use crate::core::{
    geo::{LatLng, LatLngBounds, TileCoord, TileRange},
    mercator::{point_to_tile, tile_to_point},
};

pub use crate::map::{memory::MemoryMapView, LayerKind, LayerSpec, MapEvent, MapView};

pub use crate::layers::{
    basemap::{Basemap, BasemapManager},
    grid::TileGridOverlay,
    user::{UserLayer, UserLayerManager},
};

pub use crate::data::{
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
    parser::try_convert_geojson,
};

pub use crate::{Error, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
