//! Tile grid overlay: per-zoom-level boundary polygons and "x, y" index
//! labels, reconciled against the viewport on every settle event.
//!
//! The manager owns a fixed set of allowed zoom levels. The user toggles
//! levels on and off; the current map zoom then decides which enabled levels
//! actually render (boundaries appear earlier than labels as the camera
//! closes in). Geometry is regenerated wholesale on every pass so the
//! boundary and label sources always describe the same tile range.

use crate::core::constants::{
    BOUNDARY_ZOOM_OFFSET, DEFAULT_GRID_LEVELS, GRID_ID_PREFIX, LABEL_ZOOM_OFFSET, TILE_MARGIN,
};
use crate::core::geo::{TileCoord, TileRange};
use crate::data::geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry};
use crate::map::{LayerKind, LayerSpec, MapEvent, MapView};
use crate::prelude::HashSet;
use crate::{Error, Result};
use serde_json::{json, Value};
use std::collections::HashMap;

fn boundary_id(level: u8) -> String {
    format!("{}{}-boundary", GRID_ID_PREFIX, level)
}

fn labels_id(level: u8) -> String {
    format!("{}{}-labels", GRID_ID_PREFIX, level)
}

/// Manages tile boundary overlay layers on a map view
pub struct TileGridOverlay {
    /// Allowed levels, sorted ascending; fixed at construction.
    allowed: Vec<u8>,
    enabled: HashSet<u8>,
    active: HashSet<u8>,
}

impl TileGridOverlay {
    /// Creates an overlay offering the given zoom levels. Duplicates are
    /// dropped and the set is kept sorted for deterministic reconciliation
    /// order.
    pub fn new(levels: impl IntoIterator<Item = u8>) -> Self {
        let mut allowed: Vec<u8> = levels.into_iter().collect();
        allowed.sort_unstable();
        allowed.dedup();
        Self {
            allowed,
            enabled: HashSet::default(),
            active: HashSet::default(),
        }
    }

    pub fn allowed_levels(&self) -> &[u8] {
        &self.allowed
    }

    /// Levels the user has toggled on, sorted ascending
    pub fn enabled_levels(&self) -> Vec<u8> {
        let mut levels: Vec<u8> = self.enabled.iter().copied().collect();
        levels.sort_unstable();
        levels
    }

    /// Levels currently rendering, sorted ascending
    pub fn active_levels(&self) -> Vec<u8> {
        let mut levels: Vec<u8> = self.active.iter().copied().collect();
        levels.sort_unstable();
        levels
    }

    pub fn is_enabled(&self, level: u8) -> bool {
        self.enabled.contains(&level)
    }

    pub fn is_active(&self, level: u8) -> bool {
        self.active.contains(&level)
    }

    /// Flips a level on or off and immediately reconciles every level.
    ///
    /// Toggling a level outside the allowed set is ignored (logged at warn);
    /// calling this twice restores the previous rendered state.
    pub fn toggle_level(&mut self, map: &mut dyn MapView, level: u8) -> Result<()> {
        if !self.allowed.contains(&level) {
            log::warn!("ignoring toggle for unknown grid level {}", level);
            return Ok(());
        }
        if !self.enabled.remove(&level) {
            self.enabled.insert(level);
        }
        self.viewport_changed(map)
    }

    /// Forwards a settle notification; both pan-end and zoom-end trigger a
    /// full reconciliation pass.
    pub fn handle_event(&mut self, map: &mut dyn MapView, event: &MapEvent) -> Result<()> {
        match event {
            MapEvent::MoveEnd { .. } | MapEvent::ZoomEnd { .. } => self.viewport_changed(map),
        }
    }

    /// Reconciles every allowed level against the current viewport.
    ///
    /// Runs synchronously; a rejected map mutation aborts the pass and leaves
    /// the previously rendered state in place.
    pub fn viewport_changed(&mut self, map: &mut dyn MapView) -> Result<()> {
        let bounds = map.bounds();
        if bounds.is_degenerate() {
            return Err(Error::InvalidViewport(format!(
                "viewport has no area: {:?}",
                bounds
            )));
        }

        for level in self.allowed.clone() {
            self.reconcile_level(map, level)?;
        }
        Ok(())
    }

    fn reconcile_level(&mut self, map: &mut dyn MapView, level: u8) -> Result<()> {
        if !self.enabled.contains(&level) {
            Self::tear_down(map, level)?;
            self.active.remove(&level);
            return Ok(());
        }

        Self::ensure_layers(map, level)?;

        let zoom = map.zoom();
        let boundary_active = zoom > level as f64 - BOUNDARY_ZOOM_OFFSET;
        let label_active = zoom > level as f64 - LABEL_ZOOM_OFFSET;
        log::debug!(
            "grid level {}: zoom {:.2}, boundary={}, labels={}",
            level,
            zoom,
            boundary_active,
            label_active
        );

        map.set_layer_visibility(&boundary_id(level), boundary_active)?;
        map.set_layer_visibility(&labels_id(level), label_active)?;

        if boundary_active || label_active {
            self.active.insert(level);
            Self::regenerate(map, level)
        } else {
            // Stale geometry may remain in the hidden sources; it is
            // invisible and will be replaced on the next activation.
            self.active.remove(&level);
            Ok(())
        }
    }

    /// Creates the level's sources and layers if this is its first
    /// activation. Boundary opacity is fixed at creation: higher levels
    /// render fainter grids.
    fn ensure_layers(map: &mut dyn MapView, level: u8) -> Result<()> {
        let boundary = boundary_id(level);
        let labels = labels_id(level);

        if !map.has_source(&boundary) {
            map.add_source(&boundary, GeoJson::feature_collection(Vec::new()))?;
        }
        if !map.has_source(&labels) {
            map.add_source(&labels, GeoJson::feature_collection(Vec::new()))?;
        }

        if !map.has_layer(&boundary) {
            let opacity = 1.2 - level as f64 / 10.0;
            map.add_layer(
                LayerSpec::new(&boundary, &boundary, LayerKind::Line).with_paint(json!({
                    "line-color": "#000000",
                    "line-width": 1,
                    "line-opacity": opacity,
                })),
            )?;
        }
        if !map.has_layer(&labels) {
            map.add_layer(
                LayerSpec::new(&labels, &labels, LayerKind::Symbol).with_layout(json!({
                    "text-field": ["get", "name"],
                    "text-font": ["Open Sans Bold", "Arial Unicode MS Bold"],
                    "text-size": 14,
                    "text-anchor": "center",
                })),
            )?;
        }
        Ok(())
    }

    /// Removes the level's layers and sources, if present.
    fn tear_down(map: &mut dyn MapView, level: u8) -> Result<()> {
        let boundary = boundary_id(level);
        let labels = labels_id(level);

        if map.has_layer(&labels) {
            map.remove_layer(&labels)?;
        }
        if map.has_layer(&boundary) {
            map.remove_layer(&boundary)?;
        }
        if map.has_source(&labels) {
            map.remove_source(&labels)?;
        }
        if map.has_source(&boundary) {
            map.remove_source(&boundary)?;
        }
        Ok(())
    }

    /// Regenerates boundary and label geometry for the visible tile range.
    ///
    /// Both collections are fully built before the first push so the sources
    /// never describe different tile ranges.
    fn regenerate(map: &mut dyn MapView, level: u8) -> Result<()> {
        let bounds = map.bounds();
        let range = TileRange::from_viewport(
            &bounds.north_west(),
            &bounds.south_east(),
            level,
            TILE_MARGIN,
        );

        let mut boundaries = Vec::with_capacity(range.len());
        let mut labels = Vec::with_capacity(range.len());

        for tile in range.iter() {
            let nw = tile.nw_corner();
            let se = tile.se_corner();
            let (west, north) = (nw.lng, nw.lat);
            let (east, south) = (se.lng, se.lat);

            boundaries.push(
                GeoJsonFeature::new(GeoJsonGeometry::Polygon {
                    coordinates: vec![vec![
                        [west, north],
                        [east, north],
                        [east, south],
                        [west, south],
                        [west, north],
                    ]],
                })
                .with_properties(tile_properties(&tile, false)),
            );

            labels.push(
                GeoJsonFeature::new(GeoJsonGeometry::Point {
                    coordinates: [(west + east) / 2.0, (north + south) / 2.0],
                })
                .with_properties(tile_properties(&tile, true)),
            );
        }

        map.set_source_data(&boundary_id(level), GeoJson::feature_collection(boundaries))?;
        map.set_source_data(&labels_id(level), GeoJson::feature_collection(labels))?;
        Ok(())
    }
}

impl Default for TileGridOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_LEVELS)
    }
}

fn tile_properties(tile: &TileCoord, with_name: bool) -> HashMap<String, Value> {
    let mut properties = HashMap::new();
    properties.insert("x".to_string(), tile.x.into());
    properties.insert("y".to_string(), tile.y.into());
    properties.insert("z".to_string(), tile.z.into());
    if with_name {
        properties.insert("name".to_string(), format!("{}, {}", tile.x, tile.y).into());
    }
    properties
}
