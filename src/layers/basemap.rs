//! Basemap switching: two vendor styles plus an OSM raster overlay that is
//! toggled on top of whichever style is loaded.

use crate::map::{LayerKind, LayerSpec, MapView};
use crate::Result;
use serde_json::json;

const OSM_LAYER_ID: &str = "basemap-osm";
const OSM_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const STREETS_STYLE: &str = "mapbox://styles/mapbox/streets-v12";
const SATELLITE_STYLE: &str = "mapbox://styles/mapbox/satellite-v9";

/// Available basemaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Basemap {
    Streets,
    Satellite,
    OpenStreetMap,
}

impl Basemap {
    /// Style URL backing this basemap. The OSM overlay has no style of its
    /// own; it renders above whichever vendor style is active.
    fn style_url(&self) -> Option<&'static str> {
        match self {
            Basemap::Streets => Some(STREETS_STYLE),
            Basemap::Satellite => Some(SATELLITE_STYLE),
            Basemap::OpenStreetMap => None,
        }
    }
}

impl std::fmt::Display for Basemap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Basemap::Streets => write!(f, "streets"),
            Basemap::Satellite => write!(f, "satellite"),
            Basemap::OpenStreetMap => write!(f, "openstreetmap"),
        }
    }
}

/// Manages basemap switching on a map view
pub struct BasemapManager {
    current: Basemap,
    /// The vendor style actually loaded; OSM selection leaves it untouched.
    underlying_style: Basemap,
}

impl BasemapManager {
    pub fn new(initial: Basemap) -> Self {
        Self {
            current: initial,
            underlying_style: initial,
        }
    }

    pub fn current(&self) -> Basemap {
        self.current
    }

    /// Lazily adds the OSM raster overlay layer. Call on every style load:
    /// a style swap drops the layer, and this restores it with the right
    /// visibility.
    pub fn ensure_osm_layer(&self, map: &mut dyn MapView) -> Result<()> {
        if map.has_layer(OSM_LAYER_ID) {
            return Ok(());
        }
        if !map.has_source(OSM_LAYER_ID) {
            map.add_raster_source(OSM_LAYER_ID, OSM_TILE_URL, 256)?;
        }
        map.add_layer(
            LayerSpec::new(OSM_LAYER_ID, OSM_LAYER_ID, LayerKind::Raster).with_paint(json!({
                "raster-fade-duration": 0,
            })),
        )?;
        map.set_layer_visibility(OSM_LAYER_ID, self.current == Basemap::OpenStreetMap)
    }

    /// Switches to another basemap; selecting the current one is a no-op.
    ///
    /// The vendor style is only reset when the underlying style actually
    /// changes, so toggling OSM on and off never reloads it.
    pub fn set_basemap(&mut self, map: &mut dyn MapView, value: Basemap) -> Result<()> {
        if self.current == value {
            return Ok(());
        }
        self.current = value;

        match value {
            Basemap::OpenStreetMap => map.set_layer_visibility(OSM_LAYER_ID, true),
            Basemap::Streets | Basemap::Satellite => {
                map.set_layer_visibility(OSM_LAYER_ID, false)?;
                if self.underlying_style != value {
                    if let Some(style) = value.style_url() {
                        map.set_style(style)?;
                    }
                    self.underlying_style = value;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::memory::MemoryMapView;

    #[test]
    fn test_osm_layer_created_lazily() {
        let mut view = MemoryMapView::new();
        let manager = BasemapManager::new(Basemap::Streets);

        manager.ensure_osm_layer(&mut view).unwrap();
        assert!(view.has_layer(OSM_LAYER_ID));
        assert_eq!(view.is_layer_visible(OSM_LAYER_ID), Some(false));
        assert_eq!(
            view.raster_source(OSM_LAYER_ID),
            Some((OSM_TILE_URL, 256))
        );

        // Idempotent once present.
        manager.ensure_osm_layer(&mut view).unwrap();
        assert_eq!(view.layer_ids().len(), 1);
    }

    #[test]
    fn test_switch_to_osm_only_toggles_visibility() {
        let mut view = MemoryMapView::new();
        let mut manager = BasemapManager::new(Basemap::Streets);
        manager.ensure_osm_layer(&mut view).unwrap();
        let style_before = view.style().to_string();

        manager.set_basemap(&mut view, Basemap::OpenStreetMap).unwrap();
        assert_eq!(view.is_layer_visible(OSM_LAYER_ID), Some(true));
        assert_eq!(view.style(), style_before);
        assert_eq!(manager.current(), Basemap::OpenStreetMap);
    }

    #[test]
    fn test_switch_back_from_osm_keeps_style() {
        let mut view = MemoryMapView::new();
        let mut manager = BasemapManager::new(Basemap::Streets);
        manager.ensure_osm_layer(&mut view).unwrap();

        manager.set_basemap(&mut view, Basemap::OpenStreetMap).unwrap();
        manager.set_basemap(&mut view, Basemap::Streets).unwrap();

        // Underlying style never changed, so no swap happened and the OSM
        // layer is simply hidden again.
        assert_eq!(view.is_layer_visible(OSM_LAYER_ID), Some(false));
    }

    #[test]
    fn test_switch_to_satellite_swaps_style() {
        let mut view = MemoryMapView::new();
        let mut manager = BasemapManager::new(Basemap::Streets);
        manager.ensure_osm_layer(&mut view).unwrap();

        manager.set_basemap(&mut view, Basemap::Satellite).unwrap();
        assert_eq!(view.style(), SATELLITE_STYLE);
        // The style swap dropped every layer; the host re-runs
        // ensure_osm_layer on style load.
        assert!(!view.has_layer(OSM_LAYER_ID));
        manager.ensure_osm_layer(&mut view).unwrap();
        assert_eq!(view.is_layer_visible(OSM_LAYER_ID), Some(false));
    }

    #[test]
    fn test_same_value_is_noop() {
        let mut view = MemoryMapView::new();
        let mut manager = BasemapManager::new(Basemap::Streets);
        manager.ensure_osm_layer(&mut view).unwrap();
        manager.set_basemap(&mut view, Basemap::Streets).unwrap();
        assert_eq!(manager.current(), Basemap::Streets);
    }
}
