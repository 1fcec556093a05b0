//! In-memory implementation of the [`MapView`] port.
//!
//! Records every source, layer, and camera mutation so tests and headless
//! hosts can assert on the exact rendered state. Error behavior follows
//! GL-map conventions: duplicate ids and mutations of missing ids are
//! rejected, and a style swap drops all user sources and layers.

use crate::core::constants::MAX_LATITUDE;
use crate::core::geo::LatLngBounds;
use crate::data::geojson::GeoJson;
use crate::map::{LayerSpec, MapView};
use crate::prelude::HashMap;
use crate::{Error, Result};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
enum SourceRecord {
    GeoJson(GeoJson),
    Raster { tile_url: String, tile_size: u32 },
}

#[derive(Debug, Clone, PartialEq)]
struct LayerRecord {
    spec: LayerSpec,
    visible: bool,
}

/// A scriptable, fully observable map view.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryMapView {
    zoom: f64,
    bounds: LatLngBounds,
    style: String,
    sources: HashMap<String, SourceRecord>,
    layers: HashMap<String, LayerRecord>,
    /// Insertion order, which doubles as render order.
    layer_order: Vec<String>,
    last_fit: Option<(LatLngBounds, f64)>,
}

impl MemoryMapView {
    /// Creates a view showing the whole world at zoom 1.
    pub fn new() -> Self {
        Self::with_viewport(
            LatLngBounds::from_coords(-MAX_LATITUDE, -180.0, MAX_LATITUDE, 180.0),
            1.0,
        )
    }

    pub fn with_viewport(bounds: LatLngBounds, zoom: f64) -> Self {
        Self {
            zoom,
            bounds,
            style: "streets".to_string(),
            sources: HashMap::default(),
            layers: HashMap::default(),
            layer_order: Vec::new(),
            last_fit: None,
        }
    }

    /// Scripts a zoom change (the host would then emit `MapEvent::ZoomEnd`).
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Scripts a pan (the host would then emit `MapEvent::MoveEnd`).
    pub fn set_bounds(&mut self, bounds: LatLngBounds) {
        self.bounds = bounds;
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    /// Layer ids in render order
    pub fn layer_ids(&self) -> &[String] {
        &self.layer_order
    }

    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.get(id).map(|record| &record.spec)
    }

    pub fn is_layer_visible(&self, id: &str) -> Option<bool> {
        self.layers.get(id).map(|record| record.visible)
    }

    /// Current data of a GeoJSON source, if it exists and is one.
    pub fn source_data(&self, id: &str) -> Option<&GeoJson> {
        match self.sources.get(id) {
            Some(SourceRecord::GeoJson(data)) => Some(data),
            _ => None,
        }
    }

    /// URL template and tile size of a raster source.
    pub fn raster_source(&self, id: &str) -> Option<(&str, u32)> {
        match self.sources.get(id) {
            Some(SourceRecord::Raster {
                tile_url,
                tile_size,
            }) => Some((tile_url.as_str(), *tile_size)),
            _ => None,
        }
    }

    /// Bounds and padding of the most recent `fit_bounds` call.
    pub fn last_fit(&self) -> Option<&(LatLngBounds, f64)> {
        self.last_fit.as_ref()
    }
}

impl Default for MemoryMapView {
    fn default() -> Self {
        Self::new()
    }
}

impl MapView for MemoryMapView {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn bounds(&self) -> LatLngBounds {
        self.bounds.clone()
    }

    fn add_source(&mut self, id: &str, data: GeoJson) -> Result<()> {
        if self.sources.contains_key(id) {
            return Err(Error::MapView(format!("source '{}' already exists", id)));
        }
        self.sources
            .insert(id.to_string(), SourceRecord::GeoJson(data));
        Ok(())
    }

    fn add_raster_source(&mut self, id: &str, tile_url: &str, tile_size: u32) -> Result<()> {
        if self.sources.contains_key(id) {
            return Err(Error::MapView(format!("source '{}' already exists", id)));
        }
        self.sources.insert(
            id.to_string(),
            SourceRecord::Raster {
                tile_url: tile_url.to_string(),
                tile_size,
            },
        );
        Ok(())
    }

    fn set_source_data(&mut self, id: &str, data: GeoJson) -> Result<()> {
        match self.sources.get_mut(id) {
            Some(SourceRecord::GeoJson(existing)) => {
                *existing = data;
                Ok(())
            }
            Some(SourceRecord::Raster { .. }) => Err(Error::MapView(format!(
                "source '{}' is not a geojson source",
                id
            ))),
            None => Err(Error::MapView(format!("no such source '{}'", id))),
        }
    }

    fn remove_source(&mut self, id: &str) -> Result<()> {
        if self
            .layers
            .values()
            .any(|record| record.spec.source == id)
        {
            return Err(Error::MapView(format!("source '{}' is still in use", id)));
        }
        self.sources
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::MapView(format!("no such source '{}'", id)))
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn add_layer(&mut self, spec: LayerSpec) -> Result<()> {
        if self.layers.contains_key(&spec.id) {
            return Err(Error::Layer(format!("layer '{}' already exists", spec.id)));
        }
        if !self.sources.contains_key(&spec.source) {
            return Err(Error::Layer(format!(
                "layer '{}' references missing source '{}'",
                spec.id, spec.source
            )));
        }
        let id = spec.id.clone();
        self.layers.insert(id.clone(), LayerRecord { spec, visible: true });
        self.layer_order.push(id);
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<()> {
        if self.layers.remove(id).is_none() {
            return Err(Error::Layer(format!("no such layer '{}'", id)));
        }
        self.layer_order.retain(|layer_id| layer_id != id);
        Ok(())
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.contains_key(id)
    }

    fn set_layer_visibility(&mut self, id: &str, visible: bool) -> Result<()> {
        let record = self
            .layers
            .get_mut(id)
            .ok_or_else(|| Error::Layer(format!("no such layer '{}'", id)))?;
        record.visible = visible;
        Ok(())
    }

    fn set_paint_property(&mut self, layer_id: &str, name: &str, value: Value) -> Result<()> {
        let record = self
            .layers
            .get_mut(layer_id)
            .ok_or_else(|| Error::Layer(format!("no such layer '{}'", layer_id)))?;
        if !record.spec.paint.is_object() {
            record.spec.paint = Value::Object(serde_json::Map::new());
        }
        if let Some(paint) = record.spec.paint.as_object_mut() {
            paint.insert(name.to_string(), value);
        }
        Ok(())
    }

    fn set_style(&mut self, style: &str) -> Result<()> {
        self.style = style.to_string();
        self.sources.clear();
        self.layers.clear();
        self.layer_order.clear();
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64) -> Result<()> {
        self.last_fit = Some((bounds.clone(), padding));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::LayerKind;

    fn empty_collection() -> GeoJson {
        GeoJson::feature_collection(Vec::new())
    }

    #[test]
    fn test_source_lifecycle() {
        let mut view = MemoryMapView::new();
        view.add_source("a", empty_collection()).unwrap();
        assert!(view.has_source("a"));
        assert!(view.add_source("a", empty_collection()).is_err());

        view.set_source_data("a", empty_collection()).unwrap();
        assert!(view.set_source_data("missing", empty_collection()).is_err());

        view.remove_source("a").unwrap();
        assert!(!view.has_source("a"));
        assert!(view.remove_source("a").is_err());
    }

    #[test]
    fn test_layer_requires_source() {
        let mut view = MemoryMapView::new();
        let spec = LayerSpec::new("l", "missing", LayerKind::Line);
        assert!(view.add_layer(spec).is_err());

        view.add_source("s", empty_collection()).unwrap();
        view.add_layer(LayerSpec::new("l", "s", LayerKind::Line))
            .unwrap();
        assert_eq!(view.is_layer_visible("l"), Some(true));

        // A source backing a layer cannot be removed first.
        assert!(view.remove_source("s").is_err());
        view.remove_layer("l").unwrap();
        view.remove_source("s").unwrap();
    }

    #[test]
    fn test_style_swap_drops_everything() {
        let mut view = MemoryMapView::new();
        view.add_source("s", empty_collection()).unwrap();
        view.add_layer(LayerSpec::new("l", "s", LayerKind::Fill))
            .unwrap();

        view.set_style("satellite").unwrap();
        assert_eq!(view.style(), "satellite");
        assert!(!view.has_source("s"));
        assert!(!view.has_layer("l"));
        assert!(view.layer_ids().is_empty());
    }

    #[test]
    fn test_paint_property_update() {
        let mut view = MemoryMapView::new();
        view.add_source("s", empty_collection()).unwrap();
        view.add_layer(LayerSpec::new("l", "s", LayerKind::Circle))
            .unwrap();
        view.set_paint_property("l", "circle-color", "#ff0000".into())
            .unwrap();
        assert_eq!(
            view.layer("l").unwrap().paint["circle-color"],
            Value::from("#ff0000")
        );
    }
}
