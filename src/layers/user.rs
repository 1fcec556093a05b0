//! Named user GeoJSON layers: create/remove, palette-cycled colors,
//! visibility, and center-on-layer.
//!
//! Each layer renders through three style layers over one source: `{name}`
//! backing `{name}-point` (circle), `{name}-line` (line), and `{name}-fill`
//! (fill), filtered by geometry type.

use crate::data::geojson::GeoJson;
use crate::map::{LayerKind, LayerSpec, MapView};
use crate::Result;
use serde_json::json;

/// Colors cycled across newly created layers.
const PALETTE: [&str; 4] = ["#f0a01c", "#66cf2d", "#4b5ae3", "#e06577"];

/// Padding in pixels applied when centering on a layer.
const FIT_PADDING: f64 = 40.0;

/// One named user layer and its styling state
#[derive(Debug, Clone, PartialEq)]
pub struct UserLayer {
    pub name: String,
    pub data: GeoJson,
    pub color: String,
    pub visible: bool,
}

/// Manages user-provided GeoJSON layers on a map view
pub struct UserLayerManager {
    layers: Vec<UserLayer>,
    counter: usize,
}

impl UserLayerManager {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            counter: 1,
        }
    }

    /// Layers in creation order
    pub fn layers(&self) -> &[UserLayer] {
        &self.layers
    }

    pub fn get(&self, name: &str) -> Option<&UserLayer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    /// Monotone creation counter, useful for default layer naming
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Creates a layer with the given name and data, replacing any existing
    /// layer of the same name.
    pub fn create_layer(
        &mut self,
        map: &mut dyn MapView,
        name: &str,
        data: GeoJson,
    ) -> Result<&UserLayer> {
        if self.get(name).is_some() {
            self.remove_layer(map, name)?;
        }

        let layer = UserLayer {
            name: name.to_string(),
            data,
            color: PALETTE[self.counter % PALETTE.len()].to_string(),
            visible: true,
        };
        self.counter += 1;

        Self::add_to_map(map, &layer)?;
        let index = self.layers.len();
        self.layers.push(layer);
        Ok(&self.layers[index])
    }

    fn add_to_map(map: &mut dyn MapView, layer: &UserLayer) -> Result<()> {
        let name = &layer.name;
        map.add_source(name, layer.data.clone())?;

        map.add_layer(
            LayerSpec::new(format!("{}-point", name), name, LayerKind::Circle)
                .with_filter(json!(["any", ["==", "$type", "Point"]]))
                .with_paint(json!({
                    "circle-color": layer.color,
                    "circle-radius": 4,
                })),
        )?;

        map.add_layer(
            LayerSpec::new(format!("{}-line", name), name, LayerKind::Line)
                .with_filter(json!([
                    "any",
                    ["==", "$type", "LineString"],
                    ["==", "$type", "Polygon"],
                ]))
                .with_layout(json!({
                    "line-cap": "round",
                    "line-join": "round",
                }))
                .with_paint(json!({
                    "line-color": layer.color,
                    "line-width": 4,
                })),
        )?;

        map.add_layer(
            LayerSpec::new(format!("{}-fill", name), name, LayerKind::Fill)
                .with_filter(json!(["any", ["==", "$type", "Polygon"]]))
                .with_paint(json!({
                    "fill-color": layer.color,
                    "fill-opacity": 0.33,
                })),
        )?;

        if !layer.visible {
            Self::apply_visibility(map, name, false)?;
        }
        Ok(())
    }

    fn apply_visibility(map: &mut dyn MapView, name: &str, visible: bool) -> Result<()> {
        for suffix in ["point", "line", "fill"] {
            map.set_layer_visibility(&format!("{}-{}", name, suffix), visible)?;
        }
        Ok(())
    }

    /// Recolors a layer's point, line, and fill rendering
    pub fn set_color(&mut self, map: &mut dyn MapView, name: &str, color: &str) -> Result<()> {
        let Some(layer) = self.layers.iter_mut().find(|layer| layer.name == name) else {
            return Ok(());
        };
        layer.color = color.to_string();

        map.set_paint_property(&format!("{}-point", name), "circle-color", color.into())?;
        map.set_paint_property(&format!("{}-line", name), "line-color", color.into())?;
        map.set_paint_property(&format!("{}-fill", name), "fill-color", color.into())?;
        Ok(())
    }

    /// Shows or hides a layer
    pub fn set_visibility(
        &mut self,
        map: &mut dyn MapView,
        name: &str,
        visible: bool,
    ) -> Result<()> {
        let Some(layer) = self.layers.iter_mut().find(|layer| layer.name == name) else {
            return Ok(());
        };
        layer.visible = visible;
        Self::apply_visibility(map, name, visible)
    }

    /// Removes a layer and its map artifacts; unknown names are a no-op.
    pub fn remove_layer(&mut self, map: &mut dyn MapView, name: &str) -> Result<()> {
        let Some(index) = self.layers.iter().position(|layer| layer.name == name) else {
            return Ok(());
        };

        for suffix in ["fill", "line", "point"] {
            let id = format!("{}-{}", name, suffix);
            if map.has_layer(&id) {
                map.remove_layer(&id)?;
            }
        }
        if map.has_source(name) {
            map.remove_source(name)?;
        }

        self.layers.remove(index);
        Ok(())
    }

    /// Centers the map on a layer's data
    pub fn center_layer(&self, map: &mut dyn MapView, name: &str) -> Result<()> {
        let Some(layer) = self.get(name) else {
            return Ok(());
        };
        match layer.data.bounds() {
            Some(bounds) => map.fit_bounds(&bounds, FIT_PADDING),
            None => {
                log::warn!("layer '{}' has no coordinates to center on", name);
                Ok(())
            }
        }
    }

    /// Re-adds every layer to the map, useful after a style swap dropped
    /// them.
    pub fn restore_layers(&self, map: &mut dyn MapView) -> Result<()> {
        for layer in &self.layers {
            Self::add_to_map(map, layer)?;
        }
        Ok(())
    }
}

impl Default for UserLayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geojson::{GeoJsonFeature, GeoJsonGeometry};
    use crate::map::memory::MemoryMapView;

    fn point_data(lng: f64, lat: f64) -> GeoJson {
        GeoJson::feature_collection(vec![GeoJsonFeature::new(GeoJsonGeometry::Point {
            coordinates: [lng, lat],
        })])
    }

    #[test]
    fn test_create_adds_three_sublayers() {
        let mut view = MemoryMapView::new();
        let mut manager = UserLayerManager::new();
        manager
            .create_layer(&mut view, "route", point_data(8.5, 47.4))
            .unwrap();

        assert!(view.has_source("route"));
        assert_eq!(
            view.layer_ids(),
            &["route-point", "route-line", "route-fill"]
        );
        assert_eq!(manager.layers()[0].color, PALETTE[1]);
    }

    #[test]
    fn test_palette_cycles() {
        let mut view = MemoryMapView::new();
        let mut manager = UserLayerManager::new();
        for i in 0..5 {
            manager
                .create_layer(&mut view, &format!("layer-{}", i), point_data(0.0, 0.0))
                .unwrap();
        }
        let colors: Vec<&str> = manager.layers().iter().map(|l| l.color.as_str()).collect();
        assert_eq!(
            colors,
            vec![PALETTE[1], PALETTE[2], PALETTE[3], PALETTE[0], PALETTE[1]]
        );
    }

    #[test]
    fn test_create_replaces_same_name() {
        let mut view = MemoryMapView::new();
        let mut manager = UserLayerManager::new();
        manager
            .create_layer(&mut view, "a", point_data(1.0, 1.0))
            .unwrap();
        manager
            .create_layer(&mut view, "a", point_data(2.0, 2.0))
            .unwrap();

        assert_eq!(manager.layers().len(), 1);
        let data = view.source_data("a").unwrap();
        assert_eq!(
            data.features()[0].geometry,
            Some(GeoJsonGeometry::Point {
                coordinates: [2.0, 2.0]
            })
        );
    }

    #[test]
    fn test_visibility_and_color() {
        let mut view = MemoryMapView::new();
        let mut manager = UserLayerManager::new();
        manager
            .create_layer(&mut view, "a", point_data(1.0, 1.0))
            .unwrap();

        manager.set_visibility(&mut view, "a", false).unwrap();
        assert_eq!(view.is_layer_visible("a-point"), Some(false));
        assert_eq!(view.is_layer_visible("a-fill"), Some(false));
        assert!(!manager.get("a").unwrap().visible);

        manager.set_color(&mut view, "a", "#123456").unwrap();
        assert_eq!(view.layer("a-line").unwrap().paint["line-color"], "#123456");
        assert_eq!(manager.get("a").unwrap().color, "#123456");

        // Unknown names are no-ops, not errors.
        manager.set_color(&mut view, "nope", "#fff").unwrap();
    }

    #[test]
    fn test_remove_layer() {
        let mut view = MemoryMapView::new();
        let mut manager = UserLayerManager::new();
        manager
            .create_layer(&mut view, "a", point_data(1.0, 1.0))
            .unwrap();
        manager.remove_layer(&mut view, "a").unwrap();

        assert!(manager.layers().is_empty());
        assert!(!view.has_source("a"));
        assert!(view.layer_ids().is_empty());
    }

    #[test]
    fn test_center_layer_fits_bounds() {
        let mut view = MemoryMapView::new();
        let mut manager = UserLayerManager::new();
        manager
            .create_layer(&mut view, "a", point_data(8.5, 47.4))
            .unwrap();
        manager.center_layer(&mut view, "a").unwrap();

        let (bounds, padding) = view.last_fit().unwrap();
        assert_eq!(*padding, 40.0);
        assert_eq!(bounds.center().lng, 8.5);
    }

    #[test]
    fn test_restore_after_style_swap() {
        let mut view = MemoryMapView::new();
        let mut manager = UserLayerManager::new();
        manager
            .create_layer(&mut view, "a", point_data(1.0, 1.0))
            .unwrap();
        manager.set_visibility(&mut view, "a", false).unwrap();

        view.set_style("satellite").unwrap();
        assert!(view.layer_ids().is_empty());

        manager.restore_layers(&mut view).unwrap();
        assert!(view.has_source("a"));
        assert_eq!(view.is_layer_visible("a-point"), Some(false));
        assert_eq!(view.layer_ids().len(), 3);
    }
}
