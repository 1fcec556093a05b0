//! The map-view port.
//!
//! Every component in this crate mutates the host map exclusively through
//! [`MapView`], so the same overlay logic runs against a real GL map binding
//! or against [`memory::MemoryMapView`] in tests.

pub mod memory;

use crate::core::geo::{LatLng, LatLngBounds};
use crate::data::geojson::GeoJson;
use crate::Result;
use serde_json::Value;

/// Rendered layer kinds, mirroring the GL style-spec layer types the
/// overlays use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Line,
    Symbol,
    Circle,
    Fill,
    Raster,
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::Line => write!(f, "line"),
            LayerKind::Symbol => write!(f, "symbol"),
            LayerKind::Circle => write!(f, "circle"),
            LayerKind::Fill => write!(f, "fill"),
            LayerKind::Raster => write!(f, "raster"),
        }
    }
}

/// Declarative description of a map layer: which source it draws and how.
///
/// Paint and layout properties are kept as raw JSON values so the port stays
/// agnostic of any particular style-spec binding.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: String,
    pub source: String,
    pub kind: LayerKind,
    pub paint: Value,
    pub layout: Value,
    pub filter: Option<Value>,
}

impl LayerSpec {
    pub fn new(id: impl Into<String>, source: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            kind,
            paint: Value::Null,
            layout: Value::Null,
            filter: None,
        }
    }

    pub fn with_paint(mut self, paint: Value) -> Self {
        self.paint = paint;
        self
    }

    pub fn with_layout(mut self, layout: Value) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Viewport-settle notifications emitted by the host map once a gesture has
/// come to rest. Intermediate per-frame updates are deliberately absent.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Pan ended
    MoveEnd { center: LatLng },
    /// Zoom ended
    ZoomEnd { zoom: f64 },
}

/// Abstract host map surface.
///
/// Queries are infallible; mutations return `Result` so a host that can
/// reject them (a detached style, an id collision) surfaces that as an error
/// instead of leaving layers half-applied.
pub trait MapView {
    /// Current map zoom, fractional during/after pinch zooms.
    fn zoom(&self) -> f64;

    /// Current viewport bounds in geodetic coordinates.
    fn bounds(&self) -> LatLngBounds;

    fn add_source(&mut self, id: &str, data: GeoJson) -> Result<()>;

    /// Registers a raster tile source (used by the basemap OSM overlay).
    fn add_raster_source(&mut self, id: &str, tile_url: &str, tile_size: u32) -> Result<()>;

    /// Replaces the full feature collection of an existing GeoJSON source.
    fn set_source_data(&mut self, id: &str, data: GeoJson) -> Result<()>;

    fn remove_source(&mut self, id: &str) -> Result<()>;

    fn has_source(&self, id: &str) -> bool;

    fn add_layer(&mut self, spec: LayerSpec) -> Result<()>;

    fn remove_layer(&mut self, id: &str) -> Result<()>;

    fn has_layer(&self, id: &str) -> bool;

    fn set_layer_visibility(&mut self, id: &str, visible: bool) -> Result<()>;

    fn set_paint_property(&mut self, layer_id: &str, name: &str, value: Value) -> Result<()>;

    /// Swaps the base style. Hosts that mirror GL-map semantics drop all
    /// user sources and layers when this happens; callers re-add what they
    /// own afterwards.
    fn set_style(&mut self, style: &str) -> Result<()>;

    /// Moves the camera so `bounds` is fully visible with `padding` pixels
    /// around it.
    fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64) -> Result<()>;
}
