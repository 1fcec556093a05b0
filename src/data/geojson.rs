use crate::core::geo::LatLngBounds;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub geometry: Option<GeoJsonGeometry>,
    pub properties: Option<HashMap<String, serde_json::Value>>,
}

impl GeoJsonFeature {
    pub fn new(geometry: GeoJsonGeometry) -> Self {
        Self {
            id: None,
            geometry: Some(geometry),
            properties: None,
        }
    }

    pub fn with_properties(mut self, properties: HashMap<String, serde_json::Value>) -> Self {
        self.properties = Some(properties);
        self
    }
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
}

impl GeoJson {
    pub fn feature_collection(features: Vec<GeoJsonFeature>) -> Self {
        GeoJson::FeatureCollection { features }
    }

    /// All features in document order
    pub fn features(&self) -> &[GeoJsonFeature] {
        match self {
            GeoJson::Feature(feature) => std::slice::from_ref(feature),
            GeoJson::FeatureCollection { features } => features,
        }
    }

    /// Bounding box over every coordinate position in the document, or
    /// `None` when it contains no positions at all.
    pub fn bounds(&self) -> Option<LatLngBounds> {
        let mut positions = Vec::new();
        for feature in self.features() {
            if let Some(geometry) = &feature.geometry {
                geometry.collect_positions(&mut positions);
            }
        }
        if positions.is_empty() {
            return None;
        }

        let first = positions[0];
        let mut west = first[0];
        let mut east = first[0];
        let mut south = first[1];
        let mut north = first[1];
        for position in &positions[1..] {
            west = west.min(position[0]);
            east = east.max(position[0]);
            south = south.min(position[1]);
            north = north.max(position[1]);
        }

        Some(LatLngBounds::from_coords(south, west, north, east))
    }
}

impl GeoJsonGeometry {
    /// Appends every coordinate position (including interior rings) to `out`.
    pub fn collect_positions(&self, out: &mut Vec<[f64; 2]>) {
        match self {
            GeoJsonGeometry::Point { coordinates } => out.push(*coordinates),
            GeoJsonGeometry::LineString { coordinates }
            | GeoJsonGeometry::MultiPoint { coordinates } => out.extend(coordinates),
            GeoJsonGeometry::Polygon { coordinates }
            | GeoJsonGeometry::MultiLineString { coordinates } => {
                for ring in coordinates {
                    out.extend(ring);
                }
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => {
                for polygon in coordinates {
                    for ring in polygon {
                        out.extend(ring);
                    }
                }
            }
            GeoJsonGeometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.collect_positions(out);
                }
            }
        }
    }
}
