//! Heuristic conversion of pasted free text into GeoJSON.
//!
//! Three formats are sniffed, in order: raw GeoJSON, Google encoded
//! polyline, and CSV lines of two floats (axis order auto-detected from
//! coordinate ranges).

use crate::data::geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry};

/// Encoded-polyline coordinate precision (1e-5 degrees).
const POLYLINE_PRECISION: f64 = 1e5;

/// Tries to interpret `input` as geometry; returns `None` when nothing
/// plausible parses.
pub fn try_convert_geojson(input: &str) -> Option<GeoJson> {
    let trimmed = input.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        parse_json(trimmed)
    } else if is_within_polyline_range(trimmed) {
        let coordinates = decode_polyline(trimmed)?;
        Some(GeoJson::Feature(GeoJsonFeature::new(
            GeoJsonGeometry::LineString { coordinates },
        )))
    } else {
        parse_csv(trimmed)
    }
}

fn parse_json(input: &str) -> Option<GeoJson> {
    if let Ok(geojson) = serde_json::from_str::<GeoJson>(input) {
        return Some(geojson);
    }
    // A bare geometry object is also accepted and wrapped in a feature.
    serde_json::from_str::<GeoJsonGeometry>(input)
        .ok()
        .map(|geometry| GeoJson::Feature(GeoJsonFeature::new(geometry)))
}

/// Every byte of an encoded polyline lies in `63..=126`.
fn is_within_polyline_range(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| (63..=126).contains(&b))
}

/// Decodes one zigzag varint chunk, advancing `index`.
fn decode_value(bytes: &[u8], index: &mut usize) -> Option<i64> {
    let mut result: i64 = 0;
    let mut shift = 0u32;
    loop {
        let byte = (*bytes.get(*index)? as i64) - 63;
        *index += 1;
        result |= (byte & 0x1f).checked_shl(shift)?;
        shift += 5;
        if byte < 0x20 {
            break;
        }
    }
    Some(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Google encoded-polyline decoding; positions come out `[lng, lat]`.
fn decode_polyline(input: &str) -> Option<Vec<[f64; 2]>> {
    let bytes = input.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut coordinates = Vec::new();

    while index < bytes.len() {
        lat += decode_value(bytes, &mut index)?;
        lng += decode_value(bytes, &mut index)?;
        coordinates.push([
            lng as f64 / POLYLINE_PRECISION,
            lat as f64 / POLYLINE_PRECISION,
        ]);
    }

    Some(coordinates)
}

/// Lines of `a,b` floats become points. Axis order is guessed per line: the
/// pair is taken as lon,lat when the ranges allow it, lat,lon otherwise.
fn parse_csv(input: &str) -> Option<GeoJson> {
    let mut features = Vec::new();

    for line in input.lines() {
        let parts: Vec<&str> = line.trim().split(',').collect();
        if parts.len() != 2 {
            continue;
        }
        let (Ok(a), Ok(b)) = (
            parts[0].trim().parse::<f64>(),
            parts[1].trim().parse::<f64>(),
        ) else {
            continue;
        };

        let coordinates = if a.abs() <= 180.0 && b.abs() <= 90.0 {
            [a, b]
        } else if b.abs() <= 180.0 && a.abs() <= 90.0 {
            [b, a]
        } else {
            continue;
        };

        features.push(GeoJsonFeature::new(GeoJsonGeometry::Point { coordinates }));
    }

    if features.is_empty() {
        None
    } else {
        Some(GeoJson::feature_collection(features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_raw_geojson() {
        let input = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[8.54,47.37]}}]}"#;
        let geojson = try_convert_geojson(input).unwrap();
        assert_eq!(geojson.features().len(), 1);
    }

    #[test]
    fn test_parses_bare_geometry() {
        let input = r#"{"type":"LineString","coordinates":[[0.0,0.0],[1.0,1.0]]}"#;
        let geojson = try_convert_geojson(input).unwrap();
        assert!(matches!(
            geojson.features()[0].geometry,
            Some(GeoJsonGeometry::LineString { .. })
        ));
    }

    #[test]
    fn test_parses_encoded_polyline() {
        // The canonical example from the encoding spec:
        // (38.5, -120.2), (40.7, -120.95), (43.252, -126.453)
        let geojson = try_convert_geojson("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        let Some(GeoJsonGeometry::LineString { coordinates }) = &geojson.features()[0].geometry
        else {
            panic!("expected a LineString");
        };
        assert_eq!(coordinates.len(), 3);
        assert!((coordinates[0][0] - (-120.2)).abs() < 1e-9);
        assert!((coordinates[0][1] - 38.5).abs() < 1e-9);
        assert!((coordinates[2][0] - (-126.453)).abs() < 1e-9);
        assert!((coordinates[2][1] - 43.252).abs() < 1e-9);
    }

    #[test]
    fn test_parses_csv_lon_lat() {
        let geojson = try_convert_geojson("8.54, 47.37\n-73.99, 40.73").unwrap();
        let features = geojson.features();
        assert_eq!(features.len(), 2);
        assert_eq!(
            features[0].geometry,
            Some(GeoJsonGeometry::Point {
                coordinates: [8.54, 47.37]
            })
        );
    }

    #[test]
    fn test_csv_swaps_lat_lon_when_ranges_demand() {
        // 140 cannot be a latitude, so the pair must be lat,lon reversed.
        let geojson = try_convert_geojson("47.37, 8.54\n40.73, -140.99").unwrap();
        let features = geojson.features();
        // First line fits lon,lat as-is and is kept that way.
        assert_eq!(
            features[0].geometry,
            Some(GeoJsonGeometry::Point {
                coordinates: [47.37, 8.54]
            })
        );
        assert_eq!(
            features[1].geometry,
            Some(GeoJsonGeometry::Point {
                coordinates: [-140.99, 40.73]
            })
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(try_convert_geojson("{not json}").is_none());
        assert!(try_convert_geojson("999,999\nfoo,bar").is_none());
        assert!(try_convert_geojson("").is_none());
    }
}
