//! Tests for GeoJSON parsing

extern crate std;

use serde_json::json;

use crate::error::SampleError;
use crate::geometry::{parse_geojson, GeometryKind};

#[test]
fn feature_collection_with_properties() {
    let text = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"class": 1},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[2,0],[2,2],[0,2],[0,0]]]}},
            {"type": "Feature", "properties": {"class": 2},
             "geometry": {"type": "Polygon", "coordinates": [[[5,5],[6,5],[6,6],[5,5]]]}}
        ]
    }"#;
    let set = parse_geojson(text, "inline").unwrap();
    std::assert_eq!(set.kind(), GeometryKind::Polygon);
    std::assert_eq!(set.len(), 2);
    std::assert_eq!(set.attribute(1, "class"), Some(&json!(2)));
}

#[test]
fn bare_geometry_and_single_feature() {
    let point = parse_geojson(r#"{"type": "Point", "coordinates": [1.5, 2.5, 10.0]}"#, "inline").unwrap();
    std::assert_eq!(point.kind(), GeometryKind::Point);

    let line = parse_geojson(
        r#"{"type": "Feature", "properties": null,
            "geometry": {"type": "LineString", "coordinates": [[0,0],[3,1]]}}"#,
        "inline",
    ).unwrap();
    std::assert_eq!(line.kind(), GeometryKind::LineString);
    std::assert!(line.attributes(0).unwrap().is_empty());
}

#[test]
fn rejects_null_multi_and_mixed() {
    let null = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {}, "geometry": null}]}"#;
    std::assert!(matches!(parse_geojson(null, "x"), Err(SampleError::UnsupportedGeometry { index: 0, .. })));

    let multi = r#"{"type": "MultiPoint", "coordinates": [[0,0],[1,1]]}"#;
    std::assert!(matches!(parse_geojson(multi, "x"), Err(SampleError::UnsupportedGeometry { .. })));

    let mixed = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [0,0]}},
        {"type": "Feature", "properties": {}, "geometry": {"type": "LineString", "coordinates": [[0,0],[1,1]]}}]}"#;
    std::assert!(matches!(parse_geojson(mixed, "x"), Err(SampleError::UnsupportedGeometry { index: 1, .. })));
}

#[test]
fn malformed_json_is_invalid_vector() {
    std::assert!(matches!(parse_geojson("{not json", "broken.geojson"), Err(SampleError::InvalidVector { .. })));
}
