//! GeoJSON input for geometry sets
//!
//! Accepts a FeatureCollection, a single Feature or a bare Geometry.
//! Feature properties become the set's attributes.

use geo::{Coord, Geometry, LineString, Point, Polygon};
use geojson::{GeoJson, Value};
use log::{debug, info};
use std::fs;
use std::path::Path;

use super::set::{Attributes, GeometrySet};
use crate::error::{SampleError, SampleResult};

/// Reads a geometry set from a GeoJSON file
pub fn read_geojson<P: AsRef<Path>>(path: P) -> SampleResult<GeometrySet> {
    let path = path.as_ref();
    info!("Reading geometries from {}", path.display());

    let content = fs::read_to_string(path).map_err(|e| SampleError::resource(path, e))?;
    parse_geojson(&content, &path.display().to_string())
}

/// Parses a geometry set from GeoJSON text
///
/// # Arguments
/// * `content` - The GeoJSON document
/// * `source_name` - Name used in error messages
pub fn parse_geojson(content: &str, source_name: &str) -> SampleResult<GeometrySet> {
    let document: GeoJson = content.parse().map_err(|e| SampleError::InvalidVector {
        source_name: source_name.to_string(),
        reason: format!("Failed to parse GeoJSON: {}", e),
    })?;

    let features: Vec<(Option<geojson::Geometry>, Attributes)> = match document {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .map(|feature| (feature.geometry, feature.properties.unwrap_or_default()))
            .collect(),
        GeoJson::Feature(feature) => vec![(feature.geometry, feature.properties.unwrap_or_default())],
        GeoJson::Geometry(geometry) => vec![(Some(geometry), Attributes::new())],
    };

    let mut geometries = Vec::with_capacity(features.len());
    let mut attributes = Vec::with_capacity(features.len());
    for (index, (geometry, properties)) in features.into_iter().enumerate() {
        let geometry = geometry.ok_or_else(|| SampleError::UnsupportedGeometry {
            index,
            reason: "feature has no geometry".to_string(),
        })?;
        let converted = convert_value(&geometry.value)
            .map_err(|reason| SampleError::UnsupportedGeometry { index, reason })?;
        geometries.push(converted);
        attributes.push(properties);
    }

    debug!("{}: {} features", source_name, geometries.len());
    GeometrySet::from_geometries(geometries)?.with_attributes(attributes)
}

fn convert_value(value: &Value) -> Result<Geometry<f64>, String> {
    match value {
        Value::Point(position) => Ok(Geometry::Point(Point::from(coord(position)?))),
        Value::LineString(positions) => Ok(Geometry::LineString(line_string(positions)?)),
        Value::Polygon(rings) => {
            let mut rings = rings.iter().map(|ring| line_string(ring));
            let exterior = rings.next().transpose()?.unwrap_or_else(|| LineString::new(Vec::new()));
            let interiors = rings.collect::<Result<Vec<_>, _>>()?;
            Ok(Geometry::Polygon(Polygon::new(exterior, interiors)))
        }
        Value::MultiPoint(_) => Err("MultiPoint is not supported, explode it into points".to_string()),
        Value::MultiLineString(_) => Err("MultiLineString is not supported, explode it into line strings".to_string()),
        Value::MultiPolygon(_) => Err("MultiPolygon is not supported, explode it into polygons".to_string()),
        Value::GeometryCollection(_) => Err("GeometryCollection is not supported".to_string()),
    }
}

fn coord(position: &[f64]) -> Result<Coord<f64>, String> {
    match position {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(format!("position needs at least two values, found {}", position.len())),
    }
}

fn line_string(positions: &[Vec<f64>]) -> Result<LineString<f64>, String> {
    positions
        .iter()
        .map(|position| coord(position))
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}
