//! Homogeneous, ordered collections of geometries

use geo::{BoundingRect, Coord, Geometry, LineString, Point, Polygon, Rect};
use serde_json::{Map, Value};

use super::kind::GeometryKind;
use crate::error::{SampleError, SampleResult};

/// Per-feature attributes, as found in GeoJSON properties
pub type Attributes = Map<String, Value>;

/// The geometries of a set, stored by kind
#[derive(Debug, Clone, PartialEq)]
pub enum Geometries {
    Point(Vec<Point<f64>>),
    Polygon(Vec<Polygon<f64>>),
    LineString(Vec<LineString<f64>>),
}

/// Ordered geometries of a single kind plus their attributes
///
/// The position of a geometry in the set is its geometry index, the key that
/// joins extraction rows back to attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometrySet {
    geometries: Geometries,
    attributes: Vec<Attributes>,
}

impl GeometrySet {
    /// Builds a set from arbitrary `geo` geometries
    ///
    /// The kind is taken from the first geometry. A geometry of a different
    /// kind, a multi-part geometry, a collection or a degenerate geometry
    /// fails with `UnsupportedGeometry` naming its index. An empty input
    /// gives an empty point set.
    pub fn from_geometries(geometries: Vec<Geometry<f64>>) -> SampleResult<Self> {
        let kind = match geometries.first() {
            Some(first) => GeometryKind::of(first).map_err(|reason| unsupported(0, reason))?,
            None => return Ok(Self::points(Vec::new())),
        };

        let set = match kind {
            GeometryKind::Point => {
                let points = geometries
                    .into_iter()
                    .enumerate()
                    .map(|(index, geometry)| match geometry {
                        Geometry::Point(point) => Ok(point),
                        other => Err(mismatch(index, kind, &other)),
                    })
                    .collect::<SampleResult<Vec<_>>>()?;
                Self::points(points)
            }
            GeometryKind::Polygon => {
                let polygons = geometries
                    .into_iter()
                    .enumerate()
                    .map(|(index, geometry)| match geometry {
                        Geometry::Polygon(polygon) => Ok(polygon),
                        Geometry::Rect(rect) => Ok(rect.to_polygon()),
                        Geometry::Triangle(triangle) => Ok(triangle.to_polygon()),
                        other => Err(mismatch(index, kind, &other)),
                    })
                    .collect::<SampleResult<Vec<_>>>()?;
                Self::polygons(polygons)
            }
            GeometryKind::LineString => {
                let lines = geometries
                    .into_iter()
                    .enumerate()
                    .map(|(index, geometry)| match geometry {
                        Geometry::LineString(line) => Ok(line),
                        Geometry::Line(line) => Ok(LineString::from(vec![line.start, line.end])),
                        other => Err(mismatch(index, kind, &other)),
                    })
                    .collect::<SampleResult<Vec<_>>>()?;
                Self::linestrings(lines)
            }
        };

        set.validate()?;
        Ok(set)
    }

    /// Set of points with empty attributes
    pub fn points(points: Vec<Point<f64>>) -> Self {
        Self::with_empty_attributes(Geometries::Point(points))
    }

    /// Set of polygons with empty attributes
    pub fn polygons(polygons: Vec<Polygon<f64>>) -> Self {
        Self::with_empty_attributes(Geometries::Polygon(polygons))
    }

    /// Set of line strings with empty attributes
    pub fn linestrings(lines: Vec<LineString<f64>>) -> Self {
        Self::with_empty_attributes(Geometries::LineString(lines))
    }

    fn with_empty_attributes(geometries: Geometries) -> Self {
        let len = match &geometries {
            Geometries::Point(items) => items.len(),
            Geometries::Polygon(items) => items.len(),
            Geometries::LineString(items) => items.len(),
        };
        GeometrySet {
            geometries,
            attributes: vec![Attributes::new(); len],
        }
    }

    /// Attaches one attribute map per geometry
    pub fn with_attributes(mut self, attributes: Vec<Attributes>) -> SampleResult<Self> {
        if attributes.len() != self.len() {
            return Err(SampleError::InvalidVector {
                source_name: "attributes".to_string(),
                reason: format!("{} attribute maps for {} geometries", attributes.len(), self.len()),
            });
        }
        self.attributes = attributes;
        Ok(self)
    }

    /// Rejects degenerate or non-finite geometries
    ///
    /// Polygons need a closed exterior ring of at least three distinct
    /// vertices and line strings at least two vertices.
    pub fn validate(&self) -> SampleResult<()> {
        match &self.geometries {
            Geometries::Point(points) => {
                for (index, point) in points.iter().enumerate() {
                    if !all_finite(std::iter::once(&point.0)) {
                        return Err(unsupported(index, "point has a non-finite coordinate".to_string()));
                    }
                }
            }
            Geometries::Polygon(polygons) => {
                for (index, polygon) in polygons.iter().enumerate() {
                    if polygon.exterior().0.len() < 4 {
                        return Err(unsupported(index, "polygon exterior ring is empty or degenerate".to_string()));
                    }
                    let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors().iter());
                    for ring in rings {
                        if !all_finite(ring.0.iter()) {
                            return Err(unsupported(index, "polygon has a non-finite coordinate".to_string()));
                        }
                    }
                }
            }
            Geometries::LineString(lines) => {
                for (index, line) in lines.iter().enumerate() {
                    if line.0.len() < 2 {
                        return Err(unsupported(index, "line string needs at least two vertices".to_string()));
                    }
                    if !all_finite(line.0.iter()) {
                        return Err(unsupported(index, "line string has a non-finite coordinate".to_string()));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn kind(&self) -> GeometryKind {
        match self.geometries {
            Geometries::Point(_) => GeometryKind::Point,
            Geometries::Polygon(_) => GeometryKind::Polygon,
            Geometries::LineString(_) => GeometryKind::LineString,
        }
    }

    pub fn geometries(&self) -> &Geometries {
        &self.geometries
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attributes of a geometry
    pub fn attributes(&self, index: usize) -> Option<&Attributes> {
        self.attributes.get(index)
    }

    /// A single attribute of a geometry
    pub fn attribute(&self, index: usize, key: &str) -> Option<&Value> {
        self.attributes.get(index).and_then(|attributes| attributes.get(key))
    }

    /// Bounding rectangle of a geometry
    pub fn bounding_rect(&self, index: usize) -> Option<Rect<f64>> {
        match &self.geometries {
            Geometries::Point(points) => points.get(index).map(|point| point.bounding_rect()),
            Geometries::Polygon(polygons) => polygons.get(index).and_then(|polygon| polygon.bounding_rect()),
            Geometries::LineString(lines) => lines.get(index).and_then(|line| line.bounding_rect()),
        }
    }
}

fn all_finite<'a>(mut coords: impl Iterator<Item = &'a Coord<f64>>) -> bool {
    coords.all(|c| c.x.is_finite() && c.y.is_finite())
}

fn unsupported(index: usize, reason: String) -> SampleError {
    SampleError::UnsupportedGeometry { index, reason }
}

fn mismatch(index: usize, expected: GeometryKind, found: &Geometry<f64>) -> SampleError {
    let reason = match GeometryKind::of(found) {
        Ok(kind) => format!("set of {} geometries cannot hold a {}", expected, kind),
        Err(reason) => reason,
    };
    unsupported(index, reason)
}
