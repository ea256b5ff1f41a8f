//! Geometry kinds the extractor knows how to sample

use std::fmt;

use geo::Geometry;

/// Kind of every geometry in a [`GeometrySet`](super::GeometrySet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    Polygon,
    LineString,
}

impl GeometryKind {
    /// Kind of a `geo` geometry
    ///
    /// `Line` counts as a line string and `Rect`/`Triangle` as polygons.
    /// Multi-part geometries and collections have no kind and yield the
    /// reason they are rejected.
    pub fn of(geometry: &Geometry<f64>) -> Result<Self, String> {
        match geometry {
            Geometry::Point(_) => Ok(GeometryKind::Point),
            Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => Ok(GeometryKind::Polygon),
            Geometry::LineString(_) | Geometry::Line(_) => Ok(GeometryKind::LineString),
            Geometry::MultiPoint(_) => Err("MultiPoint is not supported, explode it into points".to_string()),
            Geometry::MultiPolygon(_) => Err("MultiPolygon is not supported, explode it into polygons".to_string()),
            Geometry::MultiLineString(_) => Err("MultiLineString is not supported, explode it into line strings".to_string()),
            Geometry::GeometryCollection(_) => Err("GeometryCollection is not supported".to_string()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::LineString => "LineString",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
