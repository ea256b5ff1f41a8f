//! Vector geometries to sample under
//!
//! A [`GeometrySet`] is an ordered, single-kind collection of `geo`
//! geometries with index-aligned attributes, loadable from GeoJSON.

mod kind;
mod set;
mod geojson_reader;

#[cfg(test)]
mod tests;

pub use kind::GeometryKind;
pub use set::{Attributes, Geometries, GeometrySet};
pub use geojson_reader::{parse_geojson, read_geojson};
