//! Coordinate handling for georeferenced grids
//!
//! This module provides the affine pixel/world transform and the
//! world-space bounding boxes used to locate geometries on a grid.

mod bbox;
mod transform;

#[cfg(test)]
mod tests;

pub use self::bbox::BoundingBox;
pub use self::transform::GeoTransform;
