//! Tests for grid geometry and alignment

extern crate std;

use geo::coord;

use crate::coordinate::GeoTransform;
use crate::error::SampleError;
use crate::raster::grid::GridSpec;

fn grid() -> GridSpec {
    GridSpec::new(4, 3, GeoTransform::from_origin(0.0, 3.0, 1.0, 1.0), Some(32633)).unwrap()
}

#[test]
fn cell_lookup_is_half_open() {
    let grid = grid();
    std::assert_eq!(grid.cell_of(coord! { x: 0.5, y: 2.5 }), Some((0, 0)));
    std::assert_eq!(grid.cell_of(coord! { x: 1.0, y: 2.0 }), Some((1, 1)));
    std::assert_eq!(grid.cell_of(coord! { x: 0.0, y: 3.0 }), Some((0, 0)));
    std::assert_eq!(grid.cell_of(coord! { x: 4.0, y: 1.5 }), None);
    std::assert_eq!(grid.cell_of(coord! { x: 2.0, y: 0.0 }), None);
    std::assert_eq!(grid.cell_of(coord! { x: -0.1, y: 1.5 }), None);
}

#[test]
fn centers_and_footprints() {
    let grid = grid();
    std::assert_eq!(grid.cell_center(2, 3), coord! { x: 3.5, y: 0.5 });
    let footprint = grid.cell_polygon(0, 0);
    std::assert_eq!(footprint.exterior().0.len(), 5);
    std::assert_eq!(footprint.exterior().0[2], coord! { x: 1.0, y: 2.0 });
}

#[test]
fn alignment() {
    let a = grid();
    let same = GridSpec::new(4, 3, GeoTransform::from_origin(1e-9, 3.0, 1.0, 1.0), None).unwrap();
    std::assert!(a.is_aligned_with(&same));

    let shifted = GridSpec::new(4, 3, GeoTransform::from_origin(0.5, 3.0, 1.0, 1.0), None).unwrap();
    std::assert!(!a.is_aligned_with(&shifted));

    let bigger = GridSpec::new(5, 3, GeoTransform::from_origin(0.0, 3.0, 1.0, 1.0), None).unwrap();
    let err = a.ensure_aligned(&bigger, "label raster").unwrap_err();
    std::assert!(matches!(err, SampleError::ShapeMismatch { .. }));

    let other_crs = GridSpec::new(4, 3, GeoTransform::from_origin(0.0, 3.0, 1.0, 1.0), Some(4326)).unwrap();
    std::assert!(!a.is_aligned_with(&other_crs));
}

#[test]
fn degenerate_transform_rejected() {
    let flat = GeoTransform::new([0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
    std::assert!(GridSpec::new(2, 2, flat, None).is_err());
}
