//! Tests for the affine geotransform

extern crate std;

use crate::coordinate::GeoTransform;

#[test]
fn north_up_round_trip() {
    let gt = GeoTransform::from_origin(100.0, 50.0, 2.0, 0.5);
    std::assert_eq!(gt.apply(0.0, 0.0), (100.0, 50.0));
    std::assert_eq!(gt.apply(3.0, 4.0), (106.0, 48.0));

    let inv = gt.inverse().unwrap();
    std::assert_eq!(inv.apply(106.0, 48.0), (3.0, 4.0));
    std::assert!(gt.is_north_up());
}

#[test]
fn rotated_inverse() {
    let gt = GeoTransform::new([10.0, 1.0, 0.5, 20.0, 0.25, -1.0]);
    let inv = gt.inverse().unwrap();
    let (x, y) = gt.apply(7.0, 3.0);
    let (col, row) = inv.apply(x, y);
    std::assert!((col - 7.0).abs() < 1e-9);
    std::assert!((row - 3.0).abs() < 1e-9);
    std::assert!(!gt.is_north_up());
}

#[test]
fn singular_has_no_inverse() {
    std::assert!(GeoTransform::new([0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).inverse().is_none());
}

#[test]
fn shifted_moves_origin() {
    let gt = GeoTransform::from_origin(0.0, 10.0, 1.0, 1.0).shifted(-0.5, -0.5);
    std::assert_eq!(gt.origin(), (-0.5, 10.5));
    std::assert_eq!(gt.pixel_size(), (1.0, -1.0));
}
