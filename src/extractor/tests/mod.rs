//! Tests for the extractor module

mod options_tests;

use crate::coordinate::GeoTransform;
use crate::raster::{GridSpec, MemoryRaster, RasterStack};

/// 5x5 grid of unit cells with its top-left corner at (0, 5)
///
/// Cell (row, col) has its centre at (col + 0.5, 4.5 - row).
pub(crate) fn grid_5x5() -> GridSpec {
    GridSpec::new(5, 5, GeoTransform::from_origin(0.0, 5.0, 1.0, 1.0), Some(32633)).unwrap()
}

/// Two bands: `red` holds `row * 10 + col`, `nir` holds `100 + row * 10 + col`
pub(crate) fn two_band_raster() -> MemoryRaster {
    let red: Vec<f64> = (0..25).map(|i| ((i / 5) * 10 + i % 5) as f64).collect();
    let nir: Vec<f64> = red.iter().map(|v| v + 100.0).collect();
    MemoryRaster::new("scene", grid_5x5(), vec![red, nir])
        .unwrap()
        .with_band_names(vec!["red".to_string(), "nir".to_string()])
        .unwrap()
}

pub(crate) fn stack_5x5() -> RasterStack {
    RasterStack::new(Box::new(two_band_raster()))
}
