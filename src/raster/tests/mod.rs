//! Tests for the raster module

mod grid_tests;
mod window_tests;
