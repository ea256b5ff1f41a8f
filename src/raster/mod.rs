//! Raster grids and band sources
//!
//! Provides the grid geometry shared by co-registered rasters, the
//! [`RasterSource`] trait with in-memory and GeoTIFF implementations, and the
//! [`RasterStack`] the extractor samples from.

pub mod grid;
pub mod window;
pub mod source;
pub mod memory;
pub mod geotiff;
pub mod stack;

#[cfg(test)]
mod tests;

pub use grid::GridSpec;
pub use window::Window;
pub use source::{BandBlock, RasterSource};
pub use memory::MemoryRaster;
pub use geotiff::GeoTiffRaster;
pub use stack::RasterStack;
