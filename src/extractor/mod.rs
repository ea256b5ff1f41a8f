//! Pixel extraction from raster stacks
//!
//! This module samples the bands of a [`RasterStack`](crate::raster::RasterStack)
//! under vector geometries or a labelled raster, using one sampling strategy
//! per geometry kind.

mod options;
mod strategy;
mod point;
mod polygon;
mod line;
mod engine;
mod result;
mod table;
mod masked;
mod labelled;

#[cfg(test)]
mod tests;

// Public exports
pub use options::{ExtractOptions, OutputMode, DEFAULT_BLOCK_ROWS};
pub use strategy::{strategy_for, CellHit, GeometryPlan, SamplingStrategy};
pub use point::PointStrategy;
pub use polygon::PolygonStrategy;
pub use line::LineStrategy;
pub use result::{ExtractionResult, ExtractionWarning};
pub use table::{ExtractionTable, SampleRow};
pub use masked::{Masked, MaskedArrays};
pub use labelled::{LabelledRow, LabelledTable};

// Facade over the strategies
pub use engine::Extractor;
