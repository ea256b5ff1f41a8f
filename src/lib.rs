pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod coordinate;
pub mod raster;
pub mod geometry;
pub mod extractor;
pub mod config;
pub mod error;
pub mod commands;
pub mod api;

pub use crate::api::RasterSample;

pub use error::{SampleError, SampleResult};
pub use coordinate::{BoundingBox, GeoTransform};
pub use raster::{GeoTiffRaster, GridSpec, MemoryRaster, RasterSource, RasterStack, Window};
pub use geometry::{GeometryKind, GeometrySet};
pub use extractor::{
    ExtractOptions, ExtractionResult, ExtractionTable, ExtractionWarning, Extractor, LabelledTable, MaskedArrays,
    OutputMode,
};
pub use config::{ExtractConfig, OutputFormat};
