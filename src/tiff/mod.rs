//! TIFF/GeoTIFF file format support
//!
//! This module reads TIFF and BigTIFF directories in either byte order,
//! decodes GeoTIFF georeferencing and GDAL metadata, and writes
//! little-endian GeoTIFFs.

pub mod errors;
pub mod ifd;
pub(crate) mod types;
pub mod reader;
pub mod geo;
pub mod sample;
pub mod writer;
pub(crate) mod constants;
pub(crate) mod tag_names;
#[cfg(test)]
pub(crate) mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{TiffError, TiffResult};
pub use geo::GeoInfo;
pub use ifd::{IFD, IFDEntry};
pub use reader::TiffReader;
pub use sample::SampleType;
pub use types::TIFF;
pub use writer::{ChunkLayout, GeoTiffWriter};
