//! Human-readable names for TIFF tags and codes, used in logs and raster info output

use std::collections::HashMap;
use lazy_static::lazy_static;

use crate::tiff::constants::{compression, tags};

lazy_static! {
    static ref TAG_NAMES: HashMap<u16, &'static str> = {
        let mut m = HashMap::new();
        m.insert(tags::NEW_SUBFILE_TYPE, "NewSubfileType");
        m.insert(tags::IMAGE_WIDTH, "ImageWidth");
        m.insert(tags::IMAGE_LENGTH, "ImageLength");
        m.insert(tags::BITS_PER_SAMPLE, "BitsPerSample");
        m.insert(tags::COMPRESSION, "Compression");
        m.insert(tags::PHOTOMETRIC_INTERPRETATION, "PhotometricInterpretation");
        m.insert(tags::STRIP_OFFSETS, "StripOffsets");
        m.insert(tags::SAMPLES_PER_PIXEL, "SamplesPerPixel");
        m.insert(tags::ROWS_PER_STRIP, "RowsPerStrip");
        m.insert(tags::STRIP_BYTE_COUNTS, "StripByteCounts");
        m.insert(tags::PLANAR_CONFIGURATION, "PlanarConfiguration");
        m.insert(tags::PREDICTOR, "Predictor");
        m.insert(tags::TILE_WIDTH, "TileWidth");
        m.insert(tags::TILE_LENGTH, "TileLength");
        m.insert(tags::TILE_OFFSETS, "TileOffsets");
        m.insert(tags::TILE_BYTE_COUNTS, "TileByteCounts");
        m.insert(tags::SAMPLE_FORMAT, "SampleFormat");
        m.insert(tags::MODEL_PIXEL_SCALE_TAG, "ModelPixelScaleTag");
        m.insert(tags::MODEL_TIEPOINT_TAG, "ModelTiepointTag");
        m.insert(tags::MODEL_TRANSFORMATION_TAG, "ModelTransformationTag");
        m.insert(tags::GEO_KEY_DIRECTORY_TAG, "GeoKeyDirectoryTag");
        m.insert(tags::GEO_DOUBLE_PARAMS_TAG, "GeoDoubleParamsTag");
        m.insert(tags::GEO_ASCII_PARAMS_TAG, "GeoAsciiParamsTag");
        m.insert(tags::GDAL_METADATA, "GDAL_METADATA");
        m.insert(tags::GDAL_NODATA, "GDAL_NODATA");
        m
    };
}

/// Name of a TIFF tag, or "Unknown"
pub fn tag_name(tag: u16) -> &'static str {
    TAG_NAMES.get(&tag).copied().unwrap_or("Unknown")
}

/// Name of a compression code
pub fn compression_name(code: u64) -> &'static str {
    match code {
        compression::NONE => "Uncompressed",
        compression::DEFLATE | compression::DEFLATE_OBSOLETE => "Adobe Deflate",
        compression::ZSTD => "ZSTD",
        5 => "LZW",
        7 => "JPEG",
        32773 => "PackBits",
        _ => "Unknown",
    }
}
