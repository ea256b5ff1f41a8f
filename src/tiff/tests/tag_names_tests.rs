//! Tests for tag name lookup

extern crate std;

use crate::tiff::tag_names::{compression_name, tag_name};

#[test]
fn known_and_unknown_tags() {
    std::assert_eq!(tag_name(256), "ImageWidth");
    std::assert_eq!(tag_name(42113), "GDAL_NODATA");
    std::assert_eq!(tag_name(1), "Unknown");
    std::assert_eq!(compression_name(14), "ZSTD");
    std::assert_eq!(compression_name(32946), "Adobe Deflate");
}
