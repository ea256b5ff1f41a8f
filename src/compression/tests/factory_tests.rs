//! Tests for the compression factory and handlers

extern crate std;

use crate::compression::CompressionFactory;
use crate::tiff::constants::compression;
use crate::tiff::errors::TiffError;

#[test]
fn codes_resolve_to_handlers() {
    std::assert_eq!(CompressionFactory::create_handler(1).unwrap().name(), "Uncompressed");
    std::assert_eq!(CompressionFactory::create_handler(32946).unwrap().code(), compression::DEFLATE);
    std::assert_eq!(CompressionFactory::handler_by_name("ZSTD").unwrap().code(), 14);
    std::assert!(matches!(
        CompressionFactory::create_handler(5),
        Err(TiffError::UnsupportedCompression(5))
    ));
    std::assert!(CompressionFactory::handler_by_name("lzw").is_err());
}

#[test]
fn compressing_handlers_restore_input() {
    let data: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
    for name in ["deflate", "zstd"] {
        let handler = CompressionFactory::handler_by_name(name).unwrap();
        let packed = handler.compress(&data).unwrap();
        std::assert!(packed.len() < data.len(), "{} did not shrink repetitive data", name);
        std::assert_eq!(handler.decompress(&packed, data.len()).unwrap(), data);
    }
}
