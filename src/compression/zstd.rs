//! Handler for ZSTD compressed chunks

use log::trace;

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// ZSTD handler (code 14)
pub struct ZstdHandler {
    /// Compression level, 1 to 22
    level: i32,
}

impl ZstdHandler {
    /// Handler with the zstd default level
    pub fn new() -> Self {
        ZstdHandler { level: 3 }
    }
}

impl Default for ZstdHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for ZstdHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let decoded = zstd::decode_all(data)
            .map_err(|e| TiffError::GenericError(format!("ZSTD decompression error: {}", e)))?;
        trace!("ZSTD chunk: {} -> {} bytes (expected {})", data.len(), decoded.len(), expected_len);
        Ok(decoded)
    }

    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        zstd::encode_all(data, self.level)
            .map_err(|e| TiffError::GenericError(format!("ZSTD compression error: {}", e)))
    }

    fn name(&self) -> &'static str {
        "ZSTD"
    }

    fn code(&self) -> u64 {
        compression::ZSTD
    }
}
