//! Compression handler trait definition

use crate::tiff::errors::TiffResult;

/// Strategy for one TIFF compression scheme
pub trait CompressionHandler: Send + Sync {
    /// Decompress one strip or tile
    ///
    /// `expected_len` is the decoded size implied by the image layout; it is
    /// a capacity hint, the caller validates the actual length.
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>>;

    /// Compress one strip or tile
    fn compress(&self, data: &[u8]) -> TiffResult<Vec<u8>>;

    /// Human-readable name of the scheme
    fn name(&self) -> &'static str;

    /// Value written to the Compression tag
    fn code(&self) -> u64;
}
