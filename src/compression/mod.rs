//! Compression handling for TIFF strips and tiles
//!
//! Each supported compression scheme is a strategy behind the
//! [`CompressionHandler`] trait; [`CompressionFactory`] picks one from the
//! Compression tag or from a name given in configuration. Predictors are
//! undone separately, after decompression.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod zstd;
mod predictor;

#[cfg(test)]
mod tests;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::AdobeDeflateHandler;
pub use factory::CompressionFactory;
pub use zstd::ZstdHandler;
pub use predictor::{apply_horizontal_differencing, undo_predictor};
