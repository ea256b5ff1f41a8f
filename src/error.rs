//! Error types for raster sampling
//!
//! Structural problems (misaligned grids, unsupported geometry kinds) are
//! fatal and surface here. Partially out-of-extent geometries are not errors;
//! they are reported as [`crate::extractor::ExtractionWarning`]s on the result.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::tiff::errors::TiffError;

#[derive(Debug, Error)]
pub enum SampleError {
    /// Two grids that must be co-registered are not
    #[error("Grid mismatch ({context}): expected {expected}, found {found}")]
    ShapeMismatch {
        context: String,
        expected: String,
        found: String,
    },

    /// Mixed or unknown geometry kind in a geometry set
    #[error("Unsupported geometry at index {index}: {reason}")]
    UnsupportedGeometry { index: usize, reason: String },

    /// Strict mode extraction produced no in-extent sample
    #[error("Extraction produced no samples inside the raster extent")]
    EmptyResult,

    /// A raster or vector source could not be opened or decoded
    #[error("Cannot read {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Raster description that cannot be used (bad buffer size, singular transform, ...)
    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    /// Vector input that cannot be parsed
    #[error("Invalid vector data in {source_name}: {reason}")]
    InvalidVector { source_name: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SampleError {
    /// Wrap a decoder or I/O error with the path of the file being read
    pub fn resource(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        SampleError::Resource {
            path: path.into(),
            source: source.into(),
        }
    }

    /// The decoder error behind a `Resource` error, if any
    pub fn tiff_error(&self) -> Option<&TiffError> {
        match self {
            SampleError::Resource { source, .. } => source.downcast_ref::<TiffError>(),
            _ => None,
        }
    }

    /// Build a grid mismatch error from two displayable descriptions
    pub fn shape_mismatch(
        context: impl Into<String>,
        expected: impl std::fmt::Display,
        found: impl std::fmt::Display,
    ) -> Self {
        SampleError::ShapeMismatch {
            context: context.into(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

pub type SampleResult<T> = std::result::Result<T, SampleError>;
