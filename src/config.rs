//! TOML configuration for extraction runs
//!
//! ```toml
//! [extraction]
//! block_rows = 128
//! strict = true
//! mode = "arrays"
//!
//! [output]
//! format = "geojson"
//! ```
//!
//! Missing keys and sections fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::error::{SampleError, SampleResult};
use crate::extractor::{ExtractOptions, OutputMode, DEFAULT_BLOCK_ROWS};

/// File format of a written table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    GeoJson,
}

impl OutputFormat {
    /// Format implied by a file extension, if any
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        extension.parse().ok()
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "geojson" => Ok(OutputFormat::GeoJson),
            other => Err(format!("Unknown output format '{}', expected csv, json or geojson", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::GeoJson => write!(f, "geojson"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSection {
    pub block_rows: usize,
    pub strict: bool,
    pub mode: OutputMode,
}

impl Default for ExtractionSection {
    fn default() -> Self {
        ExtractionSection {
            block_rows: DEFAULT_BLOCK_ROWS,
            strict: false,
            mode: OutputMode::Table,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// `None` lets the output file extension decide
    pub format: Option<OutputFormat>,
}

/// Settings read from a configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub extraction: ExtractionSection,
    pub output: OutputSection,
}

impl ExtractConfig {
    /// Loads a configuration file
    ///
    /// # Arguments
    /// * `path` - Path of the TOML file
    ///
    /// # Returns
    /// The parsed configuration or a `Config` error naming the file
    pub fn load<P: AsRef<Path>>(path: P) -> SampleResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SampleError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let config = Self::parse(&content)
            .map_err(|e| SampleError::Config(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Parses configuration text
    pub fn parse(content: &str) -> SampleResult<Self> {
        toml::from_str(content).map_err(|e| SampleError::Config(e.to_string()))
    }

    /// Extraction options described by the file
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::default()
            .with_block_rows(self.extraction.block_rows)
            .with_strict(self.extraction.strict)
            .with_mode(self.extraction.mode)
    }
}
