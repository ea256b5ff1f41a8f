//! Extraction settings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of raster rows read per block unless configured otherwise
pub const DEFAULT_BLOCK_ROWS: usize = 256;

/// Shape of the extraction result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// One row per sampled pixel
    #[default]
    Table,
    /// Parallel masked sequences
    Arrays,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputMode::Table),
            "arrays" | "array" => Ok(OutputMode::Arrays),
            other => Err(format!("Unknown output mode '{}', expected 'table' or 'arrays'", other)),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Table => write!(f, "table"),
            OutputMode::Arrays => write!(f, "arrays"),
        }
    }
}

/// Options controlling a single extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub mode: OutputMode,
    /// Fail with `EmptyResult` when nothing was sampled inside the raster
    pub strict: bool,
    /// Raster rows per streamed block, at least one
    pub block_rows: usize,
    pub show_progress: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            mode: OutputMode::Table,
            strict: false,
            block_rows: DEFAULT_BLOCK_ROWS,
            show_progress: false,
        }
    }
}

impl ExtractOptions {
    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the block height; zero is raised to one
    pub fn with_block_rows(mut self, block_rows: usize) -> Self {
        self.block_rows = block_rows.max(1);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}
