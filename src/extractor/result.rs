//! Extraction results and warnings

use serde::Serialize;
use std::fmt;

use super::masked::MaskedArrays;
use super::table::ExtractionTable;

/// Non-fatal condition met during an extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionWarning {
    /// A geometry reaches outside the raster extent
    OutOfExtent {
        geometry_index: usize,
        /// No in-extent cell was sampled for the geometry
        fully: bool,
    },
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::OutOfExtent { geometry_index, fully: true } => {
                write!(f, "geometry {} lies outside the raster extent", geometry_index)
            }
            ExtractionWarning::OutOfExtent { geometry_index, fully: false } => {
                write!(f, "geometry {} lies partly outside the raster extent", geometry_index)
            }
        }
    }
}

/// Outcome of [`Extractor::extract`](super::Extractor::extract), shaped by the output mode
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    Table(ExtractionTable),
    Arrays(MaskedArrays),
}

impl ExtractionResult {
    /// Table form, converting array results
    pub fn into_table(self) -> ExtractionTable {
        match self {
            ExtractionResult::Table(table) => table,
            ExtractionResult::Arrays(arrays) => arrays.to_table(),
        }
    }

    /// Array form, converting table results
    pub fn into_arrays(self) -> MaskedArrays {
        match self {
            ExtractionResult::Table(table) => table.to_arrays(),
            ExtractionResult::Arrays(arrays) => arrays,
        }
    }

    pub fn warnings(&self) -> &[ExtractionWarning] {
        match self {
            ExtractionResult::Table(table) => &table.warnings,
            ExtractionResult::Arrays(arrays) => &arrays.warnings,
        }
    }

    /// Number of sampled rows
    pub fn len(&self) -> usize {
        match self {
            ExtractionResult::Table(table) => table.len(),
            ExtractionResult::Arrays(arrays) => arrays.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
