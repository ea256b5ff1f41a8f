//! The raster source abstraction
//!
//! A source is anything that can describe its grid and hand out the values
//! of all its bands over a window. The stack and the extractor only talk to
//! sources through this trait.

use crate::error::SampleResult;
use crate::raster::grid::GridSpec;
use crate::raster::window::Window;

/// Values of every band of one source over one window
#[derive(Debug, Clone, PartialEq)]
pub struct BandBlock {
    /// The window the values cover
    pub window: Window,
    /// One row-major buffer of `window.len()` values per band
    pub bands: Vec<Vec<f64>>,
}

impl BandBlock {
    /// Value of `band` at grid cell (row, col), `None` outside the window
    pub fn value(&self, band: usize, row: usize, col: usize) -> Option<f64> {
        let offset = self.window.offset_of(row, col)?;
        self.bands.get(band).map(|values| values[offset])
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }
}

/// A georeferenced, multi-band raster that can be read window by window
pub trait RasterSource: Send {
    /// Identifier used in logs and in default band names
    fn name(&self) -> &str;

    fn grid(&self) -> &GridSpec;

    fn band_count(&self) -> usize;

    /// Band names, one per band
    fn band_names(&self) -> Vec<String>;

    /// Nodata sentinel of a band
    fn nodata(&self, band: usize) -> Option<f64>;

    /// Reads all bands over a window
    ///
    /// The window must lie inside the grid.
    fn read_window(&mut self, window: Window) -> SampleResult<BandBlock>;
}

/// Whether a sampled value counts as missing
pub fn is_missing(value: f64, nodata: Option<f64>) -> bool {
    if value.is_nan() {
        return true;
    }
    match nodata {
        Some(sentinel) if sentinel.is_nan() => false,
        Some(sentinel) => value == sentinel,
        None => false,
    }
}

/// Default band names for a source without descriptions
pub fn default_band_names(stem: &str, band_count: usize) -> Vec<String> {
    if band_count == 1 {
        vec![stem.to_string()]
    } else {
        (1..=band_count).map(|band| format!("{}_{}", stem, band)).collect()
    }
}
