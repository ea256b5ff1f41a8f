//! In-memory raster source

use crate::error::{SampleError, SampleResult};
use crate::raster::grid::GridSpec;
use crate::raster::source::{default_band_names, BandBlock, RasterSource};
use crate::raster::window::Window;

/// Raster whose bands are held as row-major `f64` buffers
#[derive(Debug, Clone)]
pub struct MemoryRaster {
    name: String,
    grid: GridSpec,
    bands: Vec<Vec<f64>>,
    band_names: Vec<String>,
    nodata: Vec<Option<f64>>,
}

impl MemoryRaster {
    /// Creates a raster, checking every band holds `width * height` values
    pub fn new(name: impl Into<String>, grid: GridSpec, bands: Vec<Vec<f64>>) -> SampleResult<Self> {
        let name = name.into();
        if bands.is_empty() {
            return Err(SampleError::InvalidRaster(format!("{}: a raster needs at least one band", name)));
        }

        let expected = grid.width * grid.height;
        if let Some((band, values)) = bands.iter().enumerate().find(|(_, v)| v.len() != expected) {
            return Err(SampleError::InvalidRaster(format!(
                "{}: band {} holds {} values, grid needs {}", name, band, values.len(), expected)));
        }

        let band_names = default_band_names(&name, bands.len());
        let nodata = vec![None; bands.len()];
        Ok(MemoryRaster { name, grid, bands, band_names, nodata })
    }

    /// Replaces the default band names
    pub fn with_band_names(mut self, names: Vec<String>) -> SampleResult<Self> {
        if names.len() != self.bands.len() {
            return Err(SampleError::InvalidRaster(format!(
                "{}: {} band names given for {} bands", self.name, names.len(), self.bands.len())));
        }
        self.band_names = names;
        Ok(self)
    }

    /// Sets the same nodata sentinel on every band
    pub fn with_nodata(mut self, nodata: Option<f64>) -> Self {
        self.nodata = vec![nodata; self.bands.len()];
        self
    }

    /// Sets the nodata sentinel of a single band
    pub fn with_band_nodata(mut self, band: usize, nodata: Option<f64>) -> Self {
        if let Some(slot) = self.nodata.get_mut(band) {
            *slot = nodata;
        }
        self
    }

    pub fn bands(&self) -> &[Vec<f64>] {
        &self.bands
    }
}

impl RasterSource for MemoryRaster {
    fn name(&self) -> &str {
        &self.name
    }

    fn grid(&self) -> &GridSpec {
        &self.grid
    }

    fn band_count(&self) -> usize {
        self.bands.len()
    }

    fn band_names(&self) -> Vec<String> {
        self.band_names.clone()
    }

    fn nodata(&self, band: usize) -> Option<f64> {
        self.nodata.get(band).copied().flatten()
    }

    fn read_window(&mut self, window: Window) -> SampleResult<BandBlock> {
        if window.end_col() > self.grid.width || window.end_row() > self.grid.height {
            return Err(SampleError::InvalidRaster(format!(
                "{}: window {:?} exceeds the {}x{} grid", self.name, window, self.grid.width, self.grid.height)));
        }

        let width = self.grid.width;
        let bands = self.bands.iter().map(|band| {
            let mut values = Vec::with_capacity(window.len());
            for row in window.row..window.end_row() {
                let start = row * width + window.col;
                values.extend_from_slice(&band[start..start + window.width]);
            }
            values
        }).collect();

        Ok(BandBlock { window, bands })
    }
}
