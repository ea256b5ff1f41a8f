//! Co-registered stack of raster sources

use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{SampleError, SampleResult};
use crate::raster::geotiff::GeoTiffRaster;
use crate::raster::grid::GridSpec;
use crate::raster::source::{is_missing, BandBlock, RasterSource};
use crate::raster::window::Window;

/// Ordered bands drawn from one or more sources sharing one grid
///
/// Every source pushed onto the stack is checked against the grid of the
/// first one, so a stack is co-registered by construction.
pub struct RasterStack {
    sources: Vec<Box<dyn RasterSource>>,
    grid: GridSpec,
}

impl RasterStack {
    /// Creates a stack from its first source
    pub fn new(first: Box<dyn RasterSource>) -> Self {
        let grid = first.grid().clone();
        RasterStack {
            sources: vec![first],
            grid,
        }
    }

    /// Creates a stack from several sources, failing on the first misaligned one
    pub fn from_sources(sources: Vec<Box<dyn RasterSource>>) -> SampleResult<Self> {
        let mut sources = sources.into_iter();
        let first = sources
            .next()
            .ok_or_else(|| SampleError::InvalidRaster("a raster stack needs at least one source".to_string()))?;

        let mut stack = RasterStack::new(first);
        for source in sources {
            stack.push(source)?;
        }
        Ok(stack)
    }

    /// Opens GeoTIFF files and stacks them in the given order
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> SampleResult<Self> {
        let sources = paths
            .iter()
            .map(|path| GeoTiffRaster::open(path).map(|raster| Box::new(raster) as Box<dyn RasterSource>))
            .collect::<SampleResult<Vec<_>>>()?;

        let stack = Self::from_sources(sources)?;
        info!("Stacked {} bands from {} rasters on {}", stack.band_count(), stack.source_count(), stack.grid);
        Ok(stack)
    }

    /// Appends a source, rejecting it with `ShapeMismatch` if it is not co-registered
    pub fn push(&mut self, source: Box<dyn RasterSource>) -> SampleResult<()> {
        let context = format!("raster '{}' against stack", source.name());
        self.grid.ensure_aligned(source.grid(), &context)?;
        debug!("Adding {} band(s) from {}", source.band_count(), source.name());
        self.sources.push(source);
        Ok(())
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Total number of bands across all sources
    pub fn band_count(&self) -> usize {
        self.sources.iter().map(|source| source.band_count()).sum()
    }

    /// Concatenated band names, made unique by suffixing repeats
    pub fn band_names(&self) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        self.sources
            .iter()
            .flat_map(|source| source.band_names())
            .map(|name| {
                let count = seen.entry(name.clone()).or_insert(0);
                *count += 1;
                if *count == 1 { name } else { format!("{}_{}", name, count) }
            })
            .collect()
    }

    /// Nodata sentinel of each band, in stack order
    pub fn nodata(&self) -> Vec<Option<f64>> {
        self.sources
            .iter()
            .flat_map(|source| (0..source.band_count()).map(move |band| source.nodata(band)))
            .collect()
    }

    /// Reads every band of every source over a window
    ///
    /// # Arguments
    /// * `window` - Cells to read, inside the grid
    ///
    /// # Returns
    /// One block whose bands are in stack order
    pub fn read_block(&mut self, window: Window) -> SampleResult<BandBlock> {
        let mut bands = Vec::with_capacity(self.band_count());
        for source in self.sources.iter_mut() {
            bands.extend(source.read_window(window)?.bands);
        }
        Ok(BandBlock { window, bands })
    }

    /// Reads a window and converts nodata and NaN cells to `None`
    pub fn read_masked(&mut self, window: Window) -> SampleResult<Vec<Vec<Option<f64>>>> {
        let nodata = self.nodata();
        let block = self.read_block(window)?;
        Ok(block
            .bands
            .into_iter()
            .zip(nodata)
            .map(|(values, sentinel)| {
                values
                    .into_iter()
                    .map(|v| if is_missing(v, sentinel) { None } else { Some(v) })
                    .collect()
            })
            .collect())
    }
}
