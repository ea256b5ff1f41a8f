//! The extraction engine
//!
//! Extraction runs in two passes. First every geometry is planned: its
//! target cells are computed from the grid alone. Then the stack is read in
//! row blocks, only over the rows and columns that some target needs, and
//! the values are written into the planned rows.

use std::collections::BTreeMap;

use geo::Point;
use log::{debug, info, warn};

use super::labelled::{LabelledRow, LabelledTable};
use super::options::{ExtractOptions, OutputMode};
use super::result::{ExtractionResult, ExtractionWarning};
use super::strategy::{strategy_for, CellHit};
use super::table::{ExtractionTable, SampleRow};
use crate::error::{SampleError, SampleResult};
use crate::geometry::GeometrySet;
use crate::raster::source::is_missing;
use crate::raster::{RasterSource, RasterStack, Window};
use crate::utils::progress::ProgressTracker;

/// A planned cell read: the output row it fills and its grid position
#[derive(Debug, Clone, Copy)]
struct Target {
    output_row: usize,
    row: usize,
    col: usize,
}

/// Samples raster stacks under geometries or labelled rasters
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Extractor { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Samples the stack under every geometry of a set
    ///
    /// # Arguments
    /// * `stack` - Co-registered bands to sample
    /// * `geometries` - Points, polygons or line strings in the stack's CRS
    ///
    /// # Returns
    /// A table or masked arrays depending on the output mode. Fails with
    /// `EmptyResult` in strict mode when no sample lies inside the raster.
    pub fn extract(&self, stack: &mut RasterStack, geometries: &GeometrySet) -> SampleResult<ExtractionResult> {
        info!("Extracting {} {} geometries from {} bands", geometries.len(), geometries.kind(), stack.band_count());

        let grid = stack.grid().clone();
        let band_count = stack.band_count();
        let strategy = strategy_for(geometries);
        let progress = ProgressTracker::maybe(self.options.show_progress, strategy.len() as u64, "Planning cells");

        let mut rows: Vec<SampleRow> = Vec::new();
        let mut targets: Vec<Target> = Vec::new();
        let mut warnings = Vec::new();

        for geometry_index in 0..strategy.len() {
            let plan = strategy.plan(&grid, geometry_index);

            if let Some(fully) = plan.out_of_extent {
                let warning = ExtractionWarning::OutOfExtent { geometry_index, fully };
                warn!("{}", warning);
                warnings.push(warning);
            }

            for (pixel_index, hit) in plan.hits.into_iter().enumerate() {
                let (location, in_extent) = match hit {
                    CellHit::Cell { row, col } => {
                        targets.push(Target { output_row: rows.len(), row, col });
                        (Point::from(grid.cell_center(row, col)), true)
                    }
                    CellHit::OutOfExtent(coord) => (Point::from(coord), false),
                };

                rows.push(SampleRow {
                    geometry_index,
                    pixel_index,
                    location,
                    values: vec![None; band_count],
                    in_extent,
                });
            }
            progress.increment(1);
        }
        progress.finish();

        debug!("Planned {} rows, {} cells to read", rows.len(), targets.len());
        self.fill_values(stack, &mut rows, &targets)?;

        if self.options.strict && targets.is_empty() {
            return Err(SampleError::EmptyResult);
        }

        let table = ExtractionTable {
            band_names: stack.band_names(),
            rows,
            warnings,
        };
        info!("Extracted {} rows ({} warnings)", table.len(), table.warnings.len());

        Ok(match self.options.mode {
            OutputMode::Table => ExtractionResult::Table(table),
            OutputMode::Arrays => ExtractionResult::Arrays(table.to_arrays()),
        })
    }

    /// Reads the planned cells block by block
    fn fill_values(&self, stack: &mut RasterStack, rows: &mut [SampleRow], targets: &[Target]) -> SampleResult<()> {
        let block_rows = self.options.block_rows.max(1);

        let mut blocks: BTreeMap<usize, Vec<Target>> = BTreeMap::new();
        for target in targets {
            blocks.entry(target.row / block_rows).or_default().push(*target);
        }

        for (block, block_targets) in blocks {
            let Some(window) = covering_window(&block_targets) else {
                continue;
            };
            debug!("Reading block {} as {:?}", block, window);

            let masked = stack.read_masked(window)?;
            for target in block_targets {
                let Some(offset) = window.offset_of(target.row, target.col) else {
                    continue;
                };
                let values = &mut rows[target.output_row].values;
                for (band, band_values) in masked.iter().enumerate() {
                    values[band] = band_values[offset];
                }
            }
        }
        Ok(())
    }

    /// Samples the stack under every labelled pixel of a label raster
    ///
    /// The first band of `labels` supplies the labels. Pixels whose label is
    /// nodata or NaN are skipped.
    ///
    /// # Arguments
    /// * `stack` - Co-registered bands to sample
    /// * `labels` - Label raster on the same grid as the stack
    ///
    /// # Returns
    /// One row per labelled pixel, in row-major order
    pub fn extract_from_raster(
        &self,
        stack: &mut RasterStack,
        labels: &mut dyn RasterSource,
    ) -> SampleResult<LabelledTable> {
        stack.grid().ensure_aligned(labels.grid(), "label raster")?;
        if labels.band_count() == 0 {
            return Err(SampleError::InvalidRaster(format!("label raster '{}' has no bands", labels.name())));
        }

        info!("Sampling {} bands under labels from {}", stack.band_count(), labels.name());
        let grid = stack.grid().clone();
        let label_nodata = labels.nodata(0);
        let block_rows = self.options.block_rows.max(1);
        let mut rows = Vec::new();

        let mut start = 0;
        while start < grid.height {
            let height = block_rows.min(grid.height - start);
            let strip = Window::new(0, start, grid.width, height);
            start += height;

            let block = labels.read_window(strip)?;
            let labelled: Vec<Target> = (strip.row..strip.end_row())
                .flat_map(|row| (0..grid.width).map(move |col| (row, col)))
                .filter_map(|(row, col)| {
                    let label = block.value(0, row, col)?;
                    if is_missing(label, label_nodata) {
                        None
                    } else {
                        Some(Target { output_row: 0, row, col })
                    }
                })
                .collect();

            let Some(window) = covering_window(&labelled) else {
                continue;
            };
            let masked = stack.read_masked(window)?;

            for target in labelled {
                let (Some(label), Some(offset)) = (
                    block.value(0, target.row, target.col),
                    window.offset_of(target.row, target.col),
                ) else {
                    continue;
                };
                rows.push(LabelledRow {
                    label,
                    row: target.row,
                    col: target.col,
                    location: Point::from(grid.cell_center(target.row, target.col)),
                    values: masked.iter().map(|band| band[offset]).collect(),
                });
            }
        }

        if self.options.strict && rows.is_empty() {
            return Err(SampleError::EmptyResult);
        }

        info!("Extracted {} labelled pixels", rows.len());
        Ok(LabelledTable {
            band_names: stack.band_names(),
            rows,
        })
    }
}

/// Smallest window holding every target cell
fn covering_window(targets: &[Target]) -> Option<Window> {
    let first = targets.first()?;
    let (mut min_row, mut max_row, mut min_col, mut max_col) = (first.row, first.row, first.col, first.col);
    for target in targets {
        min_row = min_row.min(target.row);
        max_row = max_row.max(target.row);
        min_col = min_col.min(target.col);
        max_col = max_col.max(target.col);
    }
    Some(Window::new(min_col, min_row, max_col - min_col + 1, max_row - min_row + 1))
}
