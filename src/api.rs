use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::config::OutputFormat;
use crate::error::{SampleError, SampleResult};
use crate::extractor::{ExtractOptions, ExtractionResult, ExtractionTable, Extractor, LabelledTable};
use crate::geometry::{read_geojson, GeometrySet};
use crate::raster::{GeoTiffRaster, GridSpec, RasterSource, RasterStack};
use crate::tiff::{GeoTiffWriter, SampleType};

/// Main interface to the rastersample library
///
/// Wraps file handling around the [`Extractor`]: opening GeoTIFF stacks,
/// loading GeoJSON geometries and writing tables or rasters.
#[derive(Debug, Clone, Default)]
pub struct RasterSample {
    extractor: Extractor,
}

impl RasterSample {
    /// Create a new instance with the given extraction options
    pub fn new(options: ExtractOptions) -> Self {
        RasterSample {
            extractor: Extractor::new(options),
        }
    }

    /// Opens GeoTIFF files as one co-registered stack
    pub fn open_stack<P: AsRef<Path>>(&self, rasters: &[P]) -> SampleResult<RasterStack> {
        RasterStack::open(rasters)
    }

    /// Loads a geometry set from a GeoJSON file
    pub fn load_geometries<P: AsRef<Path>>(&self, path: P) -> SampleResult<GeometrySet> {
        read_geojson(path)
    }

    /// Samples raster files under the geometries of a GeoJSON file
    ///
    /// # Arguments
    /// * `rasters` - GeoTIFF files forming the stack, in band order
    /// * `vector` - GeoJSON file with points, polygons or line strings
    ///
    /// # Returns
    /// The extraction result together with the geometries, for attribute joins
    pub fn extract<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        rasters: &[P],
        vector: Q,
    ) -> SampleResult<(ExtractionResult, GeometrySet)> {
        let mut stack = self.open_stack(rasters)?;
        let geometries = self.load_geometries(vector)?;
        let result = self.extractor.extract(&mut stack, &geometries)?;
        Ok((result, geometries))
    }

    /// Samples raster files under the labelled pixels of a label GeoTIFF
    pub fn extract_labels<P: AsRef<Path>, Q: AsRef<Path>>(&self, rasters: &[P], labels: Q) -> SampleResult<LabelledTable> {
        let mut stack = self.open_stack(rasters)?;
        let mut label_raster = GeoTiffRaster::open(labels)?;
        self.extractor.extract_from_raster(&mut stack, &mut label_raster)
    }

    /// Human-readable summary of a GeoTIFF: grid, layout and bands
    pub fn describe<P: AsRef<Path>>(&self, raster: P) -> SampleResult<String> {
        let raster = GeoTiffRaster::open(raster)?;
        let grid = raster.grid();
        let mut result = String::new();

        let _ = writeln!(result, "Raster: {}", raster.path().display());
        let _ = writeln!(result, "  Size: {}x{}", grid.width, grid.height);
        let _ = writeln!(result, "  Transform: {}", grid.transform);
        match grid.epsg {
            Some(code) => { let _ = writeln!(result, "  CRS: EPSG:{}", code); }
            None => { let _ = writeln!(result, "  CRS: unknown"); }
        }
        let extent = grid.extent();
        let _ = writeln!(result, "  Extent: ({}, {}) - ({}, {})", extent.min_x, extent.min_y, extent.max_x, extent.max_y);
        let _ = writeln!(result, "  Layout: {}, {} compression, {} samples",
                         if raster.is_tiled() { "tiled" } else { "stripped" },
                         raster.compression_name(),
                         raster.sample_type());
        let _ = writeln!(result, "  Bands: {}", raster.band_count());
        for (band, name) in raster.band_names().iter().enumerate() {
            let nodata = raster.nodata(band).map(|v| v.to_string()).unwrap_or_else(|| "none".to_string());
            let _ = writeln!(result, "    {}: {} (nodata {})", band + 1, name, nodata);
        }

        Ok(result)
    }

    /// Writes an extraction table in the given format
    pub fn write_table<P: AsRef<Path>>(&self, table: &ExtractionTable, path: P, format: OutputFormat) -> SampleResult<()> {
        let path = path.as_ref();
        info!("Writing {} rows as {} to {}", table.len(), format, path.display());

        let mut writer = create_output(path)?;
        match format {
            OutputFormat::Csv => table.write_csv(&mut writer)?,
            OutputFormat::Json => table.write_json(&mut writer)?,
            OutputFormat::GeoJson => table.write_geojson(&mut writer)?,
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes a labelled table as CSV or JSON
    pub fn write_labelled<P: AsRef<Path>>(&self, table: &LabelledTable, path: P, format: OutputFormat) -> SampleResult<()> {
        let path = path.as_ref();
        info!("Writing {} labelled rows as {} to {}", table.len(), format, path.display());

        let mut writer = create_output(path)?;
        match format {
            OutputFormat::Csv => table.write_csv(&mut writer)?,
            OutputFormat::Json => table.write_json(&mut writer)?,
            OutputFormat::GeoJson => {
                return Err(SampleError::Config("labelled tables are written as csv or json".to_string()));
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes a predicted surface as a single-band float GeoTIFF on a grid
    ///
    /// # Arguments
    /// * `path` - Output file
    /// * `grid` - Grid of the surface, usually the stack's
    /// * `values` - Row-major values, NaN for cells without a prediction
    pub fn write_surface<P: AsRef<Path>>(&self, path: P, grid: &GridSpec, values: Vec<f64>) -> SampleResult<()> {
        let path = path.as_ref();
        GeoTiffWriter::new(SampleType::F32)
            .with_compression("deflate")
            .and_then(|writer| {
                writer
                    .with_nodata(Some(f64::NAN))
                    .with_epsg(grid.epsg)
                    .write(path, grid.width, grid.height, &grid.transform, &[values])
            })
            .map_err(|e| SampleError::resource(path, e))
    }
}

fn create_output(path: &Path) -> SampleResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| SampleError::resource(path, e))?;
    Ok(BufWriter::new(file))
}
