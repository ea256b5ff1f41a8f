//! GeoTIFF-backed raster source
//!
//! Opens a TIFF or BigTIFF file, parses its first full-resolution IFD and
//! georeferencing, and decodes pixel windows on demand. Strips and tiles,
//! chunky and planar layouts are handled by mapping each window onto the
//! chunks it overlaps.

use log::{debug, info, trace};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::compression::{undo_predictor, CompressionFactory, CompressionHandler};
use crate::error::{SampleError, SampleResult};
use crate::raster::grid::GridSpec;
use crate::raster::source::{default_band_names, BandBlock, RasterSource};
use crate::raster::window::Window;
use crate::tiff::constants::{compression, planar_config, predictor, sample_format, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::geo::{read_geo_info, GeoInfo};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::{check_range, TiffReader};
use crate::tiff::sample::SampleType;
use crate::tiff::tag_names::compression_name;

/// How the pixel data of the image is laid out in the file
#[derive(Debug, Clone)]
struct ImageLayout {
    width: usize,
    height: usize,
    samples_per_pixel: usize,
    sample_type: SampleType,
    planar: bool,
    tiled: bool,
    chunk_width: usize,
    chunk_height: usize,
    chunks_across: usize,
    chunks_down: usize,
    offsets: Vec<u64>,
    byte_counts: Vec<u64>,
    predictor: u64,
}

impl ImageLayout {
    fn from_ifd(reader: &mut BufReader<File>, tiff_reader: &TiffReader, ifd: &IFD) -> TiffResult<Self> {
        let (width, height) = ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;
        let (width, height) = (width as usize, height as usize);
        let samples_per_pixel = ifd.get_samples_per_pixel() as usize;
        if width == 0 || height == 0 || samples_per_pixel == 0 {
            return Err(TiffError::MissingDimensions);
        }

        let bits = uniform_value(tiff_reader, reader, ifd, tags::BITS_PER_SAMPLE, 1)?;
        let format = uniform_value(tiff_reader, reader, ifd, tags::SAMPLE_FORMAT, sample_format::UNSIGNED)?;
        let sample_type = SampleType::from_tags(format, bits)?;

        let planar = ifd.get_tag_value(tags::PLANAR_CONFIGURATION).unwrap_or(planar_config::CHUNKY)
            == planar_config::PLANAR;
        let tiled = ifd.is_tiled();

        let (chunk_width, chunk_height, offsets_tag, counts_tag) = if tiled {
            let tile_width = ifd.get_tag_value(tags::TILE_WIDTH).ok_or(TiffError::TagNotFound(tags::TILE_WIDTH))?;
            let tile_height = ifd.get_tag_value(tags::TILE_LENGTH).ok_or(TiffError::TagNotFound(tags::TILE_LENGTH))?;
            (tile_width as usize, tile_height as usize, tags::TILE_OFFSETS, tags::TILE_BYTE_COUNTS)
        } else {
            let rows_per_strip = ifd.get_tag_value(tags::ROWS_PER_STRIP)
                .map(|rows| (rows as usize).min(height))
                .unwrap_or(height);
            (width, rows_per_strip, tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS)
        };
        if chunk_width == 0 || chunk_height == 0 {
            return Err(TiffError::GenericError("Zero-sized strips or tiles".to_string()));
        }

        let chunks_across = width.div_ceil(chunk_width);
        let chunks_down = height.div_ceil(chunk_height);
        let offsets = tiff_reader.read_u64_values(reader, ifd, offsets_tag)?;
        let byte_counts = tiff_reader.read_u64_values(reader, ifd, counts_tag)?;

        let planes = if planar { samples_per_pixel } else { 1 };
        let needed = planes
            .checked_mul(chunks_across)
            .and_then(|n| n.checked_mul(chunks_down))
            .ok_or_else(|| TiffError::GenericError("Chunk count overflows".to_string()))?;
        if offsets.len() < needed || byte_counts.len() < needed {
            return Err(TiffError::GenericError(format!(
                "Expected {} chunks, found {} offsets and {} byte counts", needed, offsets.len(), byte_counts.len())));
        }

        let samples_in_chunk = if planar { 1 } else { samples_per_pixel };
        chunk_width
            .checked_mul(chunk_height)
            .and_then(|n| n.checked_mul(samples_in_chunk))
            .and_then(|n| n.checked_mul(sample_type.byte_width()))
            .ok_or_else(|| TiffError::GenericError(format!(
                "Chunks of {}x{} pixels are too large to decode", chunk_width, chunk_height)))?;

        let file_size = reader.seek(SeekFrom::End(0))?;
        for (index, (&offset, &count)) in offsets.iter().zip(&byte_counts).take(needed).enumerate() {
            check_range(|| format!("Chunk {}", index), offset, count, file_size)?;
        }

        Ok(ImageLayout {
            width,
            height,
            samples_per_pixel,
            sample_type,
            planar,
            tiled,
            chunk_width,
            chunk_height,
            chunks_across,
            chunks_down,
            offsets,
            byte_counts,
            predictor: ifd.get_tag_value(tags::PREDICTOR).unwrap_or(predictor::NONE),
        })
    }

    /// Samples interleaved in one chunk
    fn samples_in_chunk(&self) -> usize {
        if self.planar { 1 } else { self.samples_per_pixel }
    }

    /// Rows actually stored in a chunk row; the last strip may be short
    fn rows_in_chunk(&self, chunk_row: usize) -> usize {
        if self.tiled {
            self.chunk_height
        } else {
            self.chunk_height.min(self.height - chunk_row * self.chunk_height)
        }
    }

    fn chunk_index(&self, plane: usize, chunk_row: usize, chunk_col: usize) -> usize {
        plane * self.chunks_across * self.chunks_down + chunk_row * self.chunks_across + chunk_col
    }
}

/// Raster source reading a GeoTIFF file window by window
pub struct GeoTiffRaster {
    path: PathBuf,
    name: String,
    reader: BufReader<File>,
    tiff_reader: TiffReader,
    layout: ImageLayout,
    grid: GridSpec,
    band_names: Vec<String>,
    nodata: Option<f64>,
    compression: Box<dyn CompressionHandler>,
    /// Decoded chunks of the previous read, reused by the next one
    chunk_cache: HashMap<usize, Vec<u8>>,
}

impl GeoTiffRaster {
    /// Opens a GeoTIFF file
    ///
    /// # Arguments
    /// * `path` - Path of the (Big)TIFF file
    ///
    /// # Returns
    /// The raster, or a `Resource` error naming the file when it cannot be
    /// parsed or is not georeferenced
    pub fn open<P: AsRef<Path>>(path: P) -> SampleResult<Self> {
        let path = path.as_ref().to_path_buf();
        info!("Opening raster {}", path.display());

        let file = File::open(&path).map_err(|e| SampleError::resource(&path, TiffError::IoError(e)))?;
        let mut reader = BufReader::with_capacity(1024 * 1024, file);
        let mut tiff_reader = TiffReader::new();

        let (layout, geo, compression) = Self::read_structure(&mut reader, &mut tiff_reader)
            .map_err(|e| SampleError::resource(&path, e))?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "raster".to_string());
        let fallback = default_band_names(&name, layout.samples_per_pixel);
        let band_names = geo.band_names
            .into_iter()
            .zip(fallback)
            .map(|(described, default)| described.unwrap_or(default))
            .collect();

        let grid = GridSpec::new(layout.width, layout.height, geo.transform, geo.epsg)?;
        debug!("{}: {} bands of {}, {}, {} {}",
               name, layout.samples_per_pixel, layout.sample_type, grid,
               if layout.tiled { "tiled" } else { "stripped" }, compression.name());

        Ok(GeoTiffRaster {
            path,
            name,
            reader,
            tiff_reader,
            layout,
            grid,
            band_names,
            nodata: geo.nodata,
            compression,
            chunk_cache: HashMap::new(),
        })
    }

    fn read_structure(
        reader: &mut BufReader<File>,
        tiff_reader: &mut TiffReader,
    ) -> TiffResult<(ImageLayout, GeoInfo, Box<dyn CompressionHandler>)> {
        let tiff = tiff_reader.read(reader)?;
        let ifd = tiff.main_ifd()
            .ok_or_else(|| TiffError::GenericError("No full-resolution image in file".to_string()))?;

        let layout = ImageLayout::from_ifd(reader, tiff_reader, ifd)?;
        let geo = read_geo_info(reader, tiff_reader, ifd, layout.samples_per_pixel)?;
        let code = ifd.get_tag_value(tags::COMPRESSION).unwrap_or(compression::NONE);
        trace!("Compression {} ({})", code, compression_name(code));
        let compression = CompressionFactory::create_handler(code)?;

        Ok((layout, geo, compression))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sample_type(&self) -> SampleType {
        self.layout.sample_type
    }

    /// Name of the compression scheme of the file
    pub fn compression_name(&self) -> &'static str {
        self.compression.name()
    }

    pub fn is_tiled(&self) -> bool {
        self.layout.tiled
    }

    /// Reads, decompresses and un-predicts one chunk
    fn decode_chunk(&mut self, index: usize, chunk_row: usize) -> TiffResult<Vec<u8>> {
        let layout = &self.layout;
        let bytes_per_sample = layout.sample_type.byte_width();
        let row_samples = layout.chunk_width * layout.samples_in_chunk();
        let expected = row_samples * layout.rows_in_chunk(chunk_row) * bytes_per_sample;

        let packed_len = usize::try_from(layout.byte_counts[index])
            .map_err(|_| TiffError::GenericError(format!("Chunk {} is too large", index)))?;
        let mut packed = vec![0u8; packed_len];
        self.reader.seek(SeekFrom::Start(layout.offsets[index]))?;
        self.reader.read_exact(&mut packed)?;

        let mut data = self.compression.decompress(&packed, expected)?;
        if data.len() < expected {
            return Err(TiffError::GenericError(format!(
                "Chunk {} decoded to {} bytes, expected {}", index, data.len(), expected)));
        }
        data.truncate(expected);

        let handler = self.tiff_reader.handler()?;
        undo_predictor(&mut data, layout.predictor, row_samples, layout.samples_in_chunk(), bytes_per_sample, handler)?;
        Ok(data)
    }

    fn read_window_inner(&mut self, window: Window) -> TiffResult<Vec<Vec<f64>>> {
        let layout = self.layout.clone();
        let bytes_per_sample = layout.sample_type.byte_width();
        let mut bands = vec![vec![0.0; window.len()]; layout.samples_per_pixel];

        let first_chunk_row = window.row / layout.chunk_height;
        let last_chunk_row = (window.end_row() - 1) / layout.chunk_height;
        let first_chunk_col = window.col / layout.chunk_width;
        let last_chunk_col = (window.end_col() - 1) / layout.chunk_width;

        let mut previous = std::mem::take(&mut self.chunk_cache);
        let planes = if layout.planar { layout.samples_per_pixel } else { 1 };

        for plane in 0..planes {
            for chunk_row in first_chunk_row..=last_chunk_row {
                for chunk_col in first_chunk_col..=last_chunk_col {
                    let index = layout.chunk_index(plane, chunk_row, chunk_col);
                    let data = match previous.remove(&index) {
                        Some(data) => data,
                        None => self.decode_chunk(index, chunk_row)?,
                    };

                    let chunk = Window::new(
                        chunk_col * layout.chunk_width,
                        chunk_row * layout.chunk_height,
                        layout.chunk_width,
                        layout.rows_in_chunk(chunk_row),
                    );
                    if let Some(overlap) = chunk.intersection(&window) {
                        let handler = self.tiff_reader.handler()?;
                        for row in overlap.row..overlap.end_row() {
                            for col in overlap.col..overlap.end_col() {
                                let pixel = (row - chunk.row) * layout.chunk_width + (col - chunk.col);
                                let target = (row - window.row) * window.width + (col - window.col);
                                for sample in 0..layout.samples_in_chunk() {
                                    let band = if layout.planar { plane } else { sample };
                                    let at = (pixel * layout.samples_in_chunk() + sample) * bytes_per_sample;
                                    bands[band][target] = layout.sample_type.decode(&data[at..], handler);
                                }
                            }
                        }
                    }

                    self.chunk_cache.insert(index, data);
                }
            }
        }

        Ok(bands)
    }
}

impl RasterSource for GeoTiffRaster {
    fn name(&self) -> &str {
        &self.name
    }

    fn grid(&self) -> &GridSpec {
        &self.grid
    }

    fn band_count(&self) -> usize {
        self.layout.samples_per_pixel
    }

    fn band_names(&self) -> Vec<String> {
        self.band_names.clone()
    }

    fn nodata(&self, _band: usize) -> Option<f64> {
        self.nodata
    }

    fn read_window(&mut self, window: Window) -> SampleResult<BandBlock> {
        if window.is_empty() || window.end_col() > self.layout.width || window.end_row() > self.layout.height {
            return Err(SampleError::InvalidRaster(format!(
                "{}: window {:?} is empty or exceeds the {}x{} grid",
                self.name, window, self.layout.width, self.layout.height)));
        }

        trace!("{}: reading window {:?}", self.name, window);
        let bands = self.read_window_inner(window)
            .map_err(|e| SampleError::resource(&self.path, e))?;
        Ok(BandBlock { window, bands })
    }
}

impl Drop for GeoTiffRaster {
    fn drop(&mut self) {
        debug!("Closing raster {}", self.path.display());
    }
}

/// Reads a per-sample tag whose values must all agree
fn uniform_value(
    tiff_reader: &TiffReader,
    reader: &mut BufReader<File>,
    ifd: &IFD,
    tag: u16,
    default: u64,
) -> TiffResult<u64> {
    if !ifd.has_tag(tag) {
        return Ok(default);
    }

    let values = tiff_reader.read_u64_values(reader, ifd, tag)?;
    let first = values.first().copied().unwrap_or(default);
    if values.iter().any(|&v| v != first) {
        return Err(TiffError::GenericError(format!(
            "Mixed per-band values in tag {} are not supported: {:?}", tag, values)));
    }
    Ok(first)
}
