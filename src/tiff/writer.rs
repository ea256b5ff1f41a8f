//! GeoTIFF writer
//!
//! Writes single-image, little-endian classic TIFF files with GeoTIFF
//! georeferencing and GDAL nodata/band description tags. Used to persist
//! rasterised results and to produce fixtures for the reader.
//!
//! File layout: header, pixel chunks, out-of-line tag values, then the IFD.
//! The first-IFD offset in the header is patched once the IFD position is
//! known.

use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::compression::{apply_horizontal_differencing, CompressionFactory, CompressionHandler};
use crate::coordinate::GeoTransform;
use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{field_types, geo_keys, header, model_type, photometric, planar_config, predictor, raster_type, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::geo::band_descriptions_xml;
use crate::tiff::sample::SampleType;

/// How pixel data is cut into chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkLayout {
    /// Full-width strips of the given number of rows
    Strips { rows_per_strip: usize },
    /// Fixed-size tiles, padded at the right and bottom edges
    Tiles { width: usize, height: usize },
}

/// One tag ready to be serialised
struct TagData {
    tag: u16,
    field_type: u16,
    count: u32,
    bytes: Vec<u8>,
}

impl TagData {
    fn shorts(tag: u16, values: &[u16]) -> Self {
        TagData {
            tag,
            field_type: field_types::SHORT,
            count: values.len() as u32,
            bytes: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    fn longs(tag: u16, values: &[u32]) -> Self {
        TagData {
            tag,
            field_type: field_types::LONG,
            count: values.len() as u32,
            bytes: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    fn doubles(tag: u16, values: &[f64]) -> Self {
        TagData {
            tag,
            field_type: field_types::DOUBLE,
            count: values.len() as u32,
            bytes: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    fn ascii(tag: u16, text: &str) -> Self {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        TagData {
            tag,
            field_type: field_types::ASCII,
            count: bytes.len() as u32,
            bytes,
        }
    }
}

/// Builder-style GeoTIFF writer
pub struct GeoTiffWriter {
    sample_type: SampleType,
    compression: Box<dyn CompressionHandler>,
    use_predictor: bool,
    layout: ChunkLayout,
    planar: bool,
    nodata: Option<f64>,
    band_names: Vec<String>,
    epsg: Option<u32>,
}

impl GeoTiffWriter {
    /// Uncompressed, interleaved writer with 16-row strips
    pub fn new(sample_type: SampleType) -> Self {
        GeoTiffWriter {
            sample_type,
            compression: Box::new(crate::compression::UncompressedHandler),
            use_predictor: false,
            layout: ChunkLayout::Strips { rows_per_strip: 16 },
            planar: false,
            nodata: None,
            band_names: Vec::new(),
            epsg: None,
        }
    }

    /// Selects the compression by name ("none", "deflate", "zstd")
    pub fn with_compression(mut self, name: &str) -> TiffResult<Self> {
        self.compression = CompressionFactory::handler_by_name(name)?;
        Ok(self)
    }

    /// Enables horizontal differencing (integer sample types only)
    pub fn with_predictor(mut self, enabled: bool) -> Self {
        self.use_predictor = enabled;
        self
    }

    pub fn with_layout(mut self, layout: ChunkLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Stores each band in its own plane instead of interleaving them
    pub fn with_planar(mut self, planar: bool) -> Self {
        self.planar = planar;
        self
    }

    pub fn with_nodata(mut self, nodata: Option<f64>) -> Self {
        self.nodata = nodata;
        self
    }

    pub fn with_band_names(mut self, names: Vec<String>) -> Self {
        self.band_names = names;
        self
    }

    pub fn with_epsg(mut self, epsg: Option<u32>) -> Self {
        self.epsg = epsg;
        self
    }

    /// Writes the bands to a file
    ///
    /// # Arguments
    /// * `path` - Output file
    /// * `width` - Raster width in cells
    /// * `height` - Raster height in cells
    /// * `transform` - Geotransform of the pixel corners
    /// * `bands` - One row-major buffer of `width * height` values per band
    pub fn write<P: AsRef<Path>>(
        &self,
        path: P,
        width: usize,
        height: usize,
        transform: &GeoTransform,
        bands: &[Vec<f64>],
    ) -> TiffResult<()> {
        let path = path.as_ref();
        info!("Writing {} band {}x{} GeoTIFF to {}", bands.len(), width, height, path.display());

        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(1024 * 1024, file);
        self.write_to(&mut writer, width, height, transform, bands)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the bands to any seekable sink
    pub fn write_to<W: Write + Seek>(
        &self,
        writer: &mut W,
        width: usize,
        height: usize,
        transform: &GeoTransform,
        bands: &[Vec<f64>],
    ) -> TiffResult<()> {
        self.validate(width, height, bands)?;

        // Header with a placeholder first-IFD offset
        writer.write_all(b"II")?;
        writer.write_all(&header::TIFF_VERSION.to_le_bytes())?;
        writer.write_all(&[0u8; 4])?;
        let mut position: u64 = 8;

        let (offsets, byte_counts) = self.write_chunks(writer, &mut position, width, height, bands)?;

        let mut entries = self.build_tags(width, height, transform, bands.len(), &offsets, &byte_counts);
        entries.sort_by_key(|entry| entry.tag);

        // Out-of-line values, each on a word boundary
        let mut value_offsets = Vec::with_capacity(entries.len());
        for entry in &entries {
            if entry.bytes.len() > 4 {
                position = pad_to_word(writer, position)?;
                value_offsets.push(Some(position as u32));
                writer.write_all(&entry.bytes)?;
                position += entry.bytes.len() as u64;
            } else {
                value_offsets.push(None);
            }
        }

        position = pad_to_word(writer, position)?;
        let ifd_offset = to_u32(position)?;

        writer.write_all(&(entries.len() as u16).to_le_bytes())?;
        for (entry, offset) in entries.iter().zip(value_offsets) {
            writer.write_all(&entry.tag.to_le_bytes())?;
            writer.write_all(&entry.field_type.to_le_bytes())?;
            writer.write_all(&entry.count.to_le_bytes())?;
            match offset {
                Some(offset) => writer.write_all(&offset.to_le_bytes())?,
                None => {
                    let mut inline = [0u8; 4];
                    inline[..entry.bytes.len()].copy_from_slice(&entry.bytes);
                    writer.write_all(&inline)?;
                }
            }
        }
        writer.write_all(&0u32.to_le_bytes())?;

        writer.seek(SeekFrom::Start(4))?;
        writer.write_all(&ifd_offset.to_le_bytes())?;
        writer.seek(SeekFrom::End(0))?;

        debug!("IFD with {} entries written at {}", entries.len(), ifd_offset);
        Ok(())
    }

    fn validate(&self, width: usize, height: usize, bands: &[Vec<f64>]) -> TiffResult<()> {
        if width == 0 || height == 0 || bands.is_empty() {
            return Err(TiffError::MissingDimensions);
        }
        if let Some((index, band)) = bands.iter().enumerate().find(|(_, b)| b.len() != width * height) {
            return Err(TiffError::GenericError(format!(
                "Band {} holds {} values, expected {}", index, band.len(), width * height)));
        }
        if self.use_predictor && self.sample_type.is_float() {
            return Err(TiffError::GenericError("Horizontal differencing requires an integer sample type".to_string()));
        }
        if let ChunkLayout::Strips { rows_per_strip: 0 } | ChunkLayout::Tiles { width: 0, .. } | ChunkLayout::Tiles { height: 0, .. } = self.layout {
            return Err(TiffError::GenericError("Chunk dimensions must be positive".to_string()));
        }
        Ok(())
    }

    /// Encodes, compresses and writes every chunk in file order
    fn write_chunks<W: Write>(
        &self,
        writer: &mut W,
        position: &mut u64,
        width: usize,
        height: usize,
        bands: &[Vec<f64>],
    ) -> TiffResult<(Vec<u32>, Vec<u32>)> {
        let handler = ByteOrder::LittleEndian.create_handler();
        let planes: Vec<Vec<usize>> = if self.planar {
            (0..bands.len()).map(|b| vec![b]).collect()
        } else {
            vec![(0..bands.len()).collect()]
        };

        let mut offsets = Vec::new();
        let mut byte_counts = Vec::new();

        for plane in &planes {
            for (col0, row0, chunk_w, chunk_h) in self.chunks(width, height) {
                let mut raw = Vec::with_capacity(chunk_w * chunk_h * plane.len() * self.sample_type.byte_width());
                for row in row0..row0 + chunk_h {
                    for col in col0..col0 + chunk_w {
                        for &band in plane {
                            let value = if row < height && col < width {
                                bands[band][row * width + col]
                            } else {
                                0.0
                            };
                            self.sample_type.encode_le(value, &mut raw);
                        }
                    }
                }

                if self.use_predictor {
                    apply_horizontal_differencing(
                        &mut raw, chunk_w * plane.len(), plane.len(), self.sample_type.byte_width(), handler.as_ref())?;
                }

                let packed = self.compression.compress(&raw)?;
                offsets.push(to_u32(*position)?);
                byte_counts.push(to_u32(packed.len() as u64)?);
                writer.write_all(&packed)?;
                *position += packed.len() as u64;
            }
        }

        Ok((offsets, byte_counts))
    }

    /// Chunk origins and sizes in row-major order; tiles keep their full size
    fn chunks(&self, width: usize, height: usize) -> Vec<(usize, usize, usize, usize)> {
        match self.layout {
            ChunkLayout::Strips { rows_per_strip } => (0..height)
                .step_by(rows_per_strip)
                .map(|row| (0, row, width, rows_per_strip.min(height - row)))
                .collect(),
            ChunkLayout::Tiles { width: tw, height: th } => {
                let mut chunks = Vec::new();
                for row in (0..height).step_by(th) {
                    for col in (0..width).step_by(tw) {
                        chunks.push((col, row, tw, th));
                    }
                }
                chunks
            }
        }
    }

    fn build_tags(
        &self,
        width: usize,
        height: usize,
        transform: &GeoTransform,
        band_count: usize,
        offsets: &[u32],
        byte_counts: &[u32],
    ) -> Vec<TagData> {
        let spp = band_count as u16;
        let mut entries = vec![
            TagData::longs(tags::IMAGE_WIDTH, &[width as u32]),
            TagData::longs(tags::IMAGE_LENGTH, &[height as u32]),
            TagData::shorts(tags::BITS_PER_SAMPLE, &vec![self.sample_type.bits(); band_count]),
            TagData::shorts(tags::COMPRESSION, &[self.compression.code() as u16]),
            TagData::shorts(tags::PHOTOMETRIC_INTERPRETATION, &[photometric::BLACK_IS_ZERO]),
            TagData::shorts(tags::SAMPLES_PER_PIXEL, &[spp]),
            TagData::shorts(tags::PLANAR_CONFIGURATION, &[if self.planar {
                planar_config::PLANAR as u16
            } else {
                planar_config::CHUNKY as u16
            }]),
            TagData::shorts(tags::SAMPLE_FORMAT, &vec![self.sample_type.format_code() as u16; band_count]),
        ];

        match self.layout {
            ChunkLayout::Strips { rows_per_strip } => {
                entries.push(TagData::longs(tags::STRIP_OFFSETS, offsets));
                entries.push(TagData::longs(tags::ROWS_PER_STRIP, &[rows_per_strip.min(height) as u32]));
                entries.push(TagData::longs(tags::STRIP_BYTE_COUNTS, byte_counts));
            }
            ChunkLayout::Tiles { width: tw, height: th } => {
                entries.push(TagData::longs(tags::TILE_WIDTH, &[tw as u32]));
                entries.push(TagData::longs(tags::TILE_LENGTH, &[th as u32]));
                entries.push(TagData::longs(tags::TILE_OFFSETS, offsets));
                entries.push(TagData::longs(tags::TILE_BYTE_COUNTS, byte_counts));
            }
        }

        if self.use_predictor {
            entries.push(TagData::shorts(tags::PREDICTOR, &[predictor::HORIZONTAL_DIFFERENCING as u16]));
        }

        if transform.is_north_up() {
            let (origin_x, origin_y) = transform.origin();
            let (sx, sy) = transform.pixel_size();
            entries.push(TagData::doubles(tags::MODEL_PIXEL_SCALE_TAG, &[sx, -sy, 0.0]));
            entries.push(TagData::doubles(tags::MODEL_TIEPOINT_TAG, &[0.0, 0.0, 0.0, origin_x, origin_y, 0.0]));
        } else {
            let c = transform.coefficients();
            entries.push(TagData::doubles(tags::MODEL_TRANSFORMATION_TAG, &[
                c[1], c[2], 0.0, c[0],
                c[4], c[5], 0.0, c[3],
                0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ]));
        }

        entries.push(TagData::shorts(tags::GEO_KEY_DIRECTORY_TAG, &self.geo_key_directory()));

        if !self.band_names.is_empty() {
            entries.push(TagData::ascii(tags::GDAL_METADATA, &band_descriptions_xml(&self.band_names)));
        }
        if let Some(nodata) = self.nodata {
            entries.push(TagData::ascii(tags::GDAL_NODATA, &format_nodata(nodata)));
        }

        entries
    }

    fn geo_key_directory(&self) -> Vec<u16> {
        let mut keys: Vec<[u16; 4]> = vec![[geo_keys::GT_RASTER_TYPE, 0, 1, raster_type::PIXEL_IS_AREA]];

        if let Some(code) = self.epsg {
            // EPSG geographic 2D CRS codes live in the 4000 range
            let geographic = (4000..5000).contains(&code);
            let model = if geographic { model_type::GEOGRAPHIC } else { model_type::PROJECTED };
            let key = if geographic { geo_keys::GEOGRAPHIC_TYPE } else { geo_keys::PROJECTED_CS_TYPE };
            keys.insert(0, [geo_keys::GT_MODEL_TYPE, 0, 1, model]);
            keys.push([key, 0, 1, code as u16]);
        }

        let mut directory = vec![1, 1, 0, keys.len() as u16];
        for key in keys {
            directory.extend_from_slice(&key);
        }
        directory
    }
}

/// Nodata text as GDAL writes it
fn format_nodata(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{}", value)
    }
}

fn to_u32(value: u64) -> TiffResult<u32> {
    u32::try_from(value).map_err(|_| TiffError::GenericError(format!(
        "Offset {} exceeds the 4 GiB classic TIFF limit", value)))
}

fn pad_to_word<W: Write>(writer: &mut W, position: u64) -> TiffResult<u64> {
    if position % 2 == 1 {
        writer.write_all(&[0])?;
        Ok(position + 1)
    } else {
        Ok(position)
    }
}
