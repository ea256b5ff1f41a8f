//! GeoTIFF georeferencing and GDAL metadata
//!
//! Turns the model tags, GeoKey directory and GDAL private tags of an IFD
//! into the pieces the raster layer needs: an affine geotransform, an EPSG
//! code, a nodata value and per-band descriptions.

use log::{debug, warn};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::io::seekable::SeekableReader;
use crate::coordinate::GeoTransform;
use crate::tiff::constants::{geo_keys, raster_type, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

/// Georeferencing read from one image directory
#[derive(Debug, Clone, PartialEq)]
pub struct GeoInfo {
    /// Affine transform of the pixel corners (PixelIsArea convention)
    pub transform: GeoTransform,
    /// EPSG code of the projected or geographic CRS, if declared
    pub epsg: Option<u32>,
    /// GDAL nodata marker
    pub nodata: Option<f64>,
    /// GDAL band descriptions, indexed by band
    pub band_names: Vec<Option<String>>,
}

/// The GeoKeys the reader cares about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeoKeys {
    pub raster_type: Option<u16>,
    pub epsg: Option<u32>,
}

/// Reads all georeferencing information of an IFD
///
/// # Arguments
/// * `reader` - The seekable reader of the file the IFD belongs to
/// * `tiff_reader` - The TIFF reader that parsed the IFD
/// * `ifd` - The image directory
/// * `band_count` - Number of bands, used to size the band name list
///
/// # Returns
/// The geotransform and metadata, or `NotGeoreferenced` when no model tags exist
pub fn read_geo_info(
    reader: &mut dyn SeekableReader,
    tiff_reader: &TiffReader,
    ifd: &IFD,
    band_count: usize,
) -> TiffResult<GeoInfo> {
    let keys = if ifd.has_tag(tags::GEO_KEY_DIRECTORY_TAG) {
        let directory = tiff_reader.read_u64_values(reader, ifd, tags::GEO_KEY_DIRECTORY_TAG)?;
        parse_geo_keys(&directory)
    } else {
        GeoKeys::default()
    };

    let mut transform = read_transform(reader, tiff_reader, ifd)?;
    if keys.raster_type == Some(raster_type::PIXEL_IS_POINT) {
        debug!("PixelIsPoint raster, shifting origin by half a pixel");
        transform = transform.shifted(-0.5, -0.5);
    }

    let nodata = if ifd.has_tag(tags::GDAL_NODATA) {
        let text = tiff_reader.read_ascii(reader, ifd, tags::GDAL_NODATA)?;
        let parsed = parse_nodata(&text);
        if parsed.is_none() {
            warn!("Ignoring unparsable GDAL_NODATA value '{}'", text);
        }
        parsed
    } else {
        None
    };

    let band_names = if ifd.has_tag(tags::GDAL_METADATA) {
        let xml = tiff_reader.read_ascii(reader, ifd, tags::GDAL_METADATA)?;
        parse_band_descriptions(&xml, band_count)
    } else {
        vec![None; band_count]
    };

    Ok(GeoInfo {
        transform,
        epsg: keys.epsg,
        nodata,
        band_names,
    })
}

/// Builds the geotransform from ModelTransformation, or PixelScale plus Tiepoint
fn read_transform(reader: &mut dyn SeekableReader, tiff_reader: &TiffReader, ifd: &IFD) -> TiffResult<GeoTransform> {
    if ifd.has_tag(tags::MODEL_TRANSFORMATION_TAG) {
        let matrix = tiff_reader.read_f64_values(reader, ifd, tags::MODEL_TRANSFORMATION_TAG)?;
        return transform_from_matrix(&matrix);
    }

    if ifd.has_tag(tags::MODEL_PIXEL_SCALE_TAG) && ifd.has_tag(tags::MODEL_TIEPOINT_TAG) {
        let scale = tiff_reader.read_f64_values(reader, ifd, tags::MODEL_PIXEL_SCALE_TAG)?;
        let tiepoint = tiff_reader.read_f64_values(reader, ifd, tags::MODEL_TIEPOINT_TAG)?;
        return transform_from_tiepoint(&scale, &tiepoint);
    }

    Err(TiffError::NotGeoreferenced)
}

/// Geotransform from a ModelPixelScale and the first ModelTiepoint
pub fn transform_from_tiepoint(scale: &[f64], tiepoint: &[f64]) -> TiffResult<GeoTransform> {
    if scale.len() < 2 || tiepoint.len() < 6 {
        return Err(TiffError::GenericError(format!(
            "Malformed georeferencing: {} pixel scale and {} tiepoint values", scale.len(), tiepoint.len())));
    }
    if tiepoint.len() > 6 {
        warn!("{} tiepoints present, using only the first", tiepoint.len() / 6);
    }

    let (sx, sy) = (scale[0], scale[1]);
    let origin_x = tiepoint[3] - tiepoint[0] * sx;
    let origin_y = tiepoint[4] + tiepoint[1] * sy;

    Ok(GeoTransform::from_origin(origin_x, origin_y, sx, sy))
}

/// Geotransform from the 4x4 row-major ModelTransformation matrix
pub fn transform_from_matrix(matrix: &[f64]) -> TiffResult<GeoTransform> {
    if matrix.len() < 16 {
        return Err(TiffError::GenericError(format!(
            "ModelTransformation needs 16 values, found {}", matrix.len())));
    }

    Ok(GeoTransform::new([matrix[3], matrix[0], matrix[1], matrix[7], matrix[4], matrix[5]]))
}

/// Extracts raster type and EPSG code from a GeoKeyDirectory
///
/// The directory is a header of four shorts followed by four shorts per key:
/// key id, tag location, count and value. Only keys stored inline
/// (location 0) are considered.
pub fn parse_geo_keys(directory: &[u64]) -> GeoKeys {
    let mut keys = GeoKeys::default();
    if directory.len() < 4 {
        return keys;
    }

    let declared = directory[3] as usize;
    let mut projected = None;
    let mut geographic = None;

    for key in directory[4..].chunks_exact(4).take(declared) {
        let (id, location, value) = (key[0] as u16, key[1], key[3]);
        if location != 0 {
            continue;
        }
        match id {
            geo_keys::GT_RASTER_TYPE => keys.raster_type = Some(value as u16),
            geo_keys::PROJECTED_CS_TYPE => projected = Some(value as u32),
            geo_keys::GEOGRAPHIC_TYPE => geographic = Some(value as u32),
            _ => {}
        }
    }

    // 32767 is "user defined"
    keys.epsg = projected.or(geographic).filter(|code| *code != 0 && *code != 32767);
    keys
}

/// Parses a GDAL_NODATA string
pub fn parse_nodata(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "nan" | "-nan" => Some(f64::NAN),
        "inf" | "+inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        _ => trimmed.parse::<f64>().ok(),
    }
}

/// Reads band descriptions out of a GDAL_METADATA XML document
///
/// Descriptions are `Item` elements named `DESCRIPTION` with a zero-based
/// `sample` attribute. Items outside `0..band_count` are ignored.
pub fn parse_band_descriptions(xml: &str, band_count: usize) -> Vec<Option<String>> {
    let mut names = vec![None; band_count];
    let mut reader = Reader::from_str(xml);
    let mut current: Option<usize> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) if element.name().as_ref() == b"Item" => {
                let mut is_description = false;
                let mut sample = None;
                for attribute in element.attributes().flatten() {
                    let value = match attribute.unescape_value() {
                        Ok(value) => value,
                        Err(_) => continue,
                    };
                    match attribute.key.as_ref() {
                        b"name" => is_description = value == "DESCRIPTION",
                        b"sample" => sample = value.parse::<usize>().ok(),
                        _ => {}
                    }
                }
                current = if is_description { sample } else { None };
            }
            Ok(Event::Text(text)) => {
                if let Some(band) = current {
                    if let (Some(slot), Ok(value)) = (names.get_mut(band), text.unescape()) {
                        let value = value.trim();
                        if !value.is_empty() {
                            *slot = Some(value.to_string());
                        }
                    }
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!("Malformed GDAL_METADATA at byte {}: {}", reader.buffer_position(), e);
                break;
            }
            _ => {}
        }
    }

    names
}

/// Serialises band descriptions into a GDAL_METADATA XML document
pub fn band_descriptions_xml(names: &[String]) -> String {
    let mut xml = String::from("<GDALMetadata>\n");
    for (band, name) in names.iter().enumerate() {
        xml.push_str(&format!(
            "  <Item name=\"DESCRIPTION\" sample=\"{}\" role=\"description\">{}</Item>\n",
            band,
            quick_xml::escape::escape(name.as_str())
        ));
    }
    xml.push_str("</GDALMetadata>");
    xml
}
