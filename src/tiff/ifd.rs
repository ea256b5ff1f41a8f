//! Image File Directory (IFD) structures and methods
//!
//! An IFD is the list of tag entries describing one image in a TIFF file.
//! The raster reader only ever needs the first (full resolution) IFD, but the
//! whole chain is parsed so overviews and masks can be recognised and skipped.

use std::collections::HashMap;
use std::fmt;
use log::trace;

use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::constants::{field_types, tags};
use crate::tiff::tag_names;

/// Represents an entry in an Image File Directory (IFD)
#[derive(Debug, Clone)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// Raw bytes of the value/offset field (4 bytes used for classic TIFF)
    pub raw: [u8; 8],
    /// Offset to the values when they are not stored inline
    pub value_offset: u64,
    /// First value decoded from the inline field, for integer types stored inline
    pub inline_value: Option<u64>,
}

impl IFDEntry {
    /// Creates an entry from the raw value field
    ///
    /// The raw field is interpreted with the file's byte order: as an offset
    /// when the values do not fit, and as the first inline value otherwise.
    pub fn from_raw(
        tag: u16,
        field_type: u16,
        count: u64,
        raw: [u8; 8],
        is_big_tiff: bool,
        handler: &dyn ByteOrderHandler,
    ) -> Self {
        let value_offset = if is_big_tiff {
            handler.u64_from(&raw)
        } else {
            handler.u32_from(&raw[..4]) as u64
        };

        let mut entry = IFDEntry {
            tag,
            field_type,
            count,
            raw,
            value_offset,
            inline_value: None,
        };

        if entry.is_value_inline(is_big_tiff) && count > 0 {
            entry.inline_value = match field_type {
                field_types::BYTE | field_types::UNDEFINED => Some(raw[0] as u64),
                field_types::SHORT => Some(handler.u16_from(&raw[..2]) as u64),
                field_types::LONG => Some(handler.u32_from(&raw[..4]) as u64),
                field_types::LONG8 | field_types::IFD8 => Some(handler.u64_from(&raw)),
                _ => None,
            };
        }

        trace!("IFD entry: tag={} ({}), type={}, count={}, offset={}, inline={:?}",
               tag, tag_names::tag_name(tag), field_type, count, value_offset, entry.inline_value);

        entry
    }

    /// Get the size in bytes for this entry's field type
    pub fn get_field_type_size(&self) -> usize {
        field_type_size(self.field_type)
    }

    /// Determines if the value is stored inline in the value field
    pub fn is_value_inline(&self, is_big_tiff: bool) -> bool {
        let inline_size = if is_big_tiff { 8 } else { 4 };
        matches!(self.byte_len(), Some(len) if len <= inline_size)
    }

    /// Total byte length of this entry's values, `None` when the count overflows
    pub fn byte_len(&self) -> Option<usize> {
        usize::try_from(self.count)
            .ok()
            .and_then(|count| count.checked_mul(self.get_field_type_size()))
    }
}

/// Size in bytes of one value of a TIFF field type
pub fn field_type_size(field_type: u16) -> usize {
    match field_type {
        field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
        field_types::SHORT | field_types::SSHORT => 2,
        field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
        field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => 8,
        field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => 8,
        _ => 1,
    }
}

/// Represents an Image File Directory (IFD) in a TIFF file
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in this IFD
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based)
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    /// Index into `entries` by tag
    tag_map: HashMap<u16, usize>,
}

impl IFD {
    /// Creates a new, empty IFD
    pub fn new(number: usize, offset: u64) -> Self {
        Self {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry to this IFD
    ///
    /// A repeated tag replaces the earlier lookup entry.
    pub fn add_entry(&mut self, entry: IFDEntry) {
        self.tag_map.insert(entry.tag, self.entries.len());
        self.entries.push(entry);
    }

    /// Gets the first value of an inline integer tag
    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        self.get_entry(tag).and_then(|entry| entry.inline_value)
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Gets an IFD entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).map(|&idx| &self.entries[idx])
    }

    /// Gets the (width, height) of the image described by this IFD
    pub fn get_dimensions(&self) -> Option<(u64, u64)> {
        let width = self.get_tag_value(tags::IMAGE_WIDTH)?;
        let height = self.get_tag_value(tags::IMAGE_LENGTH)?;
        Some((width, height))
    }

    /// Returns number of samples per pixel (default 1 if not specified)
    pub fn get_samples_per_pixel(&self) -> u64 {
        self.get_tag_value(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }

    /// Whether this IFD is a reduced-resolution overview or a mask
    pub fn is_subsidiary(&self) -> bool {
        self.get_tag_value(tags::NEW_SUBFILE_TYPE)
            .map(|flags| flags & 0b101 != 0)
            .unwrap_or(false)
    }

    /// Whether the image data is organised in tiles rather than strips
    pub fn is_tiled(&self) -> bool {
        self.has_tag(tags::TILE_WIDTH) && self.has_tag(tags::TILE_LENGTH)
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} (offset: {})", self.number, self.offset)?;

        if let Some((width, height)) = self.get_dimensions() {
            writeln!(f, "  Dimensions: {}x{}", width, height)?;
        }
        writeln!(f, "  Samples per pixel: {}", self.get_samples_per_pixel())?;

        writeln!(f, "  Tags:")?;
        for entry in &self.entries {
            let value = match entry.inline_value {
                Some(v) => v.to_string(),
                None => format!("{} value(s) at offset {}", entry.count, entry.value_offset),
            };
            writeln!(f, "    {} ({}): {}", entry.tag, tag_names::tag_name(entry.tag), value)?;
        }

        Ok(())
    }
}
