//! TIFF file reader implementation
//!
//! This module implements the TIFF/BigTIFF directory reader that uses the
//! Strategy pattern to handle different byte orders. Only the directory
//! structure and tag values are read here; pixel data is pulled lazily by
//! the raster layer one window at a time.

use log::{debug, warn};
use std::io::SeekFrom;

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{field_types, header};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{field_type_size, IFD, IFDEntry};
use crate::tiff::tag_names;
use crate::tiff::types::TIFF;

/// Upper bound on the IFD chain length, guards against offset loops
const MAX_IFDS: usize = 100;

/// Reader for TIFF and BigTIFF directories
pub struct TiffReader {
    /// Current byte order handler
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    /// Whether currently reading BigTIFF format
    is_big_tiff: bool,
}

impl TiffReader {
    /// Creates a new TIFF reader
    pub fn new() -> Self {
        TiffReader {
            byte_order_handler: None,
            is_big_tiff: false,
        }
    }

    /// Returns the byte order handler, failing when no header was read yet
    pub fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler
            .as_deref()
            .ok_or_else(|| TiffError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Returns whether the current file is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Reads the header and the IFD chain
    ///
    /// # Arguments
    /// * `reader` - Any struct implementing the SeekableReader trait
    ///
    /// # Returns
    /// A TIFF structure holding every directory of the file
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TIFF> {
        reader.seek(SeekFrom::Start(0))?;

        let byte_order = ByteOrder::detect(reader)?;
        let handler = byte_order.create_handler();

        let version = handler.read_u16(reader)?;
        let first_ifd_offset = match version {
            header::TIFF_VERSION => {
                self.is_big_tiff = false;
                handler.read_u32(reader)? as u64
            }
            header::BIG_TIFF_VERSION => {
                self.is_big_tiff = true;
                let offset_size = handler.read_u16(reader)?;
                let reserved = handler.read_u16(reader)?;
                if offset_size != header::BIGTIFF_OFFSET_SIZE || reserved != 0 {
                    return Err(TiffError::InvalidBigTIFFHeader);
                }
                handler.read_u64(reader)?
            }
            other => return Err(TiffError::UnsupportedVersion(other)),
        };

        debug!("{} {}, first IFD at {}",
               byte_order.name(), if self.is_big_tiff { "BigTIFF" } else { "TIFF" }, first_ifd_offset);

        self.byte_order_handler = Some(handler);

        let mut tiff = TIFF::new(self.is_big_tiff, byte_order);
        tiff.ifds = self.read_ifd_chain(reader, first_ifd_offset)?;

        if tiff.ifds.is_empty() {
            return Err(TiffError::GenericError("File contains no image directory".to_string()));
        }

        debug!("Read {} IFDs", tiff.ifds.len());
        Ok(tiff)
    }

    /// Reads a chain of IFDs starting from the given offset
    fn read_ifd_chain(&self, reader: &mut dyn SeekableReader, first_ifd_offset: u64) -> TiffResult<Vec<IFD>> {
        let file_size = reader.seek(SeekFrom::End(0))?;
        let mut ifds = Vec::new();
        let mut offset = first_ifd_offset;

        while offset != 0 && ifds.len() < MAX_IFDS {
            if offset < 8 || offset >= file_size {
                warn!("IFD offset {} outside file of {} bytes, stopping IFD chain", offset, file_size);
                break;
            }

            let (ifd, next_offset) = self.read_ifd(reader, offset, ifds.len())?;
            ifds.push(ifd);
            offset = next_offset;
        }

        Ok(ifds)
    }

    /// Reads one IFD and returns it together with the offset of the next one
    ///
    /// # Arguments
    /// * `reader` - The seekable reader to use
    /// * `offset` - Offset in the file where the IFD starts
    /// * `number` - The index of this IFD in the file
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> TiffResult<(IFD, u64)> {
        let handler = self.handler()?;
        reader.seek(SeekFrom::Start(offset))?;

        let entry_count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u16(reader)? as u64
        };

        let (count_size, entry_size): (u64, u64) = if self.is_big_tiff { (8, 20) } else { (2, 12) };
        let file_size = reader.seek(SeekFrom::End(0))?;
        let entries_len = entry_count.saturating_mul(entry_size).saturating_add(count_size);
        check_range(|| format!("IFD #{}", number), offset, entries_len, file_size)?;
        reader.seek(SeekFrom::Start(offset + count_size))?;

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            ifd.add_entry(self.read_ifd_entry(reader, handler)?);
        }

        let next_offset = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        debug!("IFD #{} at {}: {} entries", number, offset, ifd.entries.len());
        Ok((ifd, next_offset))
    }

    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader, handler: &dyn ByteOrderHandler) -> TiffResult<IFDEntry> {
        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;

        let mut raw = [0u8; 8];
        let count = if self.is_big_tiff {
            let count = handler.read_u64(reader)?;
            reader.read_exact(&mut raw)?;
            count
        } else {
            let count = handler.read_u32(reader)? as u64;
            reader.read_exact(&mut raw[..4])?;
            count
        };

        Ok(IFDEntry::from_raw(tag, field_type, count, raw, self.is_big_tiff, handler))
    }

    /// Returns the raw bytes of a tag's values, inline or at their offset
    ///
    /// Out-of-line values are checked against the file length before any
    /// buffer is allocated, so a corrupt count fails instead of aborting.
    pub fn read_tag_bytes(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> TiffResult<Vec<u8>> {
        let what = || format!("Tag {} ({})", entry.tag, tag_names::tag_name(entry.tag));
        let file_size = reader.seek(SeekFrom::End(0))?;
        let len = entry.byte_len().ok_or_else(|| TiffError::DataOutOfBounds {
            what: what(),
            offset: entry.value_offset,
            length: entry.count,
            file_size,
        })?;

        if entry.is_value_inline(self.is_big_tiff) {
            return Ok(entry.raw[..len].to_vec());
        }

        check_range(what, entry.value_offset, len as u64, file_size)?;

        let mut buffer = vec![0u8; len];
        reader.seek(SeekFrom::Start(entry.value_offset))?;
        reader.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Reads an integer tag as a vector of u64
    ///
    /// # Arguments
    /// * `reader` - The seekable reader to use
    /// * `ifd` - The IFD containing the tag
    /// * `tag` - The tag number to read
    ///
    /// # Returns
    /// A vector with one u64 per value in the tag
    pub fn read_u64_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u64>> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        let handler = self.handler()?;
        let width = field_type_size(entry.field_type);
        let bytes = self.read_tag_bytes(reader, entry)?;

        let values = bytes.chunks_exact(width).map(|chunk| match entry.field_type {
            field_types::BYTE | field_types::UNDEFINED => Ok(chunk[0] as u64),
            field_types::SHORT => Ok(handler.u16_from(chunk) as u64),
            field_types::LONG => Ok(handler.u32_from(chunk) as u64),
            field_types::LONG8 | field_types::IFD8 => Ok(handler.u64_from(chunk)),
            other => Err(TiffError::UnsupportedFieldType(other)),
        }).collect::<TiffResult<Vec<u64>>>()?;

        Ok(values)
    }

    /// Reads a floating point tag (DOUBLE or FLOAT) as a vector of f64
    pub fn read_f64_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<f64>> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        let handler = self.handler()?;
        let bytes = self.read_tag_bytes(reader, entry)?;

        match entry.field_type {
            field_types::DOUBLE => Ok(bytes.chunks_exact(8).map(|c| handler.f64_from(c)).collect()),
            field_types::FLOAT => Ok(bytes.chunks_exact(4).map(|c| handler.f32_from(c) as f64).collect()),
            other => Err(TiffError::UnsupportedFieldType(other)),
        }
    }

    /// Reads an ASCII tag, with trailing null characters removed
    pub fn read_ascii(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<String> {
        let entry = ifd.get_entry(tag).ok_or(TiffError::TagNotFound(tag))?;
        let mut bytes = self.read_tag_bytes(reader, entry)?;

        while bytes.last() == Some(&0) {
            bytes.pop();
        }

        String::from_utf8(bytes)
            .map_err(|e| TiffError::GenericError(format!("Invalid UTF-8 string in tag {}: {}", tag, e)))
    }
}

/// Fails unless `length` bytes starting at `offset` lie inside the file
pub(crate) fn check_range(
    what: impl FnOnce() -> String,
    offset: u64,
    length: u64,
    file_size: u64,
) -> TiffResult<()> {
    match offset.checked_add(length) {
        Some(end) if end <= file_size => Ok(()),
        _ => Err(TiffError::DataOutOfBounds { what: what(), offset, length, file_size }),
    }
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}
