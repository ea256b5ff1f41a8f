//! Byte order handling for TIFF files
//!
//! This module implements the Strategy pattern for handling different
//! byte orders (little-endian vs big-endian). Handlers decode both from a
//! seekable stream (IFD parsing) and from in-memory buffers (inline tag
//! values and decompressed pixel chunks).

use byteorder::{BigEndian, ByteOrder as Endian, LittleEndian, ReadBytesExt};
use std::io::Result;

use crate::io::seekable::SeekableReader;
use crate::tiff::errors::{TiffError, TiffResult};

/// Represents the byte order of a TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the TIFF header
    pub fn detect(reader: &mut dyn SeekableReader) -> TiffResult<Self> {
        let byte_order = reader.read_u16::<LittleEndian>()?;
        match byte_order {
            0x4949 => Ok(ByteOrder::LittleEndian), // "II" (Intel)
            0x4D4D => Ok(ByteOrder::BigEndian),    // "MM" (Motorola)
            _ => Err(TiffError::InvalidByteOrder(byte_order)),
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }
}

/// Trait for byte order handling strategies
///
/// The `*_from` methods expect a slice of at least the value's width and
/// panic otherwise, like the `byteorder` functions they wrap.
pub trait ByteOrderHandler: Send + Sync {
    /// Which byte order this handler decodes
    fn byte_order(&self) -> ByteOrder;

    /// Read a u16 value
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;

    /// Read a u32 value
    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32>;

    /// Read a u64 value
    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64>;

    /// Read an f64 value
    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64>;

    fn u16_from(&self, buf: &[u8]) -> u16;
    fn u32_from(&self, buf: &[u8]) -> u32;
    fn u64_from(&self, buf: &[u8]) -> u64;
    fn f32_from(&self, buf: &[u8]) -> f32;
    fn f64_from(&self, buf: &[u8]) -> f64;

    /// Write a u16 back into a buffer (used when undoing predictors)
    fn write_u16_to(&self, buf: &mut [u8], value: u16);
    fn write_u32_to(&self, buf: &mut [u8], value: u32);
    fn write_u64_to(&self, buf: &mut [u8], value: u64);
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn byte_order(&self) -> ByteOrder {
        ByteOrder::LittleEndian
    }

    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<LittleEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<LittleEndian>()
    }

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
        reader.read_u64::<LittleEndian>()
    }

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
        reader.read_f64::<LittleEndian>()
    }

    fn u16_from(&self, buf: &[u8]) -> u16 {
        LittleEndian::read_u16(buf)
    }

    fn u32_from(&self, buf: &[u8]) -> u32 {
        LittleEndian::read_u32(buf)
    }

    fn u64_from(&self, buf: &[u8]) -> u64 {
        LittleEndian::read_u64(buf)
    }

    fn f32_from(&self, buf: &[u8]) -> f32 {
        LittleEndian::read_f32(buf)
    }

    fn f64_from(&self, buf: &[u8]) -> f64 {
        LittleEndian::read_f64(buf)
    }

    fn write_u16_to(&self, buf: &mut [u8], value: u16) {
        LittleEndian::write_u16(buf, value)
    }

    fn write_u32_to(&self, buf: &mut [u8], value: u32) {
        LittleEndian::write_u32(buf, value)
    }

    fn write_u64_to(&self, buf: &mut [u8], value: u64) {
        LittleEndian::write_u64(buf, value)
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn byte_order(&self) -> ByteOrder {
        ByteOrder::BigEndian
    }

    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<BigEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<BigEndian>()
    }

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
        reader.read_u64::<BigEndian>()
    }

    fn read_f64(&self, reader: &mut dyn SeekableReader) -> Result<f64> {
        reader.read_f64::<BigEndian>()
    }

    fn u16_from(&self, buf: &[u8]) -> u16 {
        BigEndian::read_u16(buf)
    }

    fn u32_from(&self, buf: &[u8]) -> u32 {
        BigEndian::read_u32(buf)
    }

    fn u64_from(&self, buf: &[u8]) -> u64 {
        BigEndian::read_u64(buf)
    }

    fn f32_from(&self, buf: &[u8]) -> f32 {
        BigEndian::read_f32(buf)
    }

    fn f64_from(&self, buf: &[u8]) -> f64 {
        BigEndian::read_f64(buf)
    }

    fn write_u16_to(&self, buf: &mut [u8], value: u16) {
        BigEndian::write_u16(buf, value)
    }

    fn write_u32_to(&self, buf: &mut [u8], value: u32) {
        BigEndian::write_u32(buf, value)
    }

    fn write_u64_to(&self, buf: &mut [u8], value: u64) {
        BigEndian::write_u64(buf, value)
    }
}
