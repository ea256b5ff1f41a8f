//! Numeric sample types and their decoding
//!
//! Pixel values of every supported layout are widened to `f64`, which holds
//! all 8/16/32-bit integers and both float widths exactly.

use std::fmt;

use crate::io::byte_order::ByteOrderHandler;
use crate::tiff::constants::sample_format;
use crate::tiff::errors::{TiffError, TiffResult};

/// Storage type of one raster sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl SampleType {
    /// Resolves the sample type from the SampleFormat and BitsPerSample tags
    pub fn from_tags(format: u64, bits: u64) -> TiffResult<Self> {
        let sample_type = match (format, bits) {
            (sample_format::UNSIGNED, 8) => SampleType::U8,
            (sample_format::SIGNED, 8) => SampleType::I8,
            (sample_format::UNSIGNED, 16) => SampleType::U16,
            (sample_format::SIGNED, 16) => SampleType::I16,
            (sample_format::UNSIGNED, 32) => SampleType::U32,
            (sample_format::SIGNED, 32) => SampleType::I32,
            (sample_format::UNSIGNED, 64) => SampleType::U64,
            (sample_format::SIGNED, 64) => SampleType::I64,
            (sample_format::IEEEFP, 32) => SampleType::F32,
            (sample_format::IEEEFP, 64) => SampleType::F64,
            _ => return Err(TiffError::UnsupportedSampleFormat { format, bits }),
        };
        Ok(sample_type)
    }

    /// Size of one sample in bytes
    pub fn byte_width(&self) -> usize {
        match self {
            SampleType::U8 | SampleType::I8 => 1,
            SampleType::U16 | SampleType::I16 => 2,
            SampleType::U32 | SampleType::I32 | SampleType::F32 => 4,
            SampleType::U64 | SampleType::I64 | SampleType::F64 => 8,
        }
    }

    /// Value of the SampleFormat tag for this type
    pub fn format_code(&self) -> u64 {
        match self {
            SampleType::U8 | SampleType::U16 | SampleType::U32 | SampleType::U64 => sample_format::UNSIGNED,
            SampleType::I8 | SampleType::I16 | SampleType::I32 | SampleType::I64 => sample_format::SIGNED,
            SampleType::F32 | SampleType::F64 => sample_format::IEEEFP,
        }
    }

    /// Value of the BitsPerSample tag for this type
    pub fn bits(&self) -> u16 {
        (self.byte_width() * 8) as u16
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleType::F32 | SampleType::F64)
    }

    /// Decodes one sample from the start of `buf`
    pub fn decode(&self, buf: &[u8], handler: &dyn ByteOrderHandler) -> f64 {
        match self {
            SampleType::U8 => buf[0] as f64,
            SampleType::I8 => buf[0] as i8 as f64,
            SampleType::U16 => handler.u16_from(buf) as f64,
            SampleType::I16 => handler.u16_from(buf) as i16 as f64,
            SampleType::U32 => handler.u32_from(buf) as f64,
            SampleType::I32 => handler.u32_from(buf) as i32 as f64,
            SampleType::U64 => handler.u64_from(buf) as f64,
            SampleType::I64 => handler.u64_from(buf) as i64 as f64,
            SampleType::F32 => handler.f32_from(buf) as f64,
            SampleType::F64 => handler.f64_from(buf),
        }
    }

    /// Encodes a value as little-endian bytes, saturating integer types
    pub fn encode_le(&self, value: f64, out: &mut Vec<u8>) {
        match self {
            SampleType::U8 => out.push(value as u8),
            SampleType::I8 => out.push(value as i8 as u8),
            SampleType::U16 => out.extend_from_slice(&(value as u16).to_le_bytes()),
            SampleType::I16 => out.extend_from_slice(&(value as i16).to_le_bytes()),
            SampleType::U32 => out.extend_from_slice(&(value as u32).to_le_bytes()),
            SampleType::I32 => out.extend_from_slice(&(value as i32).to_le_bytes()),
            SampleType::U64 => out.extend_from_slice(&(value as u64).to_le_bytes()),
            SampleType::I64 => out.extend_from_slice(&(value as i64).to_le_bytes()),
            SampleType::F32 => out.extend_from_slice(&(value as f32).to_le_bytes()),
            SampleType::F64 => out.extend_from_slice(&value.to_le_bytes()),
        }
    }

    /// Parses a type name as used in configuration files and on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        let sample_type = match name.to_ascii_lowercase().as_str() {
            "u8" | "uint8" | "byte" => SampleType::U8,
            "i8" | "int8" => SampleType::I8,
            "u16" | "uint16" => SampleType::U16,
            "i16" | "int16" => SampleType::I16,
            "u32" | "uint32" => SampleType::U32,
            "i32" | "int32" => SampleType::I32,
            "u64" | "uint64" => SampleType::U64,
            "i64" | "int64" => SampleType::I64,
            "f32" | "float32" => SampleType::F32,
            "f64" | "float64" => SampleType::F64,
            _ => return None,
        };
        Some(sample_type)
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleType::U8 => "uint8",
            SampleType::I8 => "int8",
            SampleType::U16 => "uint16",
            SampleType::I16 => "int16",
            SampleType::U32 => "uint32",
            SampleType::I32 => "int32",
            SampleType::U64 => "uint64",
            SampleType::I64 => "int64",
            SampleType::F32 => "float32",
            SampleType::F64 => "float64",
        };
        f.write_str(name)
    }
}
