//! Tests for the directory reader

extern crate std;

use std::io::Cursor;

use super::test_utils::{
    bigtiff_data_offset, create_big_endian_tiff_buffer, create_bigtiff_buffer, create_test_bigtiff_buffer,
    create_test_tiff_buffer,
};
use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{field_types, tags};
use crate::tiff::errors::TiffError;
use crate::tiff::reader::TiffReader;

#[test]
fn test_read_little_endian_tiff() {
    let mut cursor = create_test_tiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    std::assert!(!tiff.is_big_tiff);
    std::assert_eq!(tiff.byte_order, ByteOrder::LittleEndian);
    std::assert_eq!(tiff.ifd_count(), 1);
    let ifd = tiff.main_ifd().unwrap();
    std::assert_eq!(ifd.get_dimensions(), Some((800, 600)));
    std::assert_eq!(ifd.get_samples_per_pixel(), 3);
}

#[test]
fn test_read_big_endian_inline_shorts() {
    let mut cursor = create_big_endian_tiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    std::assert_eq!(tiff.byte_order, ByteOrder::BigEndian);
    let ifd = tiff.main_ifd().unwrap();
    std::assert_eq!(ifd.get_dimensions(), Some((800, 600)));
    std::assert_eq!(ifd.get_samples_per_pixel(), 3);
}

#[test]
fn test_read_bigtiff() {
    let mut cursor = create_test_bigtiff_buffer();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();

    std::assert!(tiff.is_big_tiff);
    std::assert!(reader.is_big_tiff());
    std::assert_eq!(tiff.main_ifd().unwrap().get_dimensions(), Some((1024, 768)));
}

#[test]
fn test_rejects_bad_headers() {
    let mut reader = TiffReader::new();

    let mut wrong_version = Cursor::new(vec![0x49, 0x49, 41, 0, 8, 0, 0, 0]);
    std::assert!(matches!(reader.read(&mut wrong_version), Err(TiffError::UnsupportedVersion(41))));

    let mut bad_bigtiff = Cursor::new(vec![0x49, 0x49, 43, 0, 4, 0, 0, 0, 16, 0, 0, 0, 0, 0, 0, 0]);
    std::assert!(matches!(reader.read(&mut bad_bigtiff), Err(TiffError::InvalidBigTIFFHeader)));

    let mut not_tiff = Cursor::new(b"PK\x03\x04".to_vec());
    std::assert!(reader.read(&mut not_tiff).is_err());
}

#[test]
fn test_handler_requires_header() {
    let reader = TiffReader::new();
    std::assert!(reader.handler().is_err());
}

#[test]
fn test_huge_tag_count_is_an_error() {
    // A ModelPixelScale with 2^62 doubles would need more memory than exists
    let mut cursor = create_bigtiff_buffer(&[
        (256, field_types::LONG, 1, 1),
        (257, field_types::LONG, 1, 1),
        (tags::MODEL_PIXEL_SCALE_TAG, field_types::DOUBLE, 1 << 62, 64),
    ], 0);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let ifd = tiff.main_ifd().unwrap();

    let entry = ifd.get_entry(tags::MODEL_PIXEL_SCALE_TAG).unwrap();
    std::assert!(!entry.is_value_inline(true));

    let result = reader.read_f64_values(&mut cursor, ifd, tags::MODEL_PIXEL_SCALE_TAG);
    std::assert!(matches!(result, Err(TiffError::DataOutOfBounds { .. })));

    let mut overflowing = create_bigtiff_buffer(&[
        (tags::STRIP_BYTE_COUNTS, field_types::LONG8, u64::MAX, 64),
    ], 0);
    let tiff = reader.read(&mut overflowing).unwrap();
    let ifd = tiff.main_ifd().unwrap();
    std::assert_eq!(ifd.get_entry(tags::STRIP_BYTE_COUNTS).unwrap().byte_len(), None);
    std::assert!(matches!(
        reader.read_u64_values(&mut overflowing, ifd, tags::STRIP_BYTE_COUNTS),
        Err(TiffError::DataOutOfBounds { .. })
    ));
}

#[test]
fn test_values_past_end_of_file_are_an_error() {
    let data = bigtiff_data_offset(1);
    let mut cursor = create_bigtiff_buffer(&[(tags::MODEL_PIXEL_SCALE_TAG, field_types::DOUBLE, 3, data)], 16);
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let ifd = tiff.main_ifd().unwrap();

    match reader.read_f64_values(&mut cursor, ifd, tags::MODEL_PIXEL_SCALE_TAG) {
        Err(TiffError::DataOutOfBounds { offset, length, file_size, .. }) => {
            std::assert_eq!(offset, data);
            std::assert_eq!(length, 24);
            std::assert_eq!(file_size, data + 16);
        }
        other => std::panic!("expected DataOutOfBounds, got {:?}", other),
    }

    let mut fitting = create_bigtiff_buffer(&[(tags::MODEL_PIXEL_SCALE_TAG, field_types::DOUBLE, 2, data)], 16);
    let tiff = reader.read(&mut fitting).unwrap();
    let values = reader.read_f64_values(&mut fitting, tiff.main_ifd().unwrap(), tags::MODEL_PIXEL_SCALE_TAG).unwrap();
    std::assert_eq!(values, std::vec![0.0, 0.0]);
}

#[test]
fn test_huge_entry_count_is_an_error() {
    let mut buffer = create_bigtiff_buffer(&[], 0).into_inner();
    buffer[16..24].copy_from_slice(&u64::MAX.to_le_bytes());

    let mut reader = TiffReader::new();
    std::assert!(matches!(
        reader.read(&mut Cursor::new(buffer)),
        Err(TiffError::DataOutOfBounds { .. })
    ));
}
