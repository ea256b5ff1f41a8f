//! Tests for the TIFF module

mod tag_names_tests;
mod byte_order_tests;
mod reader_tests;
