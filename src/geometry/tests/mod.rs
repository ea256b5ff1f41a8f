//! Tests for the geometry module

mod geojson_reader_tests;
