//! Tests for the coordinate module

mod transform_tests;
