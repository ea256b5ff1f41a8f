//! Tests for the compression module

mod factory_tests;
