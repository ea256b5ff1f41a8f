//! Tests for the utils module

mod logger_tests;
