//! Unit tests for the executor module.

mod operation_tests;
mod sanitizer_tests;
