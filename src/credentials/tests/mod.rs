//! Unit tests for the credentials module.

mod file_store_tests;
