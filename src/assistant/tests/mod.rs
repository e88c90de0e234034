//! Unit tests for the assistant module.

mod context_tests;
