//! Unit tests for the platform module.

mod domain_tests;
