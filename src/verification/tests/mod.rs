//! Unit tests for the verification module.
