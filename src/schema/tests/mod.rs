//! Unit tests for the schema module.
